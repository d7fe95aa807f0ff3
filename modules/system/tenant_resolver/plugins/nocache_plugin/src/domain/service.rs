//! Service implementation for no-cache plugin.

/// No-cache service.
///
/// Provides no caching - `get()` always misses and writes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct Service;

impl Service {
    /// Create a new service.
    #[must_use]
    pub fn new() -> Self {
        tracing::debug!("tenant resolution cache disabled");
        Self
    }
}
