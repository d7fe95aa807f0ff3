//! Configuration for in-memory cache plugin.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// In-memory cache plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InMemoryCachePluginConfig {
    /// Maximum number of entries in cache.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Upper bound applied to every requested TTL.
    #[serde(default, with = "kit_bootstrap::humantime_serde::option")]
    pub max_ttl: Option<Duration>,
}

fn default_max_entries() -> usize {
    10_000
}

impl Default for InMemoryCachePluginConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_ttl: None,
        }
    }
}
