//! Global `tracing` subscriber setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Output encoding of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// `logging` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level for every target.
    pub level: String,
    /// Extra `EnvFilter` directives, e.g. `"tenant_resolver=debug"`.
    pub directives: Vec<String>,
    pub format: LogFormat,
    /// Include the event's target (module path) in output.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            directives: Vec::new(),
            format: LogFormat::Plain,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// Directive string built from `level` and `directives`.
    #[must_use]
    pub fn filter_spec(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Builds the filter: `RUST_LOG` wins when set and valid, otherwise the config.
///
/// # Errors
/// Fails if the configured directives do not parse.
pub fn build_filter(cfg: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    Ok(EnvFilter::try_new(cfg.filter_spec())?)
}

/// Installs the global subscriber.
///
/// # Errors
/// Fails on invalid directives or if a global subscriber is already set.
pub fn init_logging(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_filter(cfg)?;

    let (plain, json) = match cfg.format {
        LogFormat::Plain => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_target(cfg.with_target),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_timer(UtcTime::rfc_3339())
                    .with_target(cfg.with_target)
                    .with_current_span(true),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .try_init()?;

    tracing::info!(format = ?cfg.format, filter = %cfg.filter_spec(), "logging initialized");
    Ok(())
}
