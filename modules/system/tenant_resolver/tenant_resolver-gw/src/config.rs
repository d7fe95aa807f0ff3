//! Configuration for the tenant resolver gateway.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Gateway configuration, loaded from the `tenant_resolver` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TenantResolverConfig {
    /// Platform base domain; tenants get `{slug}.{base_domain}`.
    #[serde(default = "default_base_domain")]
    pub base_domain: String,

    /// Operator-owned hosts that never resolve to a tenant
    /// (the base domain and `www.` + base are always included).
    pub main_domains: Vec<String>,

    /// Freshness window for cached resolutions.
    #[serde(default = "default_cache_ttl", with = "kit_bootstrap::humantime_serde")]
    pub cache_ttl: Duration,

    /// Deadline for a single directory query. `None` waits indefinitely.
    #[serde(default, with = "kit_bootstrap::humantime_serde::option")]
    pub lookup_timeout: Option<Duration>,
}

fn default_base_domain() -> String {
    "localhost".to_owned()
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(300)
}

impl Default for TenantResolverConfig {
    fn default() -> Self {
        Self {
            base_domain: default_base_domain(),
            main_domains: Vec::new(),
            cache_ttl: default_cache_ttl(),
            lookup_timeout: None,
        }
    }
}

impl TenantResolverConfig {
    /// Config file section name.
    pub const SECTION: &'static str = "tenant_resolver";

    /// Loads the section from an optional YAML file plus `DRIVEHUB__TENANT_RESOLVER__*`
    /// environment overrides.
    ///
    /// # Errors
    /// Fails on a missing file or invalid values.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        kit_bootstrap::load_section(path, Self::SECTION)
    }
}
