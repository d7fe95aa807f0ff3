//! Configuration for the static tenant directory plugin.

use serde::{Deserialize, Serialize};
use tenant_resolver_sdk::{Limits, Owner, Plan, SubscriptionStatus, TenantStatus};
use uuid::Uuid;

/// Plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticDirectoryPluginConfig {
    /// Base domain used to derive primary domains (`{slug}.{base_domain}`).
    pub base_domain: String,

    /// Seed tenants.
    pub tenants: Vec<TenantConfig>,
}

impl Default for StaticDirectoryPluginConfig {
    fn default() -> Self {
        Self {
            base_domain: "localhost".to_owned(),
            tenants: Vec::new(),
        }
    }
}

/// Configuration for a single seed tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    /// Tenant ID.
    pub id: Uuid,

    /// Tenant name.
    pub name: String,

    pub slug: String,

    #[serde(default)]
    pub custom_domains: Vec<String>,

    #[serde(default)]
    pub owner: Option<Owner>,

    #[serde(default)]
    pub plan: Plan,

    #[serde(default = "default_subscription_status")]
    pub subscription_status: SubscriptionStatus,

    /// Overrides the plan defaults.
    #[serde(default)]
    pub limits: Option<Limits>,

    /// Tenant status (defaults to Active).
    #[serde(default)]
    pub status: TenantStatus,
}

fn default_subscription_status() -> SubscriptionStatus {
    SubscriptionStatus::Active
}
