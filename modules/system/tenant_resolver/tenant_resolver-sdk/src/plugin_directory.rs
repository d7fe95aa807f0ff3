//! Tenant directory plugin trait.
//!
//! A directory is the source of truth for tenant records. Implementations
//! must enforce slug and domain uniqueness at write time, atomically with
//! the write itself.

use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::models::{Domains, Limits, Owner, Subscription, Tenant, TenantId, TenantStatus};

/// Query for tenants reachable through one hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLookup {
    /// Normalized hostname; matched against primary and custom domains.
    pub hostname: String,
    /// Subdomain slug, when the host is a subdomain of the base domain.
    pub slug: Option<String>,
    pub status: TenantStatus,
}

impl HostLookup {
    /// Reference predicate for implementations that filter in memory.
    #[must_use]
    pub fn matches(&self, tenant: &Tenant) -> bool {
        tenant.status == self.status
            && (tenant.domains.contains(&self.hostname)
                || self.slug.as_deref().is_some_and(|s| s == tenant.slug))
    }
}

/// Input for [`DirectoryPluginClient::create_tenant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    pub name: String,
    pub slug: String,
    pub domains: Domains,
    pub owner: Owner,
    pub subscription: Subscription,
    pub limits: Limits,
}

/// Tenant directory backend.
#[async_trait]
pub trait DirectoryPluginClient: Send + Sync {
    /// All tenants matching `lookup`, ordered by `(created_at, id)`.
    ///
    /// More than one result means the uniqueness invariant is broken; callers
    /// must not pick one.
    ///
    /// # Errors
    /// `Unavailable` if the backend cannot be queried.
    async fn find_by_host(&self, lookup: &HostLookup) -> Result<Vec<Tenant>, DirectoryError>;

    /// # Errors
    /// `Unavailable` if the backend cannot be queried.
    async fn get_tenant(&self, id: TenantId) -> Result<Option<Tenant>, DirectoryError>;

    /// Creates an `Active` tenant.
    ///
    /// # Errors
    /// `SlugTaken`, `DomainTaken`, `Invalid`, `Unavailable`.
    async fn create_tenant(&self, tenant: NewTenant) -> Result<Tenant, DirectoryError>;

    /// # Errors
    /// `TenantNotFound`, `InvalidTransition`, `Unavailable`.
    async fn update_status(
        &self,
        id: TenantId,
        status: TenantStatus,
    ) -> Result<Tenant, DirectoryError>;

    /// Replaces the custom domain list. Domains are expected to be normalized.
    ///
    /// # Errors
    /// `TenantNotFound`, `DomainTaken`, `Invalid`, `Unavailable`.
    async fn set_custom_domains(
        &self,
        id: TenantId,
        domains: Vec<String>,
    ) -> Result<Tenant, DirectoryError>;

    /// # Errors
    /// `TenantNotFound`, `Unavailable`.
    async fn update_subscription(
        &self,
        id: TenantId,
        subscription: Subscription,
        limits: Limits,
    ) -> Result<Tenant, DirectoryError>;
}
