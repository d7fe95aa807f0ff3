//! Public API traits for the tenant resolver.
//!
//! The gateway crate implements both traits on its local client. Request
//! handlers depend on [`TenantResolverClient`]; operator tooling additionally
//! uses [`TenantAdminClient`].

use async_trait::async_trait;
use kit_security::SecurityContext;

use crate::context::TenantContext;
use crate::error::TenantResolverError;
use crate::models::{Subscription, Tenant, TenantId, TenantStatus};

/// Hostname-to-tenant resolution.
///
/// ```ignore
/// let ctx = resolver.resolve(host).await?;
/// if let Some(tenant) = ctx.tenant() {
///     tracing::info!(tenant = %tenant.slug, "request resolved");
/// }
/// ```
#[async_trait]
pub trait TenantResolverClient: Send + Sync {
    /// Resolve a raw `Host` value (port allowed) to a tenant context.
    ///
    /// A hostname that matches no active tenant yields an unresolved context.
    ///
    /// # Errors
    ///
    /// - `ResolutionUnavailable` if the directory could not be queried
    /// - `IntegrityViolation` if several tenants claim the hostname
    async fn resolve(&self, hostname: &str) -> Result<TenantContext, TenantResolverError>;

    /// Look up a tenant by id regardless of its status.
    ///
    /// # Errors
    ///
    /// - `ResolutionUnavailable` if the directory could not be queried
    async fn resolve_by_id(&self, id: TenantId) -> Result<Option<Tenant>, TenantResolverError>;

    /// Drop the cached resolution for one hostname.
    fn invalidate(&self, hostname: &str);

    /// Drop every cached resolution pointing at `id`. Returns the number removed.
    fn invalidate_by_tenant_id(&self, id: TenantId) -> usize;
}

/// Operator-only tenant mutations. Each one invalidates cached resolutions
/// of the tenant before returning.
#[async_trait]
pub trait TenantAdminClient: Send + Sync {
    /// # Errors
    ///
    /// - `Unauthorized` unless `ctx` is an operator
    /// - `TenantNotFound`, `InvalidTransition`
    async fn update_status(
        &self,
        ctx: &SecurityContext,
        id: TenantId,
        status: TenantStatus,
    ) -> Result<Tenant, TenantResolverError>;

    /// Replace the tenant's custom domain list.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless `ctx` is an operator
    /// - `InvalidRequest` for a malformed domain
    /// - `Conflict` if a domain belongs to another tenant
    async fn set_custom_domains(
        &self,
        ctx: &SecurityContext,
        id: TenantId,
        domains: Vec<String>,
    ) -> Result<Tenant, TenantResolverError>;

    /// Replace the subscription; a plan change also resets limits to the plan defaults.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless `ctx` is an operator
    /// - `TenantNotFound`, `InvalidRequest` for an inverted billing period
    async fn change_subscription(
        &self,
        ctx: &SecurityContext,
        id: TenantId,
        subscription: Subscription,
    ) -> Result<Tenant, TenantResolverError>;
}
