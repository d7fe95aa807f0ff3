//! Local (in-process) client for the tenant resolver.

use std::sync::Arc;

use async_trait::async_trait;
use kit_security::SecurityContext;
use tenant_resolver_sdk::{
    Subscription, Tenant, TenantAdminClient, TenantContext, TenantId, TenantResolverClient,
    TenantResolverError, TenantStatus,
};

use super::{DomainError, Service};

/// Local client wrapping the resolver service.
///
/// Implements both public traits; hand it out as
/// `Arc<dyn TenantResolverClient>` to request handlers and as
/// `Arc<dyn TenantAdminClient>` to operator tooling.
pub struct TenantResolverLocalClient {
    svc: Arc<Service>,
}

impl TenantResolverLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> TenantResolverError {
    if matches!(e, DomainError::Cancelled) {
        tracing::debug!(operation = op, "tenant_resolver call cancelled");
    } else {
        tracing::error!(operation = op, error = ?e, "tenant_resolver call failed");
    }
    e.into()
}

#[async_trait]
impl TenantResolverClient for TenantResolverLocalClient {
    async fn resolve(&self, hostname: &str) -> Result<TenantContext, TenantResolverError> {
        self.svc
            .resolve(hostname)
            .await
            .map_err(|e| log_and_convert("resolve", e))
    }

    async fn resolve_by_id(&self, id: TenantId) -> Result<Option<Tenant>, TenantResolverError> {
        self.svc
            .resolve_by_id(id)
            .await
            .map_err(|e| log_and_convert("resolve_by_id", e))
    }

    fn invalidate(&self, hostname: &str) {
        self.svc.invalidate(hostname);
    }

    fn invalidate_by_tenant_id(&self, id: TenantId) -> usize {
        self.svc.invalidate_by_tenant_id(id)
    }
}

#[async_trait]
impl TenantAdminClient for TenantResolverLocalClient {
    async fn update_status(
        &self,
        ctx: &SecurityContext,
        id: TenantId,
        status: TenantStatus,
    ) -> Result<Tenant, TenantResolverError> {
        self.svc
            .update_status(ctx, id, status)
            .await
            .map_err(|e| log_and_convert("update_status", e))
    }

    async fn set_custom_domains(
        &self,
        ctx: &SecurityContext,
        id: TenantId,
        domains: Vec<String>,
    ) -> Result<Tenant, TenantResolverError> {
        self.svc
            .set_custom_domains(ctx, id, domains)
            .await
            .map_err(|e| log_and_convert("set_custom_domains", e))
    }

    async fn change_subscription(
        &self,
        ctx: &SecurityContext,
        id: TenantId,
        subscription: Subscription,
    ) -> Result<Tenant, TenantResolverError> {
        self.svc
            .change_subscription(ctx, id, subscription)
            .await
            .map_err(|e| log_and_convert("change_subscription", e))
    }
}
