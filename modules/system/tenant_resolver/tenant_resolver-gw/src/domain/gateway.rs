//! Construction of tenant-scoped data gateways.
//!
//! A [`TenantGateway`] can only be built from something that names exactly
//! one tenant. Anything else is [`TenantResolverError::GatewayUnavailable`];
//! there is no unscoped fallback.

use std::sync::Arc;

use kit_security::{SecurityContext, TenantScope};
use kit_store::DocumentStore;
use kit_store::secure::TenantGateway;
use tenant_resolver_sdk::{TenantContext, TenantId, TenantResolverError};

/// Where the tenant of a gateway comes from.
#[derive(Debug, Clone, Copy)]
pub enum GatewaySource<'a> {
    /// Tenant established by the authenticated session.
    Session(&'a SecurityContext),
    /// Tenant resolved from the request hostname.
    Resolved(&'a TenantContext),
    /// Tenant id supplied by trusted internal code (provisioning, jobs).
    Trusted(TenantId),
}

impl GatewaySource<'_> {
    fn scope(self) -> Result<TenantScope, TenantResolverError> {
        let scope = match self {
            Self::Session(ctx) => ctx.tenant_scope(),
            Self::Resolved(ctx) => ctx.scope(),
            Self::Trusted(id) => TenantScope::new(id).ok(),
        };
        scope.ok_or_else(|| TenantResolverError::GatewayUnavailable {
            reason: self.missing_reason().to_owned(),
        })
    }

    fn missing_reason(self) -> &'static str {
        match self {
            Self::Session(_) => "session carries no tenant",
            Self::Resolved(_) => "hostname did not resolve to a tenant",
            Self::Trusted(_) => "nil tenant id",
        }
    }
}

/// Builds a gateway over `store` bound to the tenant named by `source`.
///
/// # Errors
///
/// [`TenantResolverError::GatewayUnavailable`] when `source` names no tenant.
pub fn gateway_for<S>(
    source: GatewaySource<'_>,
    store: Arc<S>,
) -> Result<TenantGateway<S>, TenantResolverError>
where
    S: DocumentStore + ?Sized,
{
    let scope = source.scope().inspect_err(|e| {
        tracing::warn!(error = %e, "refusing to build tenant gateway");
    })?;
    tracing::trace!(%scope, "tenant gateway built");
    Ok(TenantGateway::new(store, scope))
}
