//! Domain errors for the tenant resolver gateway.

use std::time::Duration;

use kit_store::StoreError;
use tenant_resolver_sdk::{DirectoryError, TenantId, TenantResolverError};
use thiserror::Error;

/// Domain-level errors for tenant resolver gateway operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Directory plugin failure.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Directory query exceeded the configured deadline.
    #[error("directory lookup for {hostname} timed out after {}ms", timeout.as_millis())]
    LookupTimeout { hostname: String, timeout: Duration },

    /// More than one active tenant matched a hostname.
    #[error("{} tenants match {hostname}", candidates.len())]
    IntegrityViolation {
        hostname: String,
        candidates: Vec<TenantId>,
    },

    #[error("resolution cancelled")]
    Cancelled,

    /// Caller lacks the operator role.
    #[error("operation {operation} requires an operator")]
    Unauthorized { operation: &'static str },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No tenant scope could be established for data access.
    #[error("tenant gateway unavailable: {reason}")]
    GatewayUnavailable { reason: String },

    /// Tenant-owned storage failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The tenant exists but its default records could not all be written.
    #[error("tenant {tenant_id} partially provisioned: {source}")]
    PartialProvisioning {
        tenant_id: TenantId,
        #[source]
        source: StoreError,
    },
}

/// Convert domain errors to SDK errors for API boundary.
impl From<DomainError> for TenantResolverError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Directory(err) => match err {
                DirectoryError::Unavailable { message, .. } => {
                    TenantResolverError::ResolutionUnavailable { message }
                }
                DirectoryError::TenantNotFound(tenant_id) => {
                    TenantResolverError::TenantNotFound { tenant_id }
                }
                DirectoryError::SlugTaken(slug) => {
                    TenantResolverError::Conflict(format!("slug already taken: {slug}"))
                }
                DirectoryError::DomainTaken(domain) => {
                    TenantResolverError::Conflict(format!("domain already taken: {domain}"))
                }
                DirectoryError::InvalidTransition { from, to } => {
                    TenantResolverError::InvalidTransition { from, to }
                }
                DirectoryError::Invalid(msg) => TenantResolverError::InvalidRequest(msg),
            },
            DomainError::LookupTimeout { hostname, timeout } => {
                TenantResolverError::ResolutionUnavailable {
                    message: format!(
                        "directory lookup for {hostname} timed out after {}ms",
                        timeout.as_millis()
                    ),
                }
            }
            DomainError::IntegrityViolation {
                hostname,
                candidates,
            } => TenantResolverError::IntegrityViolation {
                hostname,
                candidates,
            },
            DomainError::Cancelled => TenantResolverError::Cancelled,
            DomainError::Unauthorized { .. } => TenantResolverError::Unauthorized,
            DomainError::InvalidRequest(msg) => TenantResolverError::InvalidRequest(msg),
            DomainError::GatewayUnavailable { reason } => {
                TenantResolverError::GatewayUnavailable { reason }
            }
            DomainError::Store(err) => TenantResolverError::Internal(format!("store error: {err}")),
            DomainError::PartialProvisioning { tenant_id, source } => {
                TenantResolverError::PartialProvisioning {
                    tenant_id,
                    message: source.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn directory_outage_is_not_not_found() {
        let err: TenantResolverError =
            DomainError::Directory(DirectoryError::unavailable("connection refused")).into();
        assert!(matches!(err, TenantResolverError::ResolutionUnavailable { .. }));

        let err: TenantResolverError = DomainError::LookupTimeout {
            hostname: "acme.example.com".into(),
            timeout: Duration::from_secs(1),
        }
        .into();
        assert!(matches!(err, TenantResolverError::ResolutionUnavailable { .. }));
    }

    #[test]
    fn uniqueness_errors_become_conflicts() {
        let err: TenantResolverError =
            DomainError::Directory(DirectoryError::SlugTaken("acme".into())).into();
        assert!(matches!(err, TenantResolverError::Conflict(msg) if msg.contains("acme")));
    }
}
