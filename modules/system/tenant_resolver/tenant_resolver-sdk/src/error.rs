//! Error types for the tenant resolver module.

use thiserror::Error;
use uuid::Uuid;

use crate::models::TenantStatus;

/// Errors that can occur when using the tenant resolver API.
///
/// A hostname that matches no active tenant is not an error: it resolves to
/// an unresolved [`TenantContext`](crate::TenantContext).
#[derive(Debug, Error)]
pub enum TenantResolverError {
    /// The directory could not be queried. Retryable; never means "no tenant".
    #[error("tenant resolution unavailable: {message}")]
    ResolutionUnavailable { message: String },

    /// More than one tenant claims the same hostname or slug.
    #[error("tenant integrity violation for {hostname}: {candidates:?}")]
    IntegrityViolation {
        hostname: String,
        candidates: Vec<Uuid>,
    },

    /// No tenant could be established for a data-access attempt.
    #[error("tenant gateway unavailable: {reason}")]
    GatewayUnavailable { reason: String },

    /// The requested tenant was not found.
    #[error("tenant not found: {tenant_id}")]
    TenantNotFound {
        /// The tenant ID that was not found.
        tenant_id: Uuid,
    },

    /// Slug or domain already belongs to another tenant.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid tenant status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: TenantStatus, to: TenantStatus },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request is not authorized.
    #[error("unauthorized")]
    Unauthorized,

    /// The caller cancelled the operation before it completed.
    #[error("operation cancelled")]
    Cancelled,

    /// Provisioning created the tenant but not all of its default records.
    /// Repair with `ensure_defaults`.
    #[error("tenant {tenant_id} partially provisioned: {message}")]
    PartialProvisioning { tenant_id: Uuid, message: String },

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors returned by tenant directory plugins.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("tenant not found: {0}")]
    TenantNotFound(Uuid),

    #[error("slug already taken: {0}")]
    SlugTaken(String),

    #[error("domain already taken: {0}")]
    DomainTaken(String),

    #[error("invalid tenant status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: TenantStatus, to: TenantStatus },

    #[error("invalid tenant data: {0}")]
    Invalid(String),
}

impl DirectoryError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    pub fn unavailable_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<crate::models::InvalidTransition> for DirectoryError {
    fn from(e: crate::models::InvalidTransition) -> Self {
        Self::InvalidTransition {
            from: e.from,
            to: e.to,
        }
    }
}
