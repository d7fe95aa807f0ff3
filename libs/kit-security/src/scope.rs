use std::fmt;

use uuid::Uuid;

/// Errors produced while building a [`TenantScope`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// The nil UUID never identifies a tenant.
    #[error("nil tenant id cannot scope data access")]
    NilTenant,
}

/// Access scope bound to exactly one tenant.
///
/// Unlike an empty "deny all" scope, a `TenantScope` cannot exist without a
/// tenant: construction rejects the nil UUID, so every value of this type is
/// a usable filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TenantScope {
    tenant_id: Uuid,
}

impl TenantScope {
    /// # Errors
    /// Returns [`ScopeError::NilTenant`] for the nil UUID.
    pub fn new(tenant_id: Uuid) -> Result<Self, ScopeError> {
        if tenant_id.is_nil() {
            return Err(ScopeError::NilTenant);
        }
        Ok(Self { tenant_id })
    }

    #[inline]
    #[must_use]
    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}

impl fmt::Display for TenantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tenant:{}", self.tenant_id)
    }
}

impl TryFrom<Uuid> for TenantScope {
    type Error = ScopeError;

    fn try_from(tenant_id: Uuid) -> Result<Self, Self::Error> {
        Self::new(tenant_id)
    }
}
