use uuid::Uuid;

use crate::scope::TenantScope;

/// Role supplied by the session provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular user acting inside a single tenant.
    #[default]
    TenantUser,
    /// Platform operator allowed to manage tenants.
    SuperAdmin,
}

/// `SecurityContext` encapsulates the security-related information for a request or operation
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SecurityContext {
    tenant_id: Option<Uuid>,
    subject_id: Uuid,
    role: Role,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Create an anonymous `SecurityContext` with no tenant and no subject
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// Tenant established by the session, if any.
    ///
    /// A nil UUID supplied to the builder is treated as "no tenant".
    #[must_use]
    pub fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }

    /// Get the subject ID (user, service, or system) associated with the security context
    #[must_use]
    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn is_operator(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.subject_id.is_nil()
    }

    /// Tenant scope derived from the session tenant.
    ///
    /// Returns `None` when the session carries no tenant; callers must treat
    /// that as "deny", never as "unscoped".
    #[must_use]
    pub fn tenant_scope(&self) -> Option<TenantScope> {
        self.tenant_id.and_then(|id| TenantScope::new(id).ok())
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    tenant_id: Option<Uuid>,
    subject_id: Option<Uuid>,
    role: Role,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn subject_id(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            tenant_id: self.tenant_id.filter(|id| !id.is_nil()),
            subject_id: self.subject_id.unwrap_or_default(),
            role: self.role,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_security_context_builder_full() {
        let tenant_id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let subject_id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();

        let ctx = SecurityContext::builder()
            .tenant_id(tenant_id)
            .subject_id(subject_id)
            .role(Role::SuperAdmin)
            .build();

        assert_eq!(ctx.tenant_id(), Some(tenant_id));
        assert_eq!(ctx.subject_id(), subject_id);
        assert!(ctx.is_operator());
        assert!(!ctx.is_anonymous());
    }

    #[test]
    fn test_security_context_anonymous() {
        let ctx = SecurityContext::anonymous();

        assert_eq!(ctx.tenant_id(), None);
        assert_eq!(ctx.subject_id(), Uuid::default());
        assert_eq!(ctx.role(), Role::TenantUser);
        assert!(ctx.is_anonymous());
        assert!(ctx.tenant_scope().is_none());
    }

    #[test]
    fn nil_tenant_is_no_tenant() {
        let ctx = SecurityContext::builder().tenant_id(Uuid::nil()).build();

        assert_eq!(ctx.tenant_id(), None);
        assert!(ctx.tenant_scope().is_none());
    }

    #[test]
    fn tenant_scope_follows_session_tenant() {
        let tenant_id = Uuid::new_v4();
        let ctx = SecurityContext::builder().tenant_id(tenant_id).build();

        let scope = ctx.tenant_scope().unwrap();
        assert_eq!(scope.tenant_id(), tenant_id);
    }

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
    }
}
