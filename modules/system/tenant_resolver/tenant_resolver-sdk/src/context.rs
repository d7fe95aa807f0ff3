//! Per-request resolution results.

use kit_security::TenantScope;
use serde::Serialize;

use crate::models::{Tenant, TenantId};

/// Classification of a raw `Host` value.
///
/// Malformed input yields a value with every flag `false` and no slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostInfo {
    /// Lowercased hostname without port or trailing dot.
    pub clean_hostname: String,
    /// Ends with `"." + base_domain`.
    pub is_subdomain: bool,
    /// Contains neither the base domain nor `localhost`.
    pub is_custom_domain: bool,
    /// The operator's own site (base domain, `www.` + base, or a configured main domain).
    pub is_main_domain: bool,
    /// Label(s) before `"." + base_domain` for subdomains.
    pub subdomain_slug: Option<String>,
}

/// Outcome of resolving one request's hostname.
///
/// The tenant id is read from the tenant, so an unresolved context cannot
/// carry an id and cannot produce a [`TenantScope`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TenantContext {
    tenant: Option<Tenant>,
    hostname: String,
    is_subdomain: bool,
    is_custom_domain: bool,
}

impl TenantContext {
    #[must_use]
    pub fn resolved(tenant: Tenant, host: &HostInfo) -> Self {
        Self {
            tenant: Some(tenant),
            ..Self::unresolved(host)
        }
    }

    #[must_use]
    pub fn unresolved(host: &HostInfo) -> Self {
        Self {
            tenant: None,
            hostname: host.clean_hostname.clone(),
            is_subdomain: host.is_subdomain,
            is_custom_domain: host.is_custom_domain,
        }
    }

    #[must_use]
    pub fn tenant(&self) -> Option<&Tenant> {
        self.tenant.as_ref()
    }

    #[must_use]
    pub fn into_tenant(self) -> Option<Tenant> {
        self.tenant
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant.as_ref().map(|t| t.id)
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.tenant.is_some()
    }

    /// The hostname that produced this context, normalized.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    #[must_use]
    pub fn is_subdomain(&self) -> bool {
        self.is_subdomain
    }

    #[must_use]
    pub fn is_custom_domain(&self) -> bool {
        self.is_custom_domain
    }

    /// Data-access scope for the resolved tenant; `None` when unresolved.
    #[must_use]
    pub fn scope(&self) -> Option<TenantScope> {
        self.tenant_id().and_then(|id| TenantScope::new(id).ok())
    }
}
