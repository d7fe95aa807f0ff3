//! Domain service for the static tenant directory plugin.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use parking_lot::RwLock;
use tenant_resolver_sdk::{
    DirectoryError, Domains, HostLookup, Limits, NewTenant, Owner, Subscription, Tenant, TenantId,
    TenantStatus, is_valid_slug, normalize_domain,
};
use uuid::Uuid;

use crate::config::{StaticDirectoryPluginConfig, TenantConfig};

const BILLING_PERIOD_DAYS: i64 = 30;

/// In-memory tenant directory.
///
/// Every write validates uniqueness and applies the change under one write
/// lock, so two concurrent writers cannot both claim a slug or domain.
pub struct Service {
    base_domain: String,
    tenants: RwLock<HashMap<TenantId, Tenant>>,
}

impl Service {
    /// Creates an empty directory. `base_domain` is trimmed and lowercased.
    #[must_use]
    pub fn new(base_domain: &str) -> Self {
        Self {
            base_domain: base_domain.trim().trim_end_matches('.').to_ascii_lowercase(),
            tenants: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a directory seeded from configuration.
    ///
    /// # Errors
    /// Fails if two seed tenants share an id, slug or domain, or a seed is malformed.
    pub fn from_config(cfg: &StaticDirectoryPluginConfig) -> Result<Self, DirectoryError> {
        let svc = Self::new(&cfg.base_domain);
        for seed in &cfg.tenants {
            svc.seed(seed)?;
        }
        tracing::info!(
            base_domain = %svc.base_domain,
            tenants = cfg.tenants.len(),
            "static tenant directory seeded"
        );
        Ok(svc)
    }

    #[must_use]
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    fn seed(&self, seed: &TenantConfig) -> Result<(), DirectoryError> {
        let now = Utc::now();
        let custom = normalize_all(&seed.custom_domains)?;
        let tenant = Tenant {
            id: seed.id,
            name: seed.name.clone(),
            slug: seed.slug.clone(),
            domains: Domains {
                custom,
                ..Domains::for_slug(&seed.slug, &self.base_domain)
            },
            owner: seed.owner.clone().unwrap_or_else(|| Owner {
                user_id: Uuid::nil(),
                name: String::new(),
                email: String::new(),
            }),
            subscription: Subscription {
                plan: seed.plan,
                status: seed.subscription_status,
                current_period_start: now,
                current_period_end: now + Duration::days(BILLING_PERIOD_DAYS),
            },
            limits: seed.limits.unwrap_or_else(|| Limits::for_plan(seed.plan)),
            status: seed.status,
            created_at: now,
            updated_at: now,
        };
        self.insert_checked(tenant).map(|_| ())
    }

    /// Tenants matching `lookup`, sorted by `(created_at, id)`.
    pub(super) fn find_by_host(&self, lookup: &HostLookup) -> Vec<Tenant> {
        let mut found: Vec<Tenant> = self
            .tenants
            .read()
            .values()
            .filter(|t| lookup.matches(t))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        found
    }

    pub(super) fn get(&self, id: TenantId) -> Option<Tenant> {
        self.tenants.read().get(&id).cloned()
    }

    /// The primary domain is always `{slug}.{base_domain}`; a supplied
    /// primary that normalizes to anything else is rejected.
    pub(super) fn create(&self, new: NewTenant) -> Result<Tenant, DirectoryError> {
        let derived = Domains::for_slug(&new.slug, &self.base_domain);
        let supplied = new.domains.primary.trim().trim_end_matches('.');
        if !supplied.is_empty() && !supplied.eq_ignore_ascii_case(&derived.primary) {
            return Err(DirectoryError::Invalid(format!(
                "primary domain `{}` does not match `{}`",
                new.domains.primary, derived.primary
            )));
        }

        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: new.name,
            slug: new.slug,
            domains: Domains {
                custom: normalize_all(&new.domains.custom)?,
                ..derived
            },
            owner: new.owner,
            subscription: new.subscription,
            limits: new.limits,
            status: TenantStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let tenant = self.insert_checked(tenant)?;
        tracing::info!(tenant_id = %tenant.id, slug = %tenant.slug, "tenant created");
        Ok(tenant)
    }

    fn insert_checked(&self, tenant: Tenant) -> Result<Tenant, DirectoryError> {
        if tenant.name.trim().is_empty() {
            return Err(DirectoryError::Invalid("tenant name must not be empty".to_owned()));
        }
        if !is_valid_slug(&tenant.slug) {
            return Err(DirectoryError::Invalid(format!("invalid slug `{}`", tenant.slug)));
        }

        let mut tenants = self.tenants.write();
        if tenants.contains_key(&tenant.id) {
            return Err(DirectoryError::Invalid(format!("duplicate tenant id {}", tenant.id)));
        }
        if tenants.values().any(|t| t.slug == tenant.slug) {
            return Err(DirectoryError::SlugTaken(tenant.slug));
        }
        ensure_domains_free(&tenants, tenant.id, tenant.domains.iter())?;

        tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    pub(super) fn update_status(
        &self,
        id: TenantId,
        status: TenantStatus,
    ) -> Result<Tenant, DirectoryError> {
        let mut tenants = self.tenants.write();
        let tenant = tenants
            .get_mut(&id)
            .ok_or(DirectoryError::TenantNotFound(id))?;
        if tenant.status.validate_transition(status)? {
            tracing::info!(tenant_id = %id, from = ?tenant.status, to = ?status, "tenant status changed");
            tenant.status = status;
            tenant.updated_at = Utc::now();
        }
        Ok(tenant.clone())
    }

    pub(super) fn set_custom_domains(
        &self,
        id: TenantId,
        domains: &[String],
    ) -> Result<Tenant, DirectoryError> {
        let custom = normalize_all(domains)?;
        let mut tenants = self.tenants.write();
        let primary = tenants
            .get(&id)
            .map(|t| t.domains.primary.clone())
            .ok_or(DirectoryError::TenantNotFound(id))?;
        if let Some(own) = custom.iter().find(|d| **d == primary) {
            return Err(DirectoryError::Invalid(format!(
                "custom domain `{own}` duplicates the primary domain"
            )));
        }
        ensure_domains_free(&tenants, id, custom.iter().map(String::as_str))?;

        let tenant = tenants
            .get_mut(&id)
            .ok_or(DirectoryError::TenantNotFound(id))?;
        tenant.domains.custom = custom;
        tenant.updated_at = Utc::now();
        Ok(tenant.clone())
    }

    pub(super) fn update_subscription(
        &self,
        id: TenantId,
        subscription: Subscription,
        limits: Limits,
    ) -> Result<Tenant, DirectoryError> {
        let mut tenants = self.tenants.write();
        let tenant = tenants
            .get_mut(&id)
            .ok_or(DirectoryError::TenantNotFound(id))?;
        tenant.subscription = subscription;
        tenant.limits = limits;
        tenant.updated_at = Utc::now();
        Ok(tenant.clone())
    }
}

/// Normalizes and de-duplicates, keeping first occurrence order.
fn normalize_all(domains: &[String]) -> Result<Vec<String>, DirectoryError> {
    let mut out: Vec<String> = Vec::with_capacity(domains.len());
    for raw in domains {
        let domain = normalize_domain(raw)
            .ok_or_else(|| DirectoryError::Invalid(format!("invalid custom domain `{raw}`")))?;
        if !out.contains(&domain) {
            out.push(domain);
        }
    }
    Ok(out)
}

fn ensure_domains_free<'a>(
    tenants: &HashMap<TenantId, Tenant>,
    owner: TenantId,
    domains: impl Iterator<Item = &'a str>,
) -> Result<(), DirectoryError> {
    for domain in domains {
        if tenants
            .values()
            .any(|t| t.id != owner && t.domains.contains(domain))
        {
            return Err(DirectoryError::DomainTaken(domain.to_owned()));
        }
    }
    Ok(())
}
