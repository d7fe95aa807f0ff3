//! Tenant provisioning.
//!
//! Creating a tenant is two steps against two systems: the directory record,
//! then the tenant's default documents in the shared store. The second step
//! is idempotent, so a tenant left half-provisioned is repaired by running
//! [`Provisioner::ensure_defaults`].

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use kit_security::SecurityContext;
use kit_store::secure::TenantGateway;
use kit_store::{DocumentStore, Filter, StoreError, document::to_document};
use serde::Serialize;
use tenant_resolver_sdk::{
    DirectoryError, DirectoryPluginClient, Domains, Limits, NewTenant, Owner, Plan, Subscription,
    SubscriptionStatus, Tenant, TenantId, is_valid_slug, normalize_domain,
};
use tracing::{error, info};

use super::error::DomainError;
use super::gateway::{GatewaySource, gateway_for};
use super::hostname::HostnameResolver;
use super::service::require_operator;

pub const USERS_COLLECTION: &str = "users";
pub const SETTINGS_COLLECTION: &str = "settings";

/// Marker of the settings document written at provisioning time.
pub const DEFAULT_SETTINGS_KIND: &str = "default";

const TRIAL_DAYS: i64 = 14;

/// Input for [`Provisioner::provision`].
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub name: String,
    pub slug: String,
    /// Becomes the tenant's first admin user.
    pub owner: Owner,
    pub plan: Plan,
    pub custom_domains: Vec<String>,
}

/// Which default documents a provisioning pass actually wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultsReport {
    pub admin_created: bool,
    pub settings_created: bool,
}

#[derive(Serialize)]
struct AdminUser<'a> {
    id: String,
    name: &'a str,
    email: &'a str,
    role: &'static str,
    active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct BookingSettings {
    min_rental_days: u32,
    max_rental_days: u32,
    advance_booking_days: u32,
}

#[derive(Serialize)]
struct DefaultSettings<'a> {
    kind: &'static str,
    company_name: &'a str,
    timezone: &'static str,
    currency: &'static str,
    booking: BookingSettings,
}

/// Creates tenants and their default records.
pub struct Provisioner {
    directory: Arc<dyn DirectoryPluginClient>,
    store: Arc<dyn DocumentStore>,
    base_domain: String,
}

impl Provisioner {
    /// Primary domains are built from the resolver's normalized base domain,
    /// so provisioning and hostname classification agree on it.
    #[must_use]
    pub fn new(
        directory: Arc<dyn DirectoryPluginClient>,
        store: Arc<dyn DocumentStore>,
        hostnames: &HostnameResolver,
    ) -> Self {
        Self {
            directory,
            store,
            base_domain: hostnames.base_domain().to_owned(),
        }
    }

    /// Creates an active tenant on a trial subscription and writes its
    /// default documents.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Unauthorized`] unless `ctx` is an operator
    /// - [`DomainError::InvalidRequest`] for a bad name, slug or domain
    /// - directory errors (`SlugTaken`, `DomainTaken`, ...) before anything is written
    /// - [`DomainError::PartialProvisioning`] if the tenant was created but
    ///   its defaults were not
    #[tracing::instrument(skip_all, fields(slug = %req.slug, plan = ?req.plan))]
    pub async fn provision(
        &self,
        ctx: &SecurityContext,
        req: ProvisionRequest,
    ) -> Result<Tenant, DomainError> {
        require_operator(ctx, "provision")?;

        let name = req.name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidRequest("tenant name is empty".to_owned()));
        }
        if !is_valid_slug(&req.slug) {
            return Err(DomainError::InvalidRequest(format!(
                "invalid slug `{}`",
                req.slug
            )));
        }
        let custom = req
            .custom_domains
            .iter()
            .map(|raw| {
                normalize_domain(raw)
                    .ok_or_else(|| DomainError::InvalidRequest(format!("invalid custom domain `{raw}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let now = Utc::now();
        let new_tenant = NewTenant {
            name: name.to_owned(),
            domains: Domains {
                custom,
                ..Domains::for_slug(&req.slug, &self.base_domain)
            },
            slug: req.slug,
            owner: req.owner,
            subscription: Subscription {
                plan: req.plan,
                status: SubscriptionStatus::Trialing,
                current_period_start: now,
                current_period_end: now + TimeDelta::days(TRIAL_DAYS),
            },
            limits: Limits::for_plan(req.plan),
        };

        let tenant = self.directory.create_tenant(new_tenant).await?;
        info!(tenant_id = %tenant.id, primary = %tenant.domains.primary, "tenant created");

        let gateway = self.gateway(tenant.id)?;
        match write_defaults(&gateway, &tenant).await {
            Ok(report) => {
                info!(tenant_id = %tenant.id, ?report, "tenant provisioned");
                Ok(tenant)
            }
            Err(source) => {
                error!(
                    tenant_id = %tenant.id,
                    error = %source,
                    "tenant created but default records were not written"
                );
                Err(DomainError::PartialProvisioning {
                    tenant_id: tenant.id,
                    source,
                })
            }
        }
    }

    /// Writes whichever default documents of `tenant_id` are missing.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Unauthorized`] unless `ctx` is an operator
    /// - [`DomainError::Directory`] if the tenant does not exist
    /// - [`DomainError::Store`] if a write fails
    #[tracing::instrument(skip_all, fields(tenant_id = %tenant_id))]
    pub async fn ensure_defaults(
        &self,
        ctx: &SecurityContext,
        tenant_id: TenantId,
    ) -> Result<DefaultsReport, DomainError> {
        require_operator(ctx, "ensure_defaults")?;
        let tenant = self
            .directory
            .get_tenant(tenant_id)
            .await?
            .ok_or(DirectoryError::TenantNotFound(tenant_id))?;

        let gateway = self.gateway(tenant.id)?;
        let report = write_defaults(&gateway, &tenant).await?;
        info!(?report, "tenant defaults ensured");
        Ok(report)
    }

    fn gateway(&self, tenant_id: TenantId) -> Result<TenantGateway<dyn DocumentStore>, DomainError> {
        gateway_for(GatewaySource::Trusted(tenant_id), Arc::clone(&self.store)).map_err(|e| {
            DomainError::GatewayUnavailable {
                reason: e.to_string(),
            }
        })
    }
}

async fn write_defaults(
    gateway: &TenantGateway<dyn DocumentStore>,
    tenant: &Tenant,
) -> Result<DefaultsReport, StoreError> {
    let mut report = DefaultsReport::default();

    let users = gateway.collection(USERS_COLLECTION);
    let admin_id = tenant.owner.user_id.to_string();
    if users.find_by_id(&admin_id).await?.is_none() {
        let admin = AdminUser {
            id: admin_id,
            name: &tenant.owner.name,
            email: &tenant.owner.email,
            role: "admin",
            active: true,
            created_at: Utc::now(),
        };
        users.insert_one(to_document(&admin)?).await?;
        report.admin_created = true;
    }

    let settings = gateway.collection(SETTINGS_COLLECTION);
    if settings
        .count(Filter::eq("kind", DEFAULT_SETTINGS_KIND))
        .await?
        == 0
    {
        let defaults = DefaultSettings {
            kind: DEFAULT_SETTINGS_KIND,
            company_name: &tenant.name,
            timezone: "UTC",
            currency: "USD",
            booking: BookingSettings {
                min_rental_days: 1,
                max_rental_days: 30,
                advance_booking_days: 90,
            },
        };
        settings.insert_one(to_document(&defaults)?).await?;
        report.settings_created = true;
    }

    Ok(report)
}
