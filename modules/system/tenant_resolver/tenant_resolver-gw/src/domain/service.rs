//! Domain service for the tenant resolver gateway.
//!
//! Resolution is cache-aside:
//!
//! 1. classify the raw host; empty and main hosts short-circuit
//! 2. try the resolution cache
//! 3. on a miss, query the directory for active tenants on that host
//! 4. cache a single match; report several matches as an integrity violation
//!
//! Admin mutations go straight to the directory and drop every cached
//! resolution of the tenant afterwards.

use std::sync::Arc;

use http::HeaderMap;
use kit_security::SecurityContext;
use tenant_resolver_sdk::{
    DirectoryError, DirectoryPluginClient, HostInfo, HostLookup, Limits, ResolutionCachePluginClient,
    Subscription, Tenant, TenantContext, TenantId, TenantStatus, normalize_domain,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::error::DomainError;
use super::hostname::{HostnameResolver, host_from_headers};
use crate::config::TenantResolverConfig;

/// Tenant resolver gateway service.
pub struct Service {
    config: TenantResolverConfig,
    hostnames: HostnameResolver,
    directory: Arc<dyn DirectoryPluginClient>,
    cache: Arc<dyn ResolutionCachePluginClient>,
}

impl Service {
    #[must_use]
    pub fn new(
        config: TenantResolverConfig,
        directory: Arc<dyn DirectoryPluginClient>,
        cache: Arc<dyn ResolutionCachePluginClient>,
    ) -> Self {
        let hostnames = HostnameResolver::new(&config.base_domain, &config.main_domains);
        info!(
            base_domain = %hostnames.base_domain(),
            cache_ttl = ?config.cache_ttl,
            lookup_timeout = ?config.lookup_timeout,
            "tenant resolver service initialized"
        );
        Self {
            config,
            hostnames,
            directory,
            cache,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TenantResolverConfig {
        &self.config
    }

    #[must_use]
    pub fn hostnames(&self) -> &HostnameResolver {
        &self.hostnames
    }

    /// Resolve a raw host value to a tenant context.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Directory`] / [`DomainError::LookupTimeout`] when the
    ///   directory cannot answer
    /// - [`DomainError::IntegrityViolation`] when several tenants claim the host
    #[tracing::instrument(skip_all, fields(host = %raw))]
    pub async fn resolve(&self, raw: &str) -> Result<TenantContext, DomainError> {
        self.resolve_inner(raw, None).await
    }

    /// Like [`Service::resolve`], but gives up with [`DomainError::Cancelled`]
    /// once `cancel` fires. A cancelled resolution never writes to the cache.
    ///
    /// # Errors
    ///
    /// Same as [`Service::resolve`], plus [`DomainError::Cancelled`].
    #[tracing::instrument(skip_all, fields(host = %raw))]
    pub async fn resolve_with_cancel(
        &self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> Result<TenantContext, DomainError> {
        self.resolve_inner(raw, Some(cancel)).await
    }

    /// Resolve the host of a request from its headers.
    ///
    /// # Errors
    ///
    /// Same as [`Service::resolve`].
    pub async fn resolve_headers(&self, headers: &HeaderMap) -> Result<TenantContext, DomainError> {
        let raw = host_from_headers(headers).unwrap_or_default();
        self.resolve(&raw).await
    }

    async fn resolve_inner(
        &self,
        raw: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<TenantContext, DomainError> {
        let host = self.hostnames.classify(raw);
        if host.clean_hostname.is_empty() || host.is_main_domain {
            debug!(
                main_domain = host.is_main_domain,
                "host does not address a tenant"
            );
            return Ok(TenantContext::unresolved(&host));
        }

        if let Some(tenant) = self.cache.get(&host.clean_hostname) {
            debug!(tenant_id = %tenant.id, "resolution cache hit");
            return Ok(TenantContext::resolved(tenant, &host));
        }
        debug!(hostname = %host.clean_hostname, "resolution cache miss");

        let mut candidates = self.lookup(&host, cancel).await?;
        if candidates.len() > 1 {
            let ids: Vec<TenantId> = candidates.iter().map(|t| t.id).collect();
            error!(
                hostname = %host.clean_hostname,
                candidates = ?ids,
                "several active tenants match one hostname"
            );
            return Err(DomainError::IntegrityViolation {
                hostname: host.clean_hostname,
                candidates: ids,
            });
        }

        let Some(tenant) = candidates.pop() else {
            debug!(hostname = %host.clean_hostname, "no tenant for hostname");
            return Ok(TenantContext::unresolved(&host));
        };

        self.cache
            .put(&host.clean_hostname, tenant.clone(), self.config.cache_ttl);
        Ok(TenantContext::resolved(tenant, &host))
    }

    async fn lookup(
        &self,
        host: &HostInfo,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<Tenant>, DomainError> {
        let lookup = HostLookup {
            hostname: host.clean_hostname.clone(),
            slug: host.subdomain_slug.clone(),
            status: TenantStatus::Active,
        };

        let query = async {
            let find = self.directory.find_by_host(&lookup);
            let Some(timeout) = self.config.lookup_timeout else {
                return find.await.map_err(DomainError::from);
            };
            if let Ok(found) = tokio::time::timeout(timeout, find).await {
                return found.map_err(DomainError::from);
            }
            warn!(hostname = %lookup.hostname, ?timeout, "directory lookup timed out");
            Err(DomainError::LookupTimeout {
                hostname: lookup.hostname.clone(),
                timeout,
            })
        };

        let Some(token) = cancel else {
            return query.await;
        };
        tokio::select! {
            biased;

            () = token.cancelled() => {
                debug!(hostname = %lookup.hostname, "resolution cancelled");
                Err(DomainError::Cancelled)
            }

            found = query => found,
        }
    }

    /// Look up a tenant by id regardless of its status.
    ///
    /// # Errors
    ///
    /// [`DomainError::Directory`] if the directory cannot answer.
    #[tracing::instrument(skip_all, fields(tenant_id = %id))]
    pub async fn resolve_by_id(&self, id: TenantId) -> Result<Option<Tenant>, DomainError> {
        Ok(self.directory.get_tenant(id).await?)
    }

    pub fn invalidate(&self, raw: &str) {
        if let Some(clean) = self.hostnames.clean(raw) {
            self.cache.invalidate(&clean);
            debug!(hostname = %clean, "cached resolution invalidated");
        }
    }

    #[must_use]
    pub fn invalidate_by_tenant_id(&self, id: TenantId) -> usize {
        let removed = self.cache.invalidate_by_tenant_id(id);
        debug!(tenant_id = %id, removed, "cached resolutions invalidated");
        removed
    }

    /// # Errors
    ///
    /// [`DomainError::Unauthorized`] for non-operators, otherwise directory errors.
    #[tracing::instrument(skip_all, fields(tenant_id = %id, status = ?status))]
    pub async fn update_status(
        &self,
        ctx: &SecurityContext,
        id: TenantId,
        status: TenantStatus,
    ) -> Result<Tenant, DomainError> {
        require_operator(ctx, "update_status")?;
        let tenant = self.directory.update_status(id, status).await?;
        self.after_mutation(&tenant);
        Ok(tenant)
    }

    /// # Errors
    ///
    /// [`DomainError::Unauthorized`] for non-operators,
    /// [`DomainError::InvalidRequest`] for a malformed domain, otherwise
    /// directory errors.
    #[tracing::instrument(skip_all, fields(tenant_id = %id, domains = domains.len()))]
    pub async fn set_custom_domains(
        &self,
        ctx: &SecurityContext,
        id: TenantId,
        domains: Vec<String>,
    ) -> Result<Tenant, DomainError> {
        require_operator(ctx, "set_custom_domains")?;
        let normalized = domains
            .into_iter()
            .map(|raw| {
                normalize_domain(&raw)
                    .ok_or_else(|| DomainError::InvalidRequest(format!("invalid custom domain `{raw}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tenant = self.directory.set_custom_domains(id, normalized).await?;
        self.after_mutation(&tenant);
        Ok(tenant)
    }

    /// Replaces the subscription. A plan change resets limits to the new
    /// plan's defaults; otherwise the current limits are kept.
    ///
    /// # Errors
    ///
    /// [`DomainError::Unauthorized`] for non-operators,
    /// [`DomainError::InvalidRequest`] for an inverted billing period,
    /// otherwise directory errors.
    #[tracing::instrument(skip_all, fields(tenant_id = %id, plan = ?subscription.plan))]
    pub async fn change_subscription(
        &self,
        ctx: &SecurityContext,
        id: TenantId,
        subscription: Subscription,
    ) -> Result<Tenant, DomainError> {
        require_operator(ctx, "change_subscription")?;
        if subscription.current_period_end < subscription.current_period_start {
            return Err(DomainError::InvalidRequest(
                "billing period ends before it starts".to_owned(),
            ));
        }

        let current = self
            .directory
            .get_tenant(id)
            .await?
            .ok_or(DirectoryError::TenantNotFound(id))?;
        let limits = if current.subscription.plan == subscription.plan {
            current.limits
        } else {
            Limits::for_plan(subscription.plan)
        };

        let tenant = self
            .directory
            .update_subscription(id, subscription, limits)
            .await?;
        self.after_mutation(&tenant);
        Ok(tenant)
    }

    /// Drops the tenant's cached resolutions. A `resolve` that read the
    /// directory before this ran may still cache its older snapshot, which then
    /// lives for at most `cache_ttl`.
    fn after_mutation(&self, tenant: &Tenant) {
        let removed = self.cache.invalidate_by_tenant_id(tenant.id);
        info!(
            tenant_id = %tenant.id,
            status = ?tenant.status,
            removed,
            "tenant updated, cached resolutions dropped"
        );
    }
}

pub(crate) fn require_operator(
    ctx: &SecurityContext,
    operation: &'static str,
) -> Result<(), DomainError> {
    if ctx.is_operator() {
        return Ok(());
    }
    warn!(operation, subject_id = %ctx.subject_id(), "operator role required");
    Err(DomainError::Unauthorized { operation })
}
