//! Client implementation for the static tenant directory plugin.
//!
//! Implements `DirectoryPluginClient` using the domain service.

use async_trait::async_trait;
use tenant_resolver_sdk::{
    DirectoryError, DirectoryPluginClient, HostLookup, Limits, NewTenant, Subscription, Tenant,
    TenantId, TenantStatus,
};

use super::service::Service;

#[async_trait]
impl DirectoryPluginClient for Service {
    async fn find_by_host(&self, lookup: &HostLookup) -> Result<Vec<Tenant>, DirectoryError> {
        Ok(Service::find_by_host(self, lookup))
    }

    async fn get_tenant(&self, id: TenantId) -> Result<Option<Tenant>, DirectoryError> {
        Ok(self.get(id))
    }

    async fn create_tenant(&self, tenant: NewTenant) -> Result<Tenant, DirectoryError> {
        self.create(tenant)
    }

    async fn update_status(
        &self,
        id: TenantId,
        status: TenantStatus,
    ) -> Result<Tenant, DirectoryError> {
        Service::update_status(self, id, status)
    }

    async fn set_custom_domains(
        &self,
        id: TenantId,
        domains: Vec<String>,
    ) -> Result<Tenant, DirectoryError> {
        Service::set_custom_domains(self, id, &domains)
    }

    async fn update_subscription(
        &self,
        id: TenantId,
        subscription: Subscription,
        limits: Limits,
    ) -> Result<Tenant, DirectoryError> {
        Service::update_subscription(self, id, subscription, limits)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use tenant_resolver_sdk::{Domains, Owner, Plan, SubscriptionStatus};
    use uuid::Uuid;

    use super::*;

    fn new_tenant(slug: &str) -> NewTenant {
        let now = Utc::now();
        NewTenant {
            name: slug.to_owned(),
            slug: slug.to_owned(),
            domains: Domains::for_slug(slug, "example.com"),
            owner: Owner {
                user_id: Uuid::new_v4(),
                name: "Owner".to_owned(),
                email: "owner@example.com".to_owned(),
            },
            subscription: Subscription {
                plan: Plan::Starter,
                status: SubscriptionStatus::Trialing,
                current_period_start: now,
                current_period_end: now,
            },
            limits: Limits::for_plan(Plan::Starter),
        }
    }

    #[tokio::test]
    async fn create_then_resolve_through_trait() {
        let dir: Arc<dyn DirectoryPluginClient> = Arc::new(Service::new("example.com"));
        let created = dir.create_tenant(new_tenant("acme")).await.unwrap();
        assert_eq!(created.status, TenantStatus::Active);

        let found = dir
            .find_by_host(&HostLookup {
                hostname: "acme.example.com".to_owned(),
                slug: Some("acme".to_owned()),
                status: TenantStatus::Active,
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
        assert_eq!(dir.get_tenant(created.id).await.unwrap().unwrap().slug, "acme");
    }

    #[tokio::test]
    async fn concurrent_creates_cannot_share_slug() {
        let dir = Arc::new(Service::new("example.com"));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dir = Arc::clone(&dir);
                tokio::spawn(async move { dir.create_tenant(new_tenant("acme")).await })
            })
            .collect();

        let mut created = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert!(matches!(e, DirectoryError::SlugTaken(_))),
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn subscription_update_replaces_limits() {
        let dir: Arc<dyn DirectoryPluginClient> = Arc::new(Service::new("example.com"));
        let t = dir.create_tenant(new_tenant("acme")).await.unwrap();
        let mut sub = t.subscription.clone();
        sub.plan = Plan::Enterprise;
        let updated = dir
            .update_subscription(t.id, sub, Limits::for_plan(Plan::Enterprise))
            .await
            .unwrap();
        assert_eq!(updated.subscription.plan, Plan::Enterprise);
        assert_eq!(updated.limits, Limits::for_plan(Plan::Enterprise));
        assert!(updated.updated_at >= t.updated_at);
    }
}
