//! Client implementation for no-cache plugin.

use std::time::Duration;

use tenant_resolver_sdk::{ResolutionCachePluginClient, Tenant, TenantId};

use super::service::Service;

impl ResolutionCachePluginClient for Service {
    fn get(&self, _hostname: &str) -> Option<Tenant> {
        None
    }

    fn put(&self, _hostname: &str, _tenant: Tenant, _ttl: Duration) {}

    fn invalidate(&self, _hostname: &str) {}

    fn invalidate_by_tenant_id(&self, _id: TenantId) -> usize {
        0
    }

    fn clear(&self) {}
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use chrono::Utc;
    use tenant_resolver_sdk::{
        Domains, Limits, Owner, Plan, Subscription, SubscriptionStatus, TenantStatus,
    };
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_put_then_get_misses() {
        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: "Acme".to_owned(),
            slug: "acme".to_owned(),
            domains: Domains::for_slug("acme", "example.com"),
            owner: Owner {
                user_id: Uuid::new_v4(),
                name: "Owner".to_owned(),
                email: "owner@example.com".to_owned(),
            },
            subscription: Subscription {
                plan: Plan::Starter,
                status: SubscriptionStatus::Active,
                current_period_start: now,
                current_period_end: now,
            },
            limits: Limits::default(),
            status: TenantStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let id = tenant.id;
        let cache: &dyn ResolutionCachePluginClient = &Service::new();
        cache.put("acme.example.com", tenant, Duration::from_secs(300));
        assert!(cache.get("acme.example.com").is_none());
        assert_eq!(cache.invalidate_by_tenant_id(id), 0);
    }
}
