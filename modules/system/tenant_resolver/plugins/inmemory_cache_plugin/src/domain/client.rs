//! Client implementation for in-memory cache plugin.

use std::time::Duration;

use tenant_resolver_sdk::{ResolutionCachePluginClient, Tenant, TenantId};

use super::service::Service;

impl ResolutionCachePluginClient for Service {
    fn get(&self, hostname: &str) -> Option<Tenant> {
        Service::get(self, hostname)
    }

    fn put(&self, hostname: &str, tenant: Tenant, ttl: Duration) {
        Service::put(self, hostname, tenant, ttl);
    }

    fn invalidate(&self, hostname: &str) {
        Service::invalidate(self, hostname);
    }

    fn invalidate_by_tenant_id(&self, id: TenantId) -> usize {
        Service::invalidate_by_tenant_id(self, id)
    }

    fn clear(&self) {
        Service::clear(self);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use tenant_resolver_sdk::{
        Domains, Limits, Owner, Plan, Subscription, SubscriptionStatus, TenantStatus,
    };
    use uuid::Uuid;

    use super::*;
    use crate::config::InMemoryCachePluginConfig;

    const TTL: Duration = Duration::from_secs(300);

    fn make_tenant(slug: &str) -> Tenant {
        let now = Utc::now();
        Tenant {
            id: Uuid::new_v4(),
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
                status: SubscriptionStatus::Active,
                current_period_start: now,
                current_period_end: now,
            },
            limits: Limits::for_plan(Plan::Starter),
            status: TenantStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn cache(max_entries: usize) -> Arc<dyn ResolutionCachePluginClient> {
        Arc::new(Service::new(max_entries))
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = cache(10);
        let acme = make_tenant("acme");
        cache.put("acme.example.com", acme.clone(), TTL);

        tokio::time::advance(TTL - Duration::from_secs(1)).await;
        assert_eq!(cache.get("acme.example.com"), Some(acme));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("acme.example.com"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_removed_on_read() {
        let svc = Service::new(10);
        svc.put("acme.example.com", make_tenant("acme"), Duration::from_secs(1));
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(svc.len(), 1);
        assert!(Service::get(&svc, "acme.example.com").is_none());
        assert!(svc.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_overwrites_and_restarts_ttl() {
        let cache = cache(10);
        let first = make_tenant("acme");
        let second = make_tenant("acme");
        cache.put("acme.example.com", first, Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.put("acme.example.com", second.clone(), Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("acme.example.com"), Some(second));
    }

    #[tokio::test]
    async fn test_invalidate_by_tenant_id_removes_every_host() {
        let cache = cache(10);
        let acme = make_tenant("acme");
        let globex = make_tenant("globex");
        cache.put("acme.example.com", acme.clone(), TTL);
        cache.put("rent.acme.com", acme.clone(), TTL);
        cache.put("globex.example.com", globex.clone(), TTL);

        assert_eq!(cache.invalidate_by_tenant_id(acme.id), 2);
        assert_eq!(cache.get("acme.example.com"), None);
        assert_eq!(cache.get("rent.acme.com"), None);
        assert_eq!(cache.get("globex.example.com"), Some(globex));
        assert_eq!(cache.invalidate_by_tenant_id(acme.id), 0);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = cache(10);
        cache.put("a.example.com", make_tenant("a"), TTL);
        cache.put("b.example.com", make_tenant("b"), TTL);
        cache.invalidate("a.example.com");
        assert!(cache.get("a.example.com").is_none());
        assert!(cache.get("b.example.com").is_some());
        cache.clear();
        assert!(cache.get("b.example.com").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_closest_to_expiry() {
        let svc = Service::new(2);
        svc.put("a.example.com", make_tenant("a"), Duration::from_secs(10));
        svc.put("b.example.com", make_tenant("b"), Duration::from_secs(100));
        svc.put("c.example.com", make_tenant("c"), Duration::from_secs(50));

        assert_eq!(svc.len(), 2);
        assert!(Service::get(&svc, "a.example.com").is_none());
        assert!(Service::get(&svc, "b.example.com").is_some());
        assert!(Service::get(&svc, "c.example.com").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_ttl_caps_requested_ttl() {
        let svc = Service::from_config(&InMemoryCachePluginConfig {
            max_entries: 10,
            max_ttl: Some(Duration::from_secs(30)),
        });
        svc.put("a.example.com", make_tenant("a"), TTL);
        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(Service::get(&svc, "a.example.com").is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_access() {
        let svc = Arc::new(Service::new(64));
        let tenants: Vec<Tenant> = (0..16).map(|i| make_tenant(&format!("t{i}"))).collect();
        let mut handles = Vec::new();
        for (i, tenant) in tenants.into_iter().enumerate() {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                let host = format!("t{i}.example.com");
                for _ in 0..100 {
                    svc.put(&host, tenant.clone(), TTL);
                    assert!(Service::get(&svc, &host).is_some());
                    svc.invalidate_by_tenant_id(tenant.id);
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
    }
}
