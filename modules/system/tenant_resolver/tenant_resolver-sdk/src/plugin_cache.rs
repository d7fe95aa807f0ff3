//! Resolution cache plugin trait.
//!
//! The cache is an optimization only: every method is infallible and a cache
//! that always misses is a correct implementation.

use std::time::Duration;

use crate::models::{Tenant, TenantId};

/// Hostname-keyed cache of resolved tenants.
///
/// Implementations must be safe under concurrent use and must treat an
/// entry past its expiry as absent.
pub trait ResolutionCachePluginClient: Send + Sync {
    /// Cached tenant for a normalized hostname, if fresh.
    fn get(&self, hostname: &str) -> Option<Tenant>;

    /// Stores or overwrites the entry, expiring `ttl` from now.
    fn put(&self, hostname: &str, tenant: Tenant, ttl: Duration);

    fn invalidate(&self, hostname: &str);

    /// Removes every entry whose tenant has `id`. Returns the number removed.
    fn invalidate_by_tenant_id(&self, id: TenantId) -> usize;

    fn clear(&self);
}
