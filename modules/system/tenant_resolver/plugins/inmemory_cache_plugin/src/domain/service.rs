//! Service implementation for in-memory cache plugin.

use std::time::Duration;

use dashmap::DashMap;
use tenant_resolver_sdk::{Tenant, TenantId};
use tokio::time::Instant;

use crate::config::InMemoryCachePluginConfig;

struct Entry {
    tenant: Tenant,
    expires_at: Instant,
}

/// In-memory resolution cache with per-entry TTL.
pub struct Service {
    entries: DashMap<String, Entry>,
    max_entries: usize,
    max_ttl: Option<Duration>,
}

impl Service {
    /// Create a new service holding at most `max_entries` entries.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            max_ttl: None,
        }
    }

    #[must_use]
    pub fn from_config(cfg: &InMemoryCachePluginConfig) -> Self {
        Self {
            max_ttl: cfg.max_ttl,
            ..Self::new(cfg.max_entries)
        }
    }

    /// Physically present entries, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(super) fn get(&self, hostname: &str) -> Option<Tenant> {
        let now = Instant::now();
        let lookup = self
            .entries
            .get(hostname)
            .map(|e| (now < e.expires_at).then(|| e.tenant.clone()));
        match lookup {
            Some(Some(tenant)) => Some(tenant),
            Some(None) => {
                self.entries.remove_if(hostname, |_, e| e.expires_at <= now);
                tracing::trace!(hostname, "expired cache entry dropped");
                None
            }
            None => None,
        }
    }

    pub(super) fn put(&self, hostname: &str, tenant: Tenant, ttl: Duration) {
        let ttl = self.max_ttl.map_or(ttl, |max| ttl.min(max));
        let now = Instant::now();
        self.entries.insert(
            hostname.to_owned(),
            Entry {
                tenant,
                expires_at: now + ttl,
            },
        );
        if self.entries.len() > self.max_entries {
            self.evict(now);
        }
    }

    /// Purges expired entries, then the entries closest to expiry until within capacity.
    fn evict(&self, now: Instant) {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.expires_at > now);
        while self.entries.len() > self.max_entries {
            let victim = self
                .entries
                .iter()
                .min_by_key(|e| e.value().expires_at)
                .map(|e| e.key().clone());
            match victim {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
        tracing::debug!(
            evicted = before.saturating_sub(self.entries.len()),
            remaining = self.entries.len(),
            "resolution cache over capacity"
        );
    }

    pub(super) fn invalidate(&self, hostname: &str) {
        self.entries.remove(hostname);
    }

    pub(super) fn invalidate_by_tenant_id(&self, id: TenantId) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, e| {
            let keep = e.tenant.id != id;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub(super) fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for Service {
    fn default() -> Self {
        Self::from_config(&InMemoryCachePluginConfig::default())
    }
}
