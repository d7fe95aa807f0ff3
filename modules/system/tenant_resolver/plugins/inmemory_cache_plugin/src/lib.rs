//! In-memory resolution cache plugin for the tenant resolver.
//!
//! Hostname-keyed, `DashMap`-backed, with a TTL per entry and a capacity
//! bound. Expired entries are dropped lazily on read and in bulk when the
//! capacity is exceeded.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;


pub use config::InMemoryCachePluginConfig;
pub use domain::Service;
