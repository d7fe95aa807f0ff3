#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Tenant Resolver SDK
//!
//! This crate provides the public API for the `tenant_resolver` module:
//!
//! - [`TenantResolverClient`] - hostname resolution for request handlers
//! - [`TenantAdminClient`] - operator-only tenant mutations
//! - [`DirectoryPluginClient`] - tenant directory backends
//! - [`ResolutionCachePluginClient`] - resolution cache backends
//! - [`Tenant`], [`TenantStatus`], [`TenantContext`], [`HostInfo`] - models
//! - [`TenantResolverError`], [`DirectoryError`] - error types
//!
//! ## Usage
//!
//! ```ignore
//! let ctx = resolver.resolve("acme.drivehub.app:443").await?;
//! match ctx.scope() {
//!     Some(scope) => { /* build a tenant gateway */ }
//!     None => { /* operator landing page */ }
//! }
//! ```

pub mod api;
pub mod context;
pub mod error;
pub mod models;
pub mod plugin_cache;
pub mod plugin_directory;

// Re-export main types at crate root
pub use api::{TenantAdminClient, TenantResolverClient};
pub use context::{HostInfo, TenantContext};
pub use error::{DirectoryError, TenantResolverError};
pub use models::{
    Domains, InvalidTransition, Limit, Limits, Owner, Plan, ResourceKind, Subscription,
    SubscriptionStatus, Tenant, TenantId, TenantStatus, is_valid_slug, normalize_domain,
};
pub use plugin_cache::ResolutionCachePluginClient;
pub use plugin_directory::{DirectoryPluginClient, HostLookup, NewTenant};
