//! Tenant-scoped access to the shared document store.
//!
//! Request-handling code never talks to a [`DocumentStore`](crate::DocumentStore)
//! directly. It obtains a [`TenantGateway`] bound to a [`TenantScope`] and works
//! through [`ScopedCollection`] handles:
//!
//! - every filter is wrapped into a [`ScopedFilter`] that ANDs
//!   `tenant_id == <bound tenant>` with the caller's predicate;
//! - every aggregation is a [`ScopedPipeline`] whose first stage is the tenant match;
//! - inserts overwrite any caller-supplied `tenant_id`;
//! - updates silently drop writes to `tenant_id` and `id`.
//!
//! A gateway cannot be built without a scope, and a scope cannot hold a nil
//! tenant, so "no tenant" never turns into "all tenants".
//!
//! ```
//! use kit_store::Filter;
//! use kit_store::secure::ScopedFilter;
//! use kit_security::TenantScope;
//! use uuid::Uuid;
//!
//! let scope = TenantScope::new(Uuid::new_v4()).unwrap();
//! let scoped = ScopedFilter::new(&scope, Filter::eq("status", "active"));
//! assert!(matches!(scoped.as_filter(), Filter::And(parts) if parts.len() == 2));
//! ```
//!
//! Operator tooling that must see every tenant uses [`RawCollection`], which
//! requires an operator [`SecurityContext`](kit_security::SecurityContext).
//!
//! [`TenantScope`]: kit_security::TenantScope

mod gateway;
mod raw;
mod scoped;

pub use gateway::{ScopedCollection, TenantGateway};
pub use raw::RawCollection;
pub use scoped::{ScopedFilter, ScopedPipeline};
