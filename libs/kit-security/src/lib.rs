#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Security primitives shared by the tenancy layer.
//!
//! - [`SecurityContext`] carries what the session provider knows about the
//!   caller: an optional tenant, a subject and a [`Role`].
//! - [`TenantScope`] is a non-nil tenant identifier that every tenant-scoped
//!   data operation is bound to.

pub mod context;
pub mod scope;

pub use context::{Role, SecurityContext, SecurityContextBuilder};
pub use scope::{ScopeError, TenantScope};
