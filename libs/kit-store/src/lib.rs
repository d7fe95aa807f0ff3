#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Shared document store with tenant-scoped access.
//!
//! The crate has two layers:
//!
//! - the raw store: [`DocumentStore`], [`Filter`], [`Update`], [`Stage`] and an
//!   [`InMemoryStore`] implementation;
//! - the [`secure`] layer: [`TenantGateway`](secure::TenantGateway), the only
//!   sanctioned path for request-handling code. Every filter it executes is a
//!   [`ScopedFilter`](secure::ScopedFilter) and every pipeline starts with the
//!   tenant match stage.
//!
//! ```
//! use std::sync::Arc;
//! use kit_store::{Filter, InMemoryStore};
//! use kit_store::secure::TenantGateway;
//! use kit_security::TenantScope;
//! use serde_json::json;
//! use uuid::Uuid;
//!
//! # tokio_test_block(async {
//! let store = Arc::new(InMemoryStore::new());
//! let scope = TenantScope::new(Uuid::new_v4()).unwrap();
//! let gateway = TenantGateway::new(store, scope);
//!
//! let vehicles = gateway.collection("vehicles");
//! let id = vehicles
//!     .insert_one(json!({ "plate": "AB-123" }).as_object().cloned().unwrap())
//!     .await
//!     .unwrap();
//! let found = vehicles.find_by_id(&id).await.unwrap();
//! assert!(found.is_some());
//! assert_eq!(vehicles.count(Filter::eq("plate", "AB-123")).await.unwrap(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod document;
pub mod error;
pub mod filter;
pub mod memory;
pub mod pipeline;
pub mod secure;
pub mod store;
pub mod update;

pub use document::{Document, ID_FIELD, TENANT_FIELD};
pub use error::StoreError;
pub use filter::Filter;
pub use memory::InMemoryStore;
pub use pipeline::{Accumulator, SortOrder, Stage};
pub use store::{DeleteResult, DocumentStore, FindOptions, UpdateResult};
pub use update::Update;
