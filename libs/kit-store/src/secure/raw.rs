use std::sync::Arc;

use kit_security::SecurityContext;
use serde_json::Value;

use crate::document::Document;
use crate::error::StoreError;
use crate::filter::Filter;
use crate::pipeline::Stage;
use crate::store::{DocumentStore, FindOptions};

/// Unscoped read access for operator tooling (reporting, migrations, support).
///
/// Only constructible from an operator [`SecurityContext`]. Writes are not
/// exposed; tenant data is changed through a [`TenantGateway`](super::TenantGateway).
pub struct RawCollection<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    name: String,
}

impl<S: DocumentStore + ?Sized> RawCollection<S> {
    /// # Errors
    /// Returns [`StoreError::Invalid`] when `ctx` is not an operator context.
    pub fn for_operator(
        ctx: &SecurityContext,
        store: Arc<S>,
        name: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let name = name.into();
        if !ctx.is_operator() {
            tracing::warn!(
                subject = %ctx.subject_id(),
                collection = %name,
                "unscoped collection access denied"
            );
            return Err(StoreError::Invalid(
                "unscoped access requires an operator context".to_owned(),
            ));
        }
        tracing::info!(subject = %ctx.subject_id(), collection = %name, "unscoped collection access");
        Ok(Self { store, name })
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn find_many(
        &self,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        self.store.find(&self.name, &filter, &options).await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn count(&self, filter: Filter) -> Result<u64, StoreError> {
        self.store.count(&self.name, &filter).await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn aggregate(&self, stages: Vec<Stage>) -> Result<Vec<Document>, StoreError> {
        self.store.aggregate(&self.name, &stages).await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn distinct(&self, field: &str, filter: Filter) -> Result<Vec<Value>, StoreError> {
        self.store.distinct(&self.name, field, &filter).await
    }
}
