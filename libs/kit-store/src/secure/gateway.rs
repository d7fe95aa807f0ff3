use std::sync::Arc;

use kit_security::TenantScope;
use serde_json::Value;

use crate::document::{Document, ID_FIELD, TENANT_FIELD};
use crate::error::StoreError;
use crate::filter::Filter;
use crate::pipeline::Stage;
use crate::store::{DeleteResult, DocumentStore, FindOptions, UpdateResult};
use crate::update::Update;

use super::scoped::{ScopedFilter, ScopedPipeline, tenant_value};

/// Tenant-bound entry point to a [`DocumentStore`].
///
/// Cheap to clone; the store is shared behind an `Arc`.
pub struct TenantGateway<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    scope: TenantScope,
}

impl<S: DocumentStore + ?Sized> Clone for TenantGateway<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            scope: self.scope,
        }
    }
}

impl<S: DocumentStore + ?Sized> std::fmt::Debug for TenantGateway<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantGateway")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl<S: DocumentStore + ?Sized> TenantGateway<S> {
    pub fn new(store: Arc<S>, scope: TenantScope) -> Self {
        Self { store, scope }
    }

    #[must_use]
    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    /// Handle to one collection, bound to this gateway's tenant.
    #[must_use]
    pub fn collection(&self, name: impl Into<String>) -> ScopedCollection<S> {
        ScopedCollection {
            store: Arc::clone(&self.store),
            scope: self.scope,
            name: name.into(),
        }
    }
}

/// One collection seen through a tenant scope.
///
/// Absent documents (including documents of other tenants) are reported as
/// `None` or zero counts, never as errors.
pub struct ScopedCollection<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    scope: TenantScope,
    name: String,
}

impl<S: DocumentStore + ?Sized> ScopedCollection<S> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn scoped(&self, filter: Filter) -> ScopedFilter {
        ScopedFilter::new(&self.scope, filter)
    }

    fn stamp(&self, mut doc: Document) -> Document {
        doc.insert(TENANT_FIELD.to_owned(), tenant_value(&self.scope));
        doc
    }

    fn sanitize(&self, update: Update, operation: &'static str) -> Update {
        let mut update = update;
        for field in [TENANT_FIELD, ID_FIELD] {
            if update.touches(field) {
                tracing::warn!(
                    collection = %self.name,
                    tenant = %self.scope,
                    operation,
                    field,
                    "dropping write to protected field"
                );
                update = update.without(field);
            }
        }
        update
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn find_many(
        &self,
        filter: Filter,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let filter = self.scoped(filter);
        self.store
            .find(&self.name, filter.as_filter(), &options)
            .await
    }

    /// First match in store order, if any.
    ///
    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn find_one(&self, filter: Filter) -> Result<Option<Document>, StoreError> {
        let filter = self.scoped(filter);
        let mut docs = self
            .store
            .find(&self.name, filter.as_filter(), &FindOptions::new().limit(1))
            .await?;
        Ok(docs.pop())
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.find_one(Filter::eq(ID_FIELD, id)).await
    }

    /// Inserts a document owned by this tenant and returns its id.
    ///
    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn insert_one(&self, doc: Document) -> Result<String, StoreError> {
        let mut ids = self.insert_many(vec![doc]).await?;
        ids.pop()
            .ok_or_else(|| StoreError::unavailable("store returned no id for insert"))
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn insert_many(&self, docs: Vec<Document>) -> Result<Vec<String>, StoreError> {
        let docs = docs.into_iter().map(|d| self.stamp(d)).collect();
        self.store.insert(&self.name, docs).await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn update_one(
        &self,
        filter: Filter,
        update: Update,
    ) -> Result<UpdateResult, StoreError> {
        self.update(filter, update, false, "update_one").await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn update_by_id(&self, id: &str, update: Update) -> Result<UpdateResult, StoreError> {
        self.update(Filter::eq(ID_FIELD, id), update, false, "update_by_id")
            .await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn update_many(
        &self,
        filter: Filter,
        update: Update,
    ) -> Result<UpdateResult, StoreError> {
        self.update(filter, update, true, "update_many").await
    }

    async fn update(
        &self,
        filter: Filter,
        update: Update,
        multi: bool,
        operation: &'static str,
    ) -> Result<UpdateResult, StoreError> {
        let update = self.sanitize(update, operation);
        let filter = self.scoped(filter);
        if update.is_empty() {
            let matched = if multi {
                self.store.count(&self.name, filter.as_filter()).await?
            } else {
                u64::from(self.store.count(&self.name, filter.as_filter()).await? > 0)
            };
            return Ok(UpdateResult {
                matched,
                modified: 0,
            });
        }
        self.store
            .update(&self.name, filter.as_filter(), &update, multi)
            .await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn delete_one(&self, filter: Filter) -> Result<DeleteResult, StoreError> {
        let filter = self.scoped(filter);
        self.store.delete(&self.name, filter.as_filter(), false).await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn delete_by_id(&self, id: &str) -> Result<DeleteResult, StoreError> {
        self.delete_one(Filter::eq(ID_FIELD, id)).await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn delete_many(&self, filter: Filter) -> Result<DeleteResult, StoreError> {
        let filter = self.scoped(filter);
        self.store.delete(&self.name, filter.as_filter(), true).await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn count(&self, filter: Filter) -> Result<u64, StoreError> {
        let filter = self.scoped(filter);
        self.store.count(&self.name, filter.as_filter()).await
    }

    /// Runs `stages` after the tenant match stage.
    ///
    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn aggregate(&self, stages: Vec<Stage>) -> Result<Vec<Document>, StoreError> {
        let pipeline = ScopedPipeline::new(&self.scope, stages);
        self.store.aggregate(&self.name, pipeline.stages()).await
    }

    /// # Errors
    /// Propagates [`StoreError`] from the backing store.
    pub async fn distinct(&self, field: &str, filter: Filter) -> Result<Vec<Value>, StoreError> {
        let filter = self.scoped(filter);
        self.store
            .distinct(&self.name, field, filter.as_filter())
            .await
    }
}
