//! The raw document store contract.
//!
//! Implementations execute exactly the filter they are given. Tenant isolation
//! is the job of the [`secure`](crate::secure) layer, which is the only code
//! that should call these methods on behalf of a request.

use async_trait::async_trait;
use serde_json::Value;

use crate::document::Document;
use crate::error::StoreError;
use crate::filter::Filter;
use crate::pipeline::{SortOrder, Stage};
use crate::update::Update;

/// Options for [`DocumentStore::find`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Vec<(String, SortOrder)>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    /// Fields to keep; `None` returns whole documents.
    pub projection: Option<Vec<String>>,
}

impl FindOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push((field.into(), order));
        self
    }

    #[must_use]
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = Some(n);
        self
    }

    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    #[must_use]
    pub fn project<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// Outcome of an update. Zero counts are a successful no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub modified: u64,
}

/// Outcome of a delete. Zero is a successful no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted: u64,
}

/// Shared document storage.
///
/// `multi = false` on update/delete affects at most the first match in
/// collection order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the backend cannot be queried.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Inserts documents, generating ids where missing. Returns the ids in input order.
    ///
    /// # Errors
    /// Returns [`StoreError::DuplicateKey`] if an id already exists for the same
    /// `tenant_id`; no document is inserted then.
    async fn insert(&self, collection: &str, docs: Vec<Document>)
    -> Result<Vec<String>, StoreError>;

    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the backend cannot be updated.
    async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        multi: bool,
    ) -> Result<UpdateResult, StoreError>;

    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the backend cannot be updated.
    async fn delete(
        &self,
        collection: &str,
        filter: &Filter,
        multi: bool,
    ) -> Result<DeleteResult, StoreError>;

    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the backend cannot be queried.
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the backend cannot be queried.
    async fn aggregate(&self, collection: &str, stages: &[Stage])
    -> Result<Vec<Document>, StoreError>;

    /// Distinct values of `field` among matching documents, in first-seen order.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the backend cannot be queried.
    async fn distinct(
        &self,
        collection: &str,
        field: &str,
        filter: &Filter,
    ) -> Result<Vec<Value>, StoreError>;
}
