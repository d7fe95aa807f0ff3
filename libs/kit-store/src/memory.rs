//! In-process [`DocumentStore`] used by tests, demos and single-node setups.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use crate::document::{Document, ID_FIELD, TENANT_FIELD, id_of, lookup};
use crate::error::StoreError;
use crate::filter::Filter;
use crate::pipeline::{self, Stage, project, sort_documents};
use crate::store::{DeleteResult, DocumentStore, FindOptions, UpdateResult};
use crate::update::Update;

/// Collections of documents kept in insertion order behind a `RwLock`.
///
/// No lock is held across an `.await`.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a backend outage: every operation fails with
    /// [`StoreError::Unavailable`] while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("in-memory store is offline"));
        }
        Ok(())
    }

    fn matching(&self, collection: &str, filter: &Filter) -> Vec<Document> {
        self.collections
            .read()
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        self.ensure_online()?;
        let mut docs = self.matching(collection, filter);
        if !options.sort.is_empty() {
            sort_documents(&mut docs, &options.sort);
        }
        let docs = docs
            .into_iter()
            .skip(options.skip.unwrap_or(0))
            .take(options.limit.unwrap_or(usize::MAX));
        Ok(match &options.projection {
            Some(fields) => docs.map(|d| project(&d, fields)).collect(),
            None => docs.collect(),
        })
    }

    async fn insert(
        &self,
        collection: &str,
        docs: Vec<Document>,
    ) -> Result<Vec<String>, StoreError> {
        self.ensure_online()?;
        let mut prepared = Vec::with_capacity(docs.len());
        for mut doc in docs {
            let id = match doc.get(ID_FIELD) {
                None | Some(Value::Null) => Uuid::new_v4().to_string(),
                Some(Value::String(id)) if !id.is_empty() => id.clone(),
                Some(other) => {
                    return Err(StoreError::Invalid(format!(
                        "document id must be a non-empty string, got {other}"
                    )));
                }
            };
            doc.insert(ID_FIELD.to_owned(), Value::String(id.clone()));
            prepared.push((id, doc));
        }

        let mut guard = self.collections.write();
        let existing = guard.entry(collection.to_owned()).or_default();
        for (i, (id, doc)) in prepared.iter().enumerate() {
            let owner = doc.get(TENANT_FIELD);
            let same_key =
                |d: &Document| id_of(d) == Some(id.as_str()) && d.get(TENANT_FIELD) == owner;
            let clash_existing = existing.iter().any(same_key);
            let clash_batch = prepared[..i].iter().any(|(_, d)| same_key(d));
            if clash_existing || clash_batch {
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_owned(),
                    id: id.clone(),
                });
            }
        }

        let ids = prepared.iter().map(|(id, _)| id.clone()).collect();
        existing.extend(prepared.into_iter().map(|(_, doc)| doc));
        Ok(ids)
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        multi: bool,
    ) -> Result<UpdateResult, StoreError> {
        self.ensure_online()?;
        let mut result = UpdateResult::default();
        let mut guard = self.collections.write();
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(result);
        };
        for doc in docs.iter_mut().filter(|d| filter.matches(d)) {
            result.matched += 1;
            if update.apply(doc) {
                result.modified += 1;
            }
            if !multi {
                break;
            }
        }
        Ok(result)
    }

    async fn delete(
        &self,
        collection: &str,
        filter: &Filter,
        multi: bool,
    ) -> Result<DeleteResult, StoreError> {
        self.ensure_online()?;
        let mut guard = self.collections.write();
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(DeleteResult::default());
        };
        let before = docs.len();
        if multi {
            docs.retain(|d| !filter.matches(d));
        } else if let Some(pos) = docs.iter().position(|d| filter.matches(d)) {
            docs.remove(pos);
        }
        Ok(DeleteResult {
            deleted: (before - docs.len()) as u64,
        })
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        self.ensure_online()?;
        let guard = self.collections.read();
        let n = guard
            .get(collection)
            .map_or(0, |docs| docs.iter().filter(|d| filter.matches(d)).count());
        Ok(n as u64)
    }

    async fn aggregate(
        &self,
        collection: &str,
        stages: &[Stage],
    ) -> Result<Vec<Document>, StoreError> {
        self.ensure_online()?;
        let docs = self.matching(collection, &Filter::All);
        Ok(pipeline::run(stages, docs))
    }

    async fn distinct(
        &self,
        collection: &str,
        field: &str,
        filter: &Filter,
    ) -> Result<Vec<Value>, StoreError> {
        self.ensure_online()?;
        let mut values: Vec<Value> = Vec::new();
        for doc in self.matching(collection, filter) {
            if let Some(v) = lookup(&doc, field)
                && !values.contains(v)
            {
                values.push(v.clone());
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_generates_ids_and_rejects_duplicates() {
        let store = InMemoryStore::new();
        let ids = store
            .insert("vehicles", vec![doc(json!({ "plate": "A" })), doc(json!({ "id": "v2" }))])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1], "v2");

        let err = store
            .insert("vehicles", vec![doc(json!({ "id": "v3" })), doc(json!({ "id": "v2" }))])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        assert_eq!(store.count("vehicles", &Filter::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn ids_are_unique_per_tenant() {
        let store = InMemoryStore::new();
        store
            .insert("bookings", vec![doc(json!({ "id": "b1", "tenant_id": "t1" }))])
            .await
            .unwrap();
        store
            .insert("bookings", vec![doc(json!({ "id": "b1", "tenant_id": "t2" }))])
            .await
            .unwrap();

        let err = store
            .insert("bookings", vec![doc(json!({ "id": "b1", "tenant_id": "t2" }))])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        assert_eq!(store.count("bookings", &Filter::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn single_update_and_delete_touch_first_match_only() {
        let store = InMemoryStore::new();
        store
            .insert(
                "vehicles",
                vec![
                    doc(json!({ "id": "a", "status": "idle" })),
                    doc(json!({ "id": "b", "status": "idle" })),
                ],
            )
            .await
            .unwrap();

        let filter = Filter::eq("status", "idle");
        let res = store
            .update("vehicles", &filter, &Update::new().set("status", "rented"), false)
            .await
            .unwrap();
        assert_eq!(res, UpdateResult { matched: 1, modified: 1 });

        let res = store.delete("vehicles", &filter, false).await.unwrap();
        assert_eq!(res.deleted, 1);
        assert_eq!(store.count("vehicles", &Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_with_options() {
        let store = InMemoryStore::new();
        store
            .insert(
                "vehicles",
                (1..=5)
                    .map(|n| doc(json!({ "id": format!("v{n}"), "seats": n, "make": "Fiat" })))
                    .collect(),
            )
            .await
            .unwrap();

        let opts = FindOptions::new()
            .sort_by("seats", pipeline::SortOrder::Desc)
            .skip(1)
            .limit(2)
            .project(["seats"]);
        let docs = store.find("vehicles", &Filter::All, &opts).await.unwrap();
        assert_eq!(
            docs,
            vec![doc(json!({ "id": "v4", "seats": 4 })), doc(json!({ "id": "v3", "seats": 3 }))]
        );
    }

    #[tokio::test]
    async fn offline_store_fails() {
        let store = InMemoryStore::new();
        store.set_offline(true);
        let err = store.count("vehicles", &Filter::All).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn distinct_values_in_first_seen_order() {
        let store = InMemoryStore::new();
        store
            .insert(
                "vehicles",
                vec![
                    doc(json!({ "make": "Fiat" })),
                    doc(json!({ "make": "Renault" })),
                    doc(json!({ "make": "Fiat" })),
                ],
            )
            .await
            .unwrap();
        let makes = store.distinct("vehicles", "make", &Filter::All).await.unwrap();
        assert_eq!(makes, vec![json!("Fiat"), json!("Renault")]);
    }
}
