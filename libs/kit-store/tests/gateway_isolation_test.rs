#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Cross-tenant isolation through `TenantGateway`.

use std::sync::Arc;

use kit_security::{Role, SecurityContext, TenantScope};
use kit_store::secure::{RawCollection, TenantGateway};
use kit_store::{
    Accumulator, Document, DocumentStore, Filter, FindOptions, InMemoryStore, SortOrder, Stage,
    StoreError, TENANT_FIELD, Update,
};
use serde_json::{Value, json};
use tracing_test::traced_test;
use uuid::Uuid;

fn doc(v: Value) -> Document {
    v.as_object().cloned().unwrap()
}

struct Fixture {
    store: Arc<InMemoryStore>,
    acme: TenantGateway<InMemoryStore>,
    globex: TenantGateway<InMemoryStore>,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let acme = TenantGateway::new(store.clone(), TenantScope::new(Uuid::new_v4()).unwrap());
    let globex = TenantGateway::new(store.clone(), TenantScope::new(Uuid::new_v4()).unwrap());
    Fixture { store, acme, globex }
}

#[tokio::test]
async fn other_tenant_record_is_absent_not_forbidden() {
    let f = fixture();
    let id = f
        .acme
        .collection("vehicles")
        .insert_one(doc(json!({ "plate": "ACME-1" })))
        .await
        .unwrap();

    let theirs = f.globex.collection("vehicles");
    assert!(theirs.find_by_id(&id).await.unwrap().is_none());
    assert!(theirs.find_one(Filter::eq("plate", "ACME-1")).await.unwrap().is_none());
    assert_eq!(theirs.count(Filter::All).await.unwrap(), 0);
    assert!(theirs.find_many(Filter::All, FindOptions::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn record_ids_do_not_collide_across_tenants() {
    let f = fixture();
    let mine = f.acme.collection("bookings");
    mine.insert_one(doc(json!({ "id": "booking-1", "ref": "A" })))
        .await
        .unwrap();

    let theirs = f.globex.collection("bookings");
    assert!(theirs.find_by_id("booking-1").await.unwrap().is_none());
    let id = theirs
        .insert_one(doc(json!({ "id": "booking-1", "ref": "G" })))
        .await
        .unwrap();
    assert_eq!(id, "booking-1");

    let err = theirs
        .insert_one(doc(json!({ "id": "booking-1", "ref": "G2" })))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { .. }));

    assert_eq!(mine.find_by_id("booking-1").await.unwrap().unwrap()["ref"], "A");
    assert_eq!(theirs.find_by_id("booking-1").await.unwrap().unwrap()["ref"], "G");
    assert_eq!(f.store.count("bookings", &Filter::All).await.unwrap(), 2);
}

#[tokio::test]
async fn smuggled_tenant_id_is_overwritten_on_insert() {
    let f = fixture();
    let globex_id = f.globex.scope().tenant_id().to_string();

    let id = f
        .acme
        .collection("bookings")
        .insert_one(doc(json!({ "tenant_id": globex_id, "ref": "B-1" })))
        .await
        .unwrap();

    let stored = f.acme.collection("bookings").find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(
        stored[TENANT_FIELD],
        json!(f.acme.scope().tenant_id().to_string())
    );
    assert!(f.globex.collection("bookings").find_by_id(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn insert_many_stamps_every_document() {
    let f = fixture();
    let users = f.acme.collection("users");
    let ids = users
        .insert_many(vec![
            doc(json!({ "email": "a@acme.test" })),
            doc(json!({ "email": "b@acme.test", "tenant_id": "spoofed" })),
        ])
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);

    let raw = f.store.count("users", &Filter::eq(TENANT_FIELD, "spoofed")).await.unwrap();
    assert_eq!(raw, 0);
    assert_eq!(users.count(Filter::All).await.unwrap(), 2);
}

#[tokio::test]
async fn cross_tenant_mutations_are_zero_count_no_ops() {
    let f = fixture();
    let id = f
        .acme
        .collection("vehicles")
        .insert_one(doc(json!({ "plate": "ACME-1", "status": "idle" })))
        .await
        .unwrap();

    let theirs = f.globex.collection("vehicles");
    let upd = theirs
        .update_by_id(&id, Update::new().set("status", "stolen"))
        .await
        .unwrap();
    assert_eq!((upd.matched, upd.modified), (0, 0));

    let del = theirs.delete_by_id(&id).await.unwrap();
    assert_eq!(del.deleted, 0);
    let del = theirs.delete_many(Filter::All).await.unwrap();
    assert_eq!(del.deleted, 0);

    let mine = f.acme.collection("vehicles").find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(mine["status"], json!("idle"));
}

#[tokio::test]
async fn deleting_missing_record_returns_zero() {
    let f = fixture();
    let res = f.acme.collection("vehicles").delete_by_id("nope").await.unwrap();
    assert_eq!(res.deleted, 0);
}

#[tokio::test]
#[traced_test]
async fn update_cannot_move_record_to_another_tenant() {
    let f = fixture();
    let vehicles = f.acme.collection("vehicles");
    let id = vehicles.insert_one(doc(json!({ "plate": "ACME-1" }))).await.unwrap();

    let res = vehicles
        .update_by_id(
            &id,
            Update::new()
                .set(TENANT_FIELD, f.globex.scope().tenant_id().to_string())
                .set("id", "hijacked")
                .set("plate", "ACME-2"),
        )
        .await
        .unwrap();
    assert_eq!((res.matched, res.modified), (1, 1));

    let stored = vehicles.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored["plate"], json!("ACME-2"));
    assert_eq!(stored[TENANT_FIELD], json!(f.acme.scope().tenant_id().to_string()));
    assert!(logs_contain("dropping write to protected field"));
}

#[tokio::test]
async fn update_touching_only_protected_fields_modifies_nothing() {
    let f = fixture();
    let vehicles = f.acme.collection("vehicles");
    let id = vehicles.insert_one(doc(json!({ "plate": "ACME-1" }))).await.unwrap();

    let res = vehicles
        .update_by_id(&id, Update::new().unset(TENANT_FIELD))
        .await
        .unwrap();
    assert_eq!((res.matched, res.modified), (1, 0));
    assert!(vehicles.find_by_id(&id).await.unwrap().is_some());
}

#[tokio::test]
async fn aggregate_sees_only_own_tenant() {
    let f = fixture();
    for (gw, seats) in [(&f.acme, 4), (&f.acme, 5), (&f.globex, 50)] {
        gw.collection("vehicles")
            .insert_one(doc(json!({ "seats": seats })))
            .await
            .unwrap();
    }

    let out = f
        .acme
        .collection("vehicles")
        .aggregate(vec![
            Stage::Match(Filter::All.or(Filter::eq(TENANT_FIELD, f.globex.scope().tenant_id().to_string()))),
            Stage::Group {
                key: None,
                accumulators: vec![
                    Accumulator::Count { output: "n".into() },
                    Accumulator::Sum { output: "seats".into(), field: "seats".into() },
                ],
            },
        ])
        .await
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["n"], json!(2));
    assert_eq!(out[0]["seats"], json!(9));
}

#[tokio::test]
async fn distinct_and_sorted_find_are_scoped() {
    let f = fixture();
    for make in ["Fiat", "Audi"] {
        f.acme.collection("vehicles").insert_one(doc(json!({ "make": make }))).await.unwrap();
    }
    f.globex.collection("vehicles").insert_one(doc(json!({ "make": "Tesla" }))).await.unwrap();

    let vehicles = f.acme.collection("vehicles");
    let makes = vehicles.distinct("make", Filter::All).await.unwrap();
    assert_eq!(makes, vec![json!("Fiat"), json!("Audi")]);

    let sorted = vehicles
        .find_many(Filter::All, FindOptions::new().sort_by("make", SortOrder::Asc))
        .await
        .unwrap();
    let makes: Vec<_> = sorted.iter().map(|d| d["make"].clone()).collect();
    assert_eq!(makes, vec![json!("Audi"), json!("Fiat")]);
}

#[tokio::test]
async fn unavailable_store_surfaces_as_error() {
    let f = fixture();
    f.store.set_offline(true);
    let err = f.acme.collection("vehicles").count(Filter::All).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { .. }));
}

#[tokio::test]
async fn raw_collection_requires_operator() {
    let f = fixture();
    f.acme.collection("vehicles").insert_one(doc(json!({}))).await.unwrap();
    f.globex.collection("vehicles").insert_one(doc(json!({}))).await.unwrap();

    let user = SecurityContext::builder()
        .tenant_id(f.acme.scope().tenant_id())
        .subject_id(Uuid::new_v4())
        .build();
    assert!(RawCollection::for_operator(&user, f.store.clone(), "vehicles").is_err());

    let operator = SecurityContext::builder()
        .subject_id(Uuid::new_v4())
        .role(Role::SuperAdmin)
        .build();
    let raw = RawCollection::for_operator(&operator, f.store.clone(), "vehicles").unwrap();
    assert_eq!(raw.count(Filter::All).await.unwrap(), 2);
}
