//! MongoDB store tests
//!
//! Run against a single-node replica set started with testcontainers, since
//! live queries rely on change streams. Ignored by default; run with
//! `cargo test -p domain_warehouse --test mongo_test -- --ignored`.

use std::time::Duration;

use domain_warehouse::store::SnapshotStream;
use domain_warehouse::*;
use futures::StreamExt;
use test_utils::{TestDataBuilder, TestMongo, assertions::*};
use tokio::time::timeout;

async fn next_snapshot(stream: &mut SnapshotStream) -> Vec<StoredProduct> {
    let item = timeout(Duration::from_secs(10), stream.next())
        .await
        .expect("no snapshot within 10s");
    assert_some(item, "stream ended").expect("snapshot error")
}

fn live_query(warehouse: WarehouseSelector, low_stock: bool) -> ProductQuery {
    ProductQuery::compose(QueryKey::new(warehouse, low_stock))
}

async fn open_store(mongo: &TestMongo, name: &str) -> MongoWarehouseStore {
    let store = MongoWarehouseStore::new(&mongo.database(name));
    store.init_indexes().await.expect("indexes");
    store
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_live_query_follows_mutations() {
    let mongo = TestMongo::new().await;
    let store = open_store(&mongo, "live_query").await;
    let builder = TestDataBuilder::from_test_name("live_query_follows_mutations");

    let main = WarehouseSelector::Only(WarehouseId::Main);
    let mut stream = store.subscribe(live_query(main, false));
    assert!(next_snapshot(&mut stream).await.is_empty());

    let draft = ProductDraft::new(builder.product_name("a"), WarehouseId::Main)
        .with_stock(builder.quantity(1), builder.price(1));
    let created = store.create(draft).await.expect("create");
    assert_eq!(created.data.order, 1);

    let snapshot = next_snapshot(&mut stream).await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, created.id);

    store
        .move_to_warehouse(&created.id, WarehouseId::Reserve)
        .await
        .expect("move");
    assert!(next_snapshot(&mut stream).await.is_empty());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_appends_and_low_stock_filters() {
    let mongo = TestMongo::new().await;
    let store = open_store(&mongo, "ordering").await;

    let low = ProductDraft::new("Hex Nut", WarehouseId::Main).with_stock(2.0, 0.1);
    let low = store.create(low).await.expect("create low");
    let plenty = ProductDraft::new("Cable Tie", WarehouseId::Additional).with_stock(900.0, 0.02);
    let plenty = store.create(plenty).await.expect("create plenty");
    assert_eq!(plenty.data.order, low.data.order + 1);

    let mut all = store.subscribe(live_query(WarehouseSelector::All, false));
    let ids: Vec<_> = next_snapshot(&mut all)
        .await
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![low.id.clone(), plenty.id.clone()]);

    let mut low_stock = store.subscribe(live_query(WarehouseSelector::All, true));
    let ids: Vec<_> = next_snapshot(&mut low_stock)
        .await
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![low.id]);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_delete_missing_product_is_not_found() {
    let mongo = TestMongo::new().await;
    let store = open_store(&mongo, "delete").await;

    let result = store.delete("does-not-exist").await;

    assert!(matches!(result, Err(WarehouseError::NotFound(_))));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_history_is_empty_for_unknown_product() {
    let mongo = TestMongo::new().await;
    let store = open_store(&mongo, "history").await;

    let history = store.history("nobody").await.expect("history");

    assert!(history.is_empty());
}
