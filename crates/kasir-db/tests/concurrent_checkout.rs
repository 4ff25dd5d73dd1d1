//! Competing checkouts against a file-backed database.

use std::sync::Arc;
use std::time::Duration;

use kasir_core::{CheckoutItem, CoreError, ProductInput};
use kasir_db::{CatalogStore, CheckoutEngine, Database, DbConfig, LedgerError, MemoryStore};

async fn file_database(dir: &tempfile::TempDir) -> Database {
    let config = DbConfig::new(dir.path().join("kasir.db"))
        .max_connections(8)
        .min_connections(1)
        .busy_timeout(Duration::from_secs(10));
    Database::new(config).await.unwrap()
}

async fn last_unit(catalog: &dyn CatalogStore) -> i64 {
    catalog
        .create_product(&ProductInput {
            name: "Es Teh".to_string(),
            price: 4_000,
            stock: 1,
            category_id: None,
        })
        .await
        .unwrap()
        .id
}

async fn race(engine: CheckoutEngine, product_id: i64, contenders: usize) -> (usize, usize) {
    let mut handles = Vec::new();
    for _ in 0..contenders {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.checkout(&[CheckoutItem::new(product_id, 1)]).await
        }));
    }

    let (mut won, mut lost) = (0, 0);
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => won += 1,
            Err(LedgerError::Core(CoreError::InsufficientStock { .. })) => lost += 1,
            Err(other) => panic!("unexpected checkout failure: {other:?}"),
        }
    }
    (won, lost)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_unit_sold_once_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_database(&dir).await;
    let store = Arc::new(db.store());
    let product_id = last_unit(store.as_ref()).await;

    let (won, lost) = race(CheckoutEngine::new(store.clone()), product_id, 8).await;
    assert_eq!(won, 1);
    assert_eq!(lost, 7);

    let product = store.get_product(product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 0);

    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_unit_sold_once_memory() {
    let store = Arc::new(MemoryStore::new());
    let product_id = last_unit(store.as_ref()).await;

    let (won, lost) = race(CheckoutEngine::new(store.clone()), product_id, 8).await;
    assert_eq!(won, 1);
    assert_eq!(lost, 7);
    assert_eq!(store.ledger_counts().await, (1, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_checkouts_conserve_stock() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_database(&dir).await;
    let store = Arc::new(db.store());
    let product_id = store
        .create_product(&ProductInput {
            name: "Indomie Goreng".to_string(),
            price: 3_500,
            stock: 20,
            category_id: None,
        })
        .await
        .unwrap()
        .id;

    let engine = CheckoutEngine::new(store.clone());
    let mut handles = Vec::new();
    for _ in 0..10 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.checkout(&[CheckoutItem::new(product_id, 2)]).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let product = store.get_product(product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 0);

    db.close().await;
}
