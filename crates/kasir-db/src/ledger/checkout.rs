//! # Checkout Engine
//!
//! Turns an ordered batch of `(product_id, quantity)` lines into one
//! recorded transaction, or into nothing at all.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate_checkout_items     empty / oversized / qty <= 0 → reject    │
//! │       │                      (before any storage access)               │
//! │       ▼                                                                 │
//! │  store.begin() ──► scope                                               │
//! │       │                                                                 │
//! │       ▼  for each line, in input order                                 │
//! │  ┌──────────────────────────────────────────────────────────────┐      │
//! │  │ lock_product   → None            → ProductNotFound           │      │
//! │  │ check_stock    → stock < qty     → InsufficientStock         │      │
//! │  │ price_line     → overflow        → AmountOverflow            │      │
//! │  │ RunningTotal   → overflow        → AmountOverflow            │      │
//! │  │ decrement_stock→ guard miss      → InsufficientStock         │      │
//! │  └──────────────────────────────────────────────────────────────┘      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert_transaction(total, now)                                        │
//! │  insert_detail × N  (input order, name snapshot)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  commit ──► Transaction { id, total_amount, details, created_at }      │
//! │                                                                         │
//! │  Any `?` above drops the scope: everything is rolled back.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{LedgerError, LedgerResult};
use crate::store::{LedgerScope, LedgerStore};
use kasir_core::ledger::{check_stock, price_line, PricedLine, RunningTotal};
use kasir_core::validation::validate_checkout_items;
use kasir_core::{CheckoutItem, CoreError, Money, Transaction, TransactionDetail};

/// Atomic checkout over a [`LedgerStore`].
#[derive(Clone)]
pub struct CheckoutEngine {
    store: Arc<dyn LedgerStore>,
}

impl CheckoutEngine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Runs a checkout.
    ///
    /// On success every line's stock has been decremented and the returned
    /// transaction (with generated ids, details in input order) is durable.
    /// On failure nothing was written.
    pub async fn checkout(&self, items: &[CheckoutItem]) -> LedgerResult<Transaction> {
        validate_checkout_items(items)?;

        let result = self.run(items).await;

        match &result {
            Ok(transaction) => info!(
                transaction_id = transaction.id,
                total = %Money::from_units(transaction.total_amount),
                lines = transaction.details.len(),
                "Checkout completed"
            ),
            Err(LedgerError::Core(e)) => warn!(error = %e, "Checkout rejected"),
            Err(LedgerError::Persistence(_)) => {}
        }

        result
    }

    async fn run(&self, items: &[CheckoutItem]) -> LedgerResult<Transaction> {
        let mut scope = self.store.begin().await?;

        let mut total = RunningTotal::new();
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let line = price_and_take(scope.as_mut(), item).await?;
            total.add(&line)?;
            lines.push(line);
        }

        let created_at = Utc::now();
        let total_amount = total.total().units();
        let transaction_id = scope.insert_transaction(total_amount, created_at).await?;

        let mut details = Vec::with_capacity(lines.len());
        for line in &lines {
            let id = scope.insert_detail(transaction_id, line).await?;
            details.push(TransactionDetail {
                id,
                transaction_id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                subtotal: line.subtotal.units(),
            });
        }

        scope.commit().await?;

        Ok(Transaction {
            id: transaction_id,
            total_amount,
            created_at,
            details,
        })
    }
}

/// Locks, checks, prices and decrements one line.
async fn price_and_take(
    scope: &mut dyn LedgerScope,
    item: &CheckoutItem,
) -> LedgerResult<PricedLine> {
    let product = scope
        .lock_product(item.product_id)
        .await?
        .ok_or(CoreError::ProductNotFound(item.product_id))?;

    check_stock(&product, item.quantity)?;
    let line = price_line(&product, item.quantity)?;
    debug!(
        product_id = line.product_id,
        quantity = line.quantity,
        unit_price = %line.unit_price,
        subtotal = %line.subtotal,
        "Line priced"
    );

    if !scope.decrement_stock(product.id, item.quantity).await? {
        return Err(LedgerError::Core(CoreError::InsufficientStock {
            product_id: product.id,
            product_name: product.name,
            available: product.stock,
            requested: item.quantity,
        }));
    }

    Ok(line)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::store::CatalogStore;
    use crate::{Database, DbConfig};
    use kasir_core::ProductInput;

    /// Both store implementations, seeded with
    /// `{1: Nasi Goreng, price 15000, stock 10}` and
    /// `{2: Teh Botol, price 3000, stock 5}`.
    async fn seeded_stores() -> Vec<(&'static str, Arc<dyn CatalogStore>, CheckoutEngine)> {
        let sqlite = Arc::new(
            Database::new(DbConfig::in_memory())
                .await
                .unwrap()
                .store(),
        );
        let memory = Arc::new(MemoryStore::new());

        let stores: Vec<(&'static str, Arc<dyn CatalogStore>, Arc<dyn LedgerStore>)> = vec![
            (
                "sqlite",
                sqlite.clone() as Arc<dyn CatalogStore>,
                sqlite as Arc<dyn LedgerStore>,
            ),
            (
                "memory",
                memory.clone() as Arc<dyn CatalogStore>,
                memory as Arc<dyn LedgerStore>,
            ),
        ];

        let mut seeded = Vec::new();
        for (name, catalog, ledger) in stores {
            for (product, price, stock) in [("Nasi Goreng", 15_000, 10), ("Teh Botol", 3_000, 5)] {
                catalog
                    .create_product(&ProductInput {
                        name: product.to_string(),
                        price,
                        stock,
                        category_id: None,
                    })
                    .await
                    .unwrap();
            }
            seeded.push((name, catalog, CheckoutEngine::new(ledger)));
        }
        seeded
    }

    async fn stock_of(catalog: &Arc<dyn CatalogStore>, id: i64) -> i64 {
        catalog.get_product(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_successful_checkout() {
        for (name, catalog, engine) in seeded_stores().await {
            let transaction = engine
                .checkout(&[CheckoutItem::new(1, 2), CheckoutItem::new(2, 3)])
                .await
                .unwrap();

            assert_eq!(transaction.total_amount, 39_000, "{name}");
            assert_eq!(transaction.details.len(), 2, "{name}");
            assert_eq!(transaction.details[0].product_name, "Nasi Goreng");
            assert_eq!(transaction.details[0].subtotal, 30_000);
            assert_eq!(transaction.details[1].subtotal, 9_000);
            assert!(transaction
                .details
                .iter()
                .all(|d| d.transaction_id == transaction.id));
            assert_eq!(
                transaction.total_amount,
                transaction.details.iter().map(|d| d.subtotal).sum::<i64>()
            );

            assert_eq!(stock_of(&catalog, 1).await, 8, "{name}");
            assert_eq!(stock_of(&catalog, 2).await, 2, "{name}");
        }
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        for (name, catalog, engine) in seeded_stores().await {
            let err = engine
                .checkout(&[CheckoutItem::new(1, 2), CheckoutItem::new(2, 10)])
                .await
                .unwrap_err();

            match err {
                LedgerError::Core(CoreError::InsufficientStock {
                    product_id,
                    available,
                    requested,
                    ..
                }) => {
                    assert_eq!(product_id, 2, "{name}");
                    assert_eq!(available, 5, "{name}");
                    assert_eq!(requested, 10, "{name}");
                }
                other => panic!("{name}: expected InsufficientStock, got {other:?}"),
            }

            // Product 1 was decremented inside the scope, then rolled back
            assert_eq!(stock_of(&catalog, 1).await, 10, "{name}");
            assert_eq!(stock_of(&catalog, 2).await, 5, "{name}");
        }
    }

    #[tokio::test]
    async fn test_unknown_product_aborts() {
        for (name, catalog, engine) in seeded_stores().await {
            let err = engine
                .checkout(&[CheckoutItem::new(1, 1), CheckoutItem::new(99, 1)])
                .await
                .unwrap_err();

            assert!(
                matches!(err, LedgerError::Core(CoreError::ProductNotFound(99))),
                "{name}: {err:?}"
            );
            assert_eq!(stock_of(&catalog, 1).await, 10, "{name}");
        }
    }

    #[tokio::test]
    async fn test_duplicate_lines_see_reduced_stock() {
        for (name, catalog, engine) in seeded_stores().await {
            let transaction = engine
                .checkout(&[CheckoutItem::new(2, 3), CheckoutItem::new(2, 2)])
                .await
                .unwrap();
            assert_eq!(transaction.details.len(), 2, "{name}");
            assert_eq!(stock_of(&catalog, 2).await, 0, "{name}");

            // Second line sees the stock left by the first
            let err = engine
                .checkout(&[CheckoutItem::new(1, 6), CheckoutItem::new(1, 5)])
                .await
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    LedgerError::Core(CoreError::InsufficientStock {
                        available: 4,
                        requested: 5,
                        ..
                    })
                ),
                "{name}: {err:?}"
            );
            assert_eq!(stock_of(&catalog, 1).await, 10, "{name}");
        }
    }

    #[tokio::test]
    async fn test_invalid_batches_rejected_before_storage() {
        for (name, _, engine) in seeded_stores().await {
            assert!(
                matches!(
                    engine.checkout(&[]).await,
                    Err(LedgerError::Core(CoreError::EmptyCheckout))
                ),
                "{name}"
            );
            assert!(
                matches!(
                    engine.checkout(&[CheckoutItem::new(1, 0)]).await,
                    Err(LedgerError::Core(CoreError::Validation(_)))
                ),
                "{name}"
            );
        }
    }

    #[tokio::test]
    async fn test_name_snapshot_survives_rename() {
        for (name, catalog, engine) in seeded_stores().await {
            let transaction = engine.checkout(&[CheckoutItem::new(2, 1)]).await.unwrap();

            catalog
                .update_product(
                    2,
                    &ProductInput {
                        name: "Teh Botol Sosro".to_string(),
                        price: 3_500,
                        stock: 4,
                        category_id: None,
                    },
                )
                .await
                .unwrap();

            assert_eq!(transaction.details[0].product_name, "Teh Botol", "{name}");
            assert_eq!(transaction.details[0].subtotal, 3_000, "{name}");
        }
    }

    #[tokio::test]
    async fn test_sqlite_checkout_is_persisted() {
        let store = Database::new(DbConfig::in_memory()).await.unwrap().store();
        store
            .create_product(&ProductInput {
                name: "Kopi".to_string(),
                price: 5_000,
                stock: 3,
                category_id: None,
            })
            .await
            .unwrap();

        let engine = CheckoutEngine::new(Arc::new(store.clone()));
        let transaction = engine.checkout(&[CheckoutItem::new(1, 2)]).await.unwrap();

        let stored = store
            .transactions()
            .get_by_id(transaction.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, transaction);
    }
}
