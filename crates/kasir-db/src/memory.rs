//! # In-Memory Store
//!
//! A [`CatalogStore`] + [`LedgerStore`] kept entirely in process memory,
//! honoring the same contract as the SQLite store:
//!
//! - ids are assigned sequentially from 1
//! - unknown `category_id` fails with `ForeignKeyViolation`
//! - deleting a category uncategorizes its products
//! - a ledger scope sees its own writes, others see none until commit
//!
//! ## Scope Isolation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  begin()                                                               │
//! │    │  lock_owned() on the state mutex (scopes are serialized)          │
//! │    ▼                                                                    │
//! │  MemoryScope { guard, staged: guard.clone() }                          │
//! │    │  all writes go to `staged`                                        │
//! │    ▼                                                                    │
//! │  commit()  → *guard = staged                                           │
//! │  drop      → staged discarded, guard released                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{DbError, DbResult};
use crate::store::{CatalogStore, LedgerScope, LedgerStore};
use kasir_core::ledger::PricedLine;
use kasir_core::{
    Category, CategoryInput, Product, ProductInput, ProductSales, ProductSnapshot, SalesTotals,
    TransactionDetail,
};

#[derive(Debug, Clone)]
struct ProductRow {
    id: i64,
    name: String,
    price: i64,
    stock: i64,
    category_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct TransactionRow {
    id: i64,
    total_amount: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, ProductRow>,
    transactions: Vec<TransactionRow>,
    details: Vec<TransactionDetail>,
    last_category_id: i64,
    last_product_id: i64,
    last_transaction_id: i64,
    last_detail_id: i64,
}

impl MemoryState {
    fn product(&self, row: &ProductRow) -> Product {
        let category_name = row
            .category_id
            .and_then(|id| self.categories.get(&id))
            .map(|c| c.name.clone());

        Product {
            id: row.id,
            name: row.name.clone(),
            price: row.price,
            stock: row.stock,
            category_id: row.category_id,
            category_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn check_category(&self, category_id: Option<i64>) -> DbResult<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(DbError::foreign_key(format!(
                "category {} does not exist",
                id
            ))),
            _ => Ok(()),
        }
    }

    fn transactions_in(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> impl Iterator<Item = &TransactionRow> + '_ {
        self.transactions
            .iter()
            .filter(move |t| from <= t.created_at && t.created_at < until)
    }
}

/// Newest first, like the SQL `ORDER BY created_at DESC, id DESC`.
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

/// In-memory store (see module docs).
///
/// Cloning shares the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backdates a committed transaction. Test helper for report windows.
    pub async fn set_transaction_time(&self, id: i64, created_at: DateTime<Utc>) -> DbResult<()> {
        let mut state = self.state.lock().await;
        let row = state
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DbError::not_found("Transaction", id))?;
        row.created_at = created_at;
        Ok(())
    }

    /// Number of committed transactions and detail rows.
    pub async fn ledger_counts(&self) -> (usize, usize) {
        let state = self.state.lock().await;
        (state.transactions.len(), state.details.len())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        newest_first(&mut categories, |c| (c.created_at, c.id));
        Ok(categories)
    }

    async fn get_category(&self, id: i64) -> DbResult<Option<Category>> {
        Ok(self.state.lock().await.categories.get(&id).cloned())
    }

    async fn create_category(&self, input: &CategoryInput) -> DbResult<Category> {
        let mut state = self.state.lock().await;
        state.last_category_id += 1;

        let category = Category {
            id: state.last_category_id,
            name: input.name.clone(),
            description: input.description.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: i64, input: &CategoryInput) -> DbResult<Category> {
        let mut state = self.state.lock().await;
        let category = state
            .categories
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("Category", id))?;

        category.name = input.name.clone();
        category.description = input.description.clone();
        category.updated_at = Some(Utc::now());
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> DbResult<()> {
        let mut state = self.state.lock().await;
        state
            .categories
            .remove(&id)
            .ok_or_else(|| DbError::not_found("Category", id))?;

        // ON DELETE SET NULL
        for product in state.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(())
    }

    async fn list_products(&self) -> DbResult<Vec<Product>> {
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state.products.values().map(|p| state.product(p)).collect();
        newest_first(&mut products, |p| (p.created_at, p.id));
        Ok(products)
    }

    async fn get_product(&self, id: i64) -> DbResult<Option<Product>> {
        let state = self.state.lock().await;
        Ok(state.products.get(&id).map(|p| state.product(p)))
    }

    async fn create_product(&self, input: &ProductInput) -> DbResult<Product> {
        let mut state = self.state.lock().await;
        state.check_category(input.category_id)?;
        state.last_product_id += 1;

        let row = ProductRow {
            id: state.last_product_id,
            name: input.name.clone(),
            price: input.price,
            stock: input.stock,
            category_id: input.category_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        let product = state.product(&row);
        state.products.insert(row.id, row);
        Ok(product)
    }

    async fn update_product(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        let mut state = self.state.lock().await;
        if !state.products.contains_key(&id) {
            return Err(DbError::not_found("Product", id));
        }
        state.check_category(input.category_id)?;

        let row = state
            .products
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("Product", id))?;
        row.name = input.name.clone();
        row.price = input.price;
        row.stock = input.stock;
        row.category_id = input.category_id;
        row.updated_at = Some(Utc::now());

        let row = row.clone();
        Ok(state.product(&row))
    }

    async fn delete_product(&self, id: i64) -> DbResult<()> {
        let mut state = self.state.lock().await;
        state
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("Product", id))
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn begin(&self) -> DbResult<Box<dyn LedgerScope>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryScope { guard, staged }))
    }

    async fn sales_totals(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<SalesTotals> {
        let state = self.state.lock().await;
        let mut totals = SalesTotals::default();
        for transaction in state.transactions_in(from, until) {
            totals.revenue = totals
                .revenue
                .checked_add(transaction.total_amount)
                .ok_or_else(|| overflow("revenue"))?;
            totals.transaction_count += 1;
        }
        Ok(totals)
    }

    async fn product_sales(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<Vec<ProductSales>> {
        let state = self.state.lock().await;
        let ids: Vec<i64> = state.transactions_in(from, until).map(|t| t.id).collect();

        let mut by_product: BTreeMap<i64, ProductSales> = BTreeMap::new();
        for detail in state
            .details
            .iter()
            .filter(|d| ids.contains(&d.transaction_id))
        {
            let entry = by_product
                .entry(detail.product_id)
                .or_insert_with(|| ProductSales {
                    product_id: detail.product_id,
                    product_name: state
                        .products
                        .get(&detail.product_id)
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| detail.product_name.clone()),
                    quantity_sold: 0,
                });
            entry.quantity_sold = entry
                .quantity_sold
                .checked_add(detail.quantity)
                .ok_or_else(|| overflow("quantity sold"))?;
        }

        let mut sales: Vec<ProductSales> = by_product.into_values().collect();
        sales.sort_by(|a, b| {
            b.quantity_sold
                .cmp(&a.quantity_sold)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        Ok(sales)
    }
}

/// Same failure SQLite reports when a SUM leaves the i64 range.
fn overflow(what: &str) -> DbError {
    DbError::QueryFailed(format!("integer overflow summing {what}"))
}

// =============================================================================
// Scope
// =============================================================================

struct MemoryScope {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl LedgerScope for MemoryScope {
    async fn lock_product(&mut self, product_id: i64) -> DbResult<Option<ProductSnapshot>> {
        Ok(self.staged.products.get(&product_id).map(|p| ProductSnapshot {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
            stock: p.stock,
        }))
    }

    async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<bool> {
        match self.staged.products.get_mut(&product_id) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_transaction(
        &mut self,
        total_amount: i64,
        created_at: DateTime<Utc>,
    ) -> DbResult<i64> {
        self.staged.last_transaction_id += 1;
        let id = self.staged.last_transaction_id;
        self.staged.transactions.push(TransactionRow {
            id,
            total_amount,
            created_at,
        });
        Ok(id)
    }

    async fn insert_detail(&mut self, transaction_id: i64, line: &PricedLine) -> DbResult<i64> {
        if !self.staged.transactions.iter().any(|t| t.id == transaction_id) {
            return Err(DbError::foreign_key(format!(
                "transaction {} does not exist",
                transaction_id
            )));
        }

        self.staged.last_detail_id += 1;
        let id = self.staged.last_detail_id;
        self.staged.details.push(TransactionDetail {
            id,
            transaction_id,
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            subtotal: line.subtotal.units(),
        });
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> DbResult<()> {
        let MemoryScope { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
