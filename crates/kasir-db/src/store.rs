//! # Store Traits
//!
//! The storage seams of Kasir POS. Handlers and engines depend on these
//! traits, never on SQLite directly.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   CatalogStore ──────┬──► SqliteStore  (repository/, production)       │
//! │   LedgerStore  ──────┘                                                 │
//! │                      └──► MemoryStore  (memory.rs, tests / demos)      │
//! │                                                                         │
//! │   LedgerStore::begin() ──► Box<dyn LedgerScope>                        │
//! │                              │                                          │
//! │                              ├── lock_product      (write-locking read) │
//! │                              ├── decrement_stock   (guarded)            │
//! │                              ├── insert_transaction                     │
//! │                              ├── insert_detail                          │
//! │                              └── commit            (consumes the scope) │
//! │                                                                         │
//! │   Dropping a scope without commit rolls everything back.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use kasir_core::ledger::PricedLine;
use kasir_core::{
    Category, CategoryInput, Product, ProductInput, ProductSales, ProductSnapshot, SalesTotals,
};

use crate::error::DbResult;

// =============================================================================
// Catalog
// =============================================================================

/// Category and product CRUD.
///
/// Inputs are expected to be validated already (see
/// `kasir_core::validation`). Ids and timestamps are assigned here.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All categories, newest first.
    async fn list_categories(&self) -> DbResult<Vec<Category>>;

    async fn get_category(&self, id: i64) -> DbResult<Option<Category>>;

    async fn create_category(&self, input: &CategoryInput) -> DbResult<Category>;

    /// Fails with `NotFound` when no row was affected.
    async fn update_category(&self, id: i64, input: &CategoryInput) -> DbResult<Category>;

    /// Fails with `NotFound` when no row was affected. Products of the
    /// category are kept, uncategorized.
    async fn delete_category(&self, id: i64) -> DbResult<()>;

    /// All products with their category name, newest first.
    async fn list_products(&self) -> DbResult<Vec<Product>>;

    async fn get_product(&self, id: i64) -> DbResult<Option<Product>>;

    /// Fails with `ForeignKeyViolation` for an unknown `category_id`.
    async fn create_product(&self, input: &ProductInput) -> DbResult<Product>;

    async fn update_product(&self, id: i64, input: &ProductInput) -> DbResult<Product>;

    async fn delete_product(&self, id: i64) -> DbResult<()>;
}

// =============================================================================
// Ledger
// =============================================================================

/// Transaction scopes for checkout, and the read side for reports.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Opens an atomic scope. Nothing written through it is visible to
    /// others until [`LedgerScope::commit`].
    async fn begin(&self) -> DbResult<Box<dyn LedgerScope>>;

    /// Revenue and transaction count for `from <= created_at < until`.
    async fn sales_totals(&self, from: DateTime<Utc>, until: DateTime<Utc>)
        -> DbResult<SalesTotals>;

    /// Summed quantity per product for `from <= created_at < until`.
    ///
    /// `product_name` is the product's current name when it still exists,
    /// otherwise the snapshot recorded on the detail rows.
    async fn product_sales(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<Vec<ProductSales>>;
}

/// One open checkout transaction.
#[async_trait]
pub trait LedgerScope: Send {
    /// Reads a product's name, price and stock, taking the write lock on it
    /// for the rest of the scope. `None` when the product doesn't exist.
    async fn lock_product(&mut self, product_id: i64) -> DbResult<Option<ProductSnapshot>>;

    /// Decrements stock if at least `quantity` units are on hand.
    ///
    /// Returns `false` (and changes nothing) when the guard fails.
    async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<bool>;

    /// Inserts the transaction header, returning its id.
    async fn insert_transaction(
        &mut self,
        total_amount: i64,
        created_at: DateTime<Utc>,
    ) -> DbResult<i64>;

    /// Inserts one detail row, returning its id.
    async fn insert_detail(&mut self, transaction_id: i64, line: &PricedLine) -> DbResult<i64>;

    /// Makes every write of the scope durable and visible.
    async fn commit(self: Box<Self>) -> DbResult<()>;
}
