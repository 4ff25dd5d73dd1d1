//! # Repository Module
//!
//! SQLite repository implementations for Kasir POS, and [`SqliteStore`],
//! which exposes them through the store traits.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler / CheckoutEngine / ReportAggregator                      │
//! │       │                                                                 │
//! │       │  Arc<dyn CatalogStore>, Arc<dyn LedgerStore>                   │
//! │       ▼                                                                 │
//! │  SqliteStore                                                           │
//! │  ├── CategoryRepository     categories CRUD                           │
//! │  ├── ProductRepository      products CRUD (+ category join)           │
//! │  └── TransactionRepository  checkout scopes, report queries           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod product;
pub mod transaction;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use crate::store::{CatalogStore, LedgerScope, LedgerStore};
use category::CategoryRepository;
use kasir_core::{Category, CategoryInput, Product, ProductInput, ProductSales, SalesTotals};
use product::ProductRepository;
use transaction::TransactionRepository;

/// The production store: all repositories over one pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    categories: CategoryRepository,
    products: ProductRepository,
    transactions: TransactionRepository,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore {
            categories: CategoryRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            transactions: TransactionRepository::new(pool),
        }
    }

    pub fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    pub fn products(&self) -> &ProductRepository {
        &self.products
    }

    pub fn transactions(&self) -> &TransactionRepository {
        &self.transactions
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn list_categories(&self) -> DbResult<Vec<Category>> {
        self.categories.list().await
    }

    async fn get_category(&self, id: i64) -> DbResult<Option<Category>> {
        self.categories.get_by_id(id).await
    }

    async fn create_category(&self, input: &CategoryInput) -> DbResult<Category> {
        self.categories.insert(input).await
    }

    async fn update_category(&self, id: i64, input: &CategoryInput) -> DbResult<Category> {
        self.categories.update(id, input).await
    }

    async fn delete_category(&self, id: i64) -> DbResult<()> {
        self.categories.delete(id).await
    }

    async fn list_products(&self) -> DbResult<Vec<Product>> {
        self.products.list().await
    }

    async fn get_product(&self, id: i64) -> DbResult<Option<Product>> {
        self.products.get_by_id(id).await
    }

    async fn create_product(&self, input: &ProductInput) -> DbResult<Product> {
        self.products.insert(input).await
    }

    async fn update_product(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        self.products.update(id, input).await
    }

    async fn delete_product(&self, id: i64) -> DbResult<()> {
        self.products.delete(id).await
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn begin(&self) -> DbResult<Box<dyn LedgerScope>> {
        Ok(Box::new(self.transactions.begin().await?))
    }

    async fn sales_totals(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<SalesTotals> {
        self.transactions.sales_totals(from, until).await
    }

    async fn product_sales(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<Vec<ProductSales>> {
        self.transactions.product_sales(from, until).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};

    async fn store() -> SqliteStore {
        Database::new(DbConfig::in_memory()).await.unwrap().store()
    }

    fn category(name: &str) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            description: format!("Semua {}", name.to_lowercase()),
        }
    }

    fn product(name: &str, price: i64, stock: i64, category_id: Option<i64>) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price,
            stock,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_category_crud() {
        let store = store().await;

        let makanan = store.create_category(&category("Makanan")).await.unwrap();
        let minuman = store.create_category(&category("Minuman")).await.unwrap();
        assert!(minuman.id > makanan.id);
        assert!(makanan.updated_at.is_none());

        // Newest first
        let listed = store.list_categories().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, minuman.id);

        let updated = store
            .update_category(makanan.id, &category("Makanan Berat"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Makanan Berat");
        assert!(updated.updated_at.is_some());

        store.delete_category(makanan.id).await.unwrap();
        assert!(store.get_category(makanan.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_category_is_not_found() {
        let store = store().await;

        assert!(matches!(
            store.update_category(404, &category("X")).await,
            Err(DbError::NotFound { id: 404, .. })
        ));
        assert!(matches!(
            store.delete_category(404).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_product_category_join_and_set_null() {
        let store = store().await;

        let minuman = store.create_category(&category("Minuman")).await.unwrap();
        let teh = store
            .create_product(&product("Teh Botol", 3_000, 5, Some(minuman.id)))
            .await
            .unwrap();
        assert_eq!(teh.category_name.as_deref(), Some("Minuman"));

        store.delete_category(minuman.id).await.unwrap();

        let teh = store.get_product(teh.id).await.unwrap().unwrap();
        assert_eq!(teh.category_id, None);
        assert_eq!(teh.category_name, None);
    }

    #[tokio::test]
    async fn test_product_unknown_category_rejected() {
        let store = store().await;

        let result = store
            .create_product(&product("Teh Botol", 3_000, 5, Some(99)))
            .await;
        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
    }

    #[tokio::test]
    async fn test_product_update_and_delete() {
        let store = store().await;

        let kopi = store
            .create_product(&product("Kopi", 5_000, 10, None))
            .await
            .unwrap();
        let updated = store
            .update_product(kopi.id, &product("Kopi Susu", 7_000, 8, None))
            .await
            .unwrap();
        assert_eq!(updated.price, 7_000);
        assert_eq!(updated.stock, 8);
        assert_eq!(updated.created_at, kopi.created_at);

        store.delete_product(kopi.id).await.unwrap();
        assert!(matches!(
            store.delete_product(kopi.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert_eq!(store.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_dropped_scope_leaves_no_rows() {
        let store = store().await;
        let teh = store.create_product(&product("Teh Botol", 3_000, 5, None)).await.unwrap();
        let from = Utc::now() - chrono::Duration::hours(1);

        {
            let mut scope = store.begin().await.unwrap();
            let snapshot = scope.lock_product(teh.id).await.unwrap().unwrap();
            let line = kasir_core::ledger::price_line(&snapshot, 2).unwrap();
            assert!(scope.decrement_stock(teh.id, 2).await.unwrap());
            let tx_id = scope.insert_transaction(6_000, Utc::now()).await.unwrap();
            scope.insert_detail(tx_id, &line).await.unwrap();
        }

        let until = Utc::now() + chrono::Duration::hours(1);
        assert_eq!(store.sales_totals(from, until).await.unwrap(), SalesTotals::default());
        assert!(store.product_sales(from, until).await.unwrap().is_empty());
        assert_eq!(store.get_product(teh.id).await.unwrap().unwrap().stock, 5);

        // The connection is usable again after the rollback
        let mut scope = store.begin().await.unwrap();
        assert!(scope.decrement_stock(teh.id, 1).await.unwrap());
        scope.insert_transaction(3_000, Utc::now()).await.unwrap();
        scope.commit().await.unwrap();

        let totals = store.sales_totals(from, until).await.unwrap();
        assert_eq!(totals.transaction_count, 1);
        assert_eq!(store.get_product(teh.id).await.unwrap().unwrap().stock, 4);
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let store = store().await;

        let result = store.create_product(&product("Rusak", 1_000, -1, None)).await;
        assert!(matches!(result, Err(DbError::ConstraintViolation { .. })));
    }
}
