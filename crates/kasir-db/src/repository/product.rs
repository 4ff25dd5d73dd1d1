//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Category Join
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products p LEFT JOIN categories c ON c.id = p.category_id             │
//! │                                                                         │
//! │  id │ name          │ category_id │ category_name                       │
//! │  ───┼───────────────┼─────────────┼──────────────                       │
//! │   3 │ Teh Botol     │ 2           │ Minuman                             │
//! │   2 │ Kerupuk       │ NULL        │ NULL   ← no category / deleted     │
//! │   1 │ Nasi Goreng   │ 1           │ Makanan                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock changes made by checkout go through the ledger scope in
//! `transaction.rs`, not through this repository.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::{Product, ProductInput};

const SELECT_PRODUCT: &str = r#"
    SELECT
        p.id,
        p.name,
        p.price,
        p.stock,
        p.category_id,
        c.name AS category_name,
        p.created_at,
        p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products with their category name, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("{SELECT_PRODUCT} ORDER BY p.created_at DESC, p.id DESC");

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE p.id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a product and returns it as listed (with category name).
    ///
    /// ## Errors
    /// `ForeignKeyViolation` when `category_id` doesn't exist.
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, price, stock, category_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        debug!(id, name = %input.name, "Inserted product");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Replaces name, price, stock and category.
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        debug!(id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, price = ?3, stock = ?4, category_id = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product. Past transaction details keep their snapshot.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
