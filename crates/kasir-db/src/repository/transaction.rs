//! # Transaction Repository
//!
//! SQLite side of the ledger: the checkout scope and the report queries.
//!
//! ## Checkout Scope Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN (deferred)                                                       │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  UPDATE products SET stock = stock WHERE id = ? RETURNING ...          │
//! │    │   first statement is a write: takes the database write lock,      │
//! │    │   a competing checkout waits here (busy_timeout)                  │
//! │    ▼                                                                    │
//! │  UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?     │
//! │    │   guard miss → rows_affected == 0                                 │
//! │    ▼                                                                    │
//! │  INSERT transactions ... RETURNING id                                  │
//! │  INSERT transaction_details ... RETURNING id   (per line)              │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT  (or ROLLBACK when the scope is dropped)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::store::LedgerScope;
use kasir_core::ledger::PricedLine;
use kasir_core::{ProductSales, ProductSnapshot, SalesTotals, Transaction, TransactionDetail};

/// Repository for transaction reads and checkout scopes.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Opens a checkout scope.
    pub async fn begin(&self) -> DbResult<SqliteLedgerScope> {
        let tx = self.pool.begin().await?;
        Ok(SqliteLedgerScope { tx })
    }

    /// Gets a transaction with its details (in insertion order).
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let header = sqlx::query_as::<_, Transaction>(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut transaction) = header else {
            return Ok(None);
        };

        transaction.details = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT id, transaction_id, product_id, product_name, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(transaction))
    }

    /// Revenue and count of transactions in `[from, until)`.
    pub async fn sales_totals(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<SalesTotals> {
        let totals = sqlx::query_as::<_, SalesTotals>(
            r#"
            SELECT
                COALESCE(SUM(total_amount), 0) AS revenue,
                COUNT(*) AS transaction_count
            FROM transactions
            WHERE created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(from)
        .bind(until)
        .fetch_one(&self.pool)
        .await?;

        debug!(
            revenue = totals.revenue,
            count = totals.transaction_count,
            "Computed sales totals"
        );
        Ok(totals)
    }

    /// Summed quantity per product in `[from, until)`, best sellers first.
    pub async fn product_sales(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<Vec<ProductSales>> {
        let sales = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT
                td.product_id AS product_id,
                COALESCE(p.name, MAX(td.product_name)) AS product_name,
                SUM(td.quantity) AS quantity_sold
            FROM transaction_details td
            JOIN transactions t ON t.id = td.transaction_id
            LEFT JOIN products p ON p.id = td.product_id
            WHERE t.created_at >= ?1 AND t.created_at < ?2
            GROUP BY td.product_id, p.name
            ORDER BY quantity_sold DESC, td.product_id ASC
            "#,
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}

// =============================================================================
// Checkout Scope
// =============================================================================

/// A checkout scope over one SQLite transaction.
///
/// Dropping it without [`LedgerScope::commit`] rolls back.
pub struct SqliteLedgerScope {
    tx: sqlx::Transaction<'static, Sqlite>,
}

#[async_trait]
impl LedgerScope for SqliteLedgerScope {
    async fn lock_product(&mut self, product_id: i64) -> DbResult<Option<ProductSnapshot>> {
        let product = sqlx::query_as::<_, ProductSnapshot>(
            r#"
            UPDATE products SET stock = stock
            WHERE id = ?1
            RETURNING id, name, price, stock
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(product)
    }

    async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products SET stock = stock - ?1
            WHERE id = ?2 AND stock >= ?1
            "#,
        )
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert_transaction(
        &mut self,
        total_amount: i64,
        created_at: DateTime<Utc>,
    ) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (total_amount, created_at)
            VALUES (?1, ?2)
            RETURNING id
            "#,
        )
        .bind(total_amount)
        .bind(created_at)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }

    async fn insert_detail(&mut self, transaction_id: i64, line: &PricedLine) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transaction_details
                (transaction_id, product_id, product_name, quantity, subtotal)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(transaction_id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.quantity)
        .bind(line.subtotal.units())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(id)
    }

    async fn commit(self: Box<Self>) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}
