//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Category     │◄──│     Product     │   │    Transaction      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)           │   │
//! │  │  name           │   │  name           │   │  total_amount       │   │
//! │  │  description    │   │  price          │   │  details ───────┐   │   │
//! │  └─────────────────┘   │  stock (>= 0)   │   └─────────────────┼───┘   │
//! │                        │  category_id?   │                     ▼       │
//! │                        └─────────────────┘   ┌─────────────────────┐   │
//! │                                              │ TransactionDetail   │   │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  product_id         │   │
//! │  │  CheckoutItem   │   │  SalesReport    │   │  product_name (snap)│   │
//! │  │  (input only)   │   │  (read model)   │   │  quantity, subtotal │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every persisted entity has a server-assigned `i64` id (SQLite rowid).
//! Client-supplied ids and timestamps on create/update bodies are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Category
// =============================================================================

/// A product grouping (e.g. "Makanan", "Minuman").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create / update body for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Server-assigned identifier.
    pub id: i64,

    /// Display name shown to the cashier and snapshotted on each sale.
    pub name: String,

    /// Unit price in whole currency units.
    pub price: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Category this product belongs to, if any.
    pub category_id: Option<i64>,

    /// Name of the category (read-only, joined).
    ///
    /// Absent when the product has no category or the category was deleted.
    pub category_name: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Absent until the first update.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create / update body for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductInput {
    pub name: String,
    pub price: i64,
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// The fields of a product the checkout path reads under lock.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

// =============================================================================
// Checkout
// =============================================================================

/// One requested line of a checkout batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl CheckoutItem {
    pub const fn new(product_id: i64, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A completed sale.
///
/// Transactions are append-only: created once by a checkout, never mutated
/// or deleted. `total_amount` always equals the sum of the detail subtotals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,

    /// Line items in checkout input order.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub details: Vec<TransactionDetail>,
}

/// A single line of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionDetail {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,

    /// Product name at the moment of sale (not a live join).
    pub product_name: String,

    pub quantity: i64,

    /// `quantity * unit price` at the moment of sale.
    pub subtotal: i64,
}

// =============================================================================
// Reporting
// =============================================================================

/// Revenue summary over a date window.
///
/// Wire field names are kept from the original Indonesian API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SalesReport {
    pub total_revenue: i64,

    #[serde(rename = "total_transaksi")]
    pub transaction_count: i64,

    /// `null` when no transactions exist in the window.
    #[serde(rename = "produk_terlaris")]
    pub best_seller: Option<BestSellingProduct>,
}

impl SalesReport {
    /// The report of a window with no sales.
    pub const fn empty() -> Self {
        Self {
            total_revenue: 0,
            transaction_count: 0,
            best_seller: None,
        }
    }
}

/// The product with the highest summed quantity in a report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BestSellingProduct {
    #[serde(rename = "nama")]
    pub name: String,

    #[serde(rename = "qty_terjual")]
    pub quantity_sold: i64,
}

/// Header aggregates of a report window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesTotals {
    pub revenue: i64,
    pub transaction_count: i64,
}

/// Summed quantity of one product over a report window.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductSales {
    pub product_id: i64,
    pub product_name: String,
    pub quantity_sold: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
