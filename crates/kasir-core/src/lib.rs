//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate contains the checkout and reporting rules of Kasir POS as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kasir-api (axum)                             │   │
//! │  │    /api/categories, /api/produk, /api/checkout, /api/report     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     kasir-db (stores, CheckoutEngine, ReportAggregator)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ calls pure rules                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ pricing   │  │   rules   │  │   │
//! │  │   │Transaction│  │ checked   │  │ stock     │  │  parsing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, Transaction, SalesReport)
//! - [`money`] - Money type with overflow-checked integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and parsing
//! - [`ledger`] - Stock validator, pricing calculator, report rules
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::ledger::price_line;
//! use kasir_core::ProductSnapshot;
//!
//! let indomie = ProductSnapshot {
//!     id: 1,
//!     name: "Indomie Goreng".to_string(),
//!     price: 3_500,
//!     stock: 40,
//! };
//!
//! let line = price_line(&indomie, 3).unwrap();
//! assert_eq!(line.subtotal.units(), 10_500);
//! ```

pub mod error;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines accepted in a single checkout.
///
/// ## Business Reason
/// A checkout holds the database write lock for its whole duration, so
/// batches are kept short.
pub const MAX_CHECKOUT_LINES: usize = 100;

/// Maximum length of category and product names.
pub const MAX_NAME_LEN: usize = 200;

/// Wire format of report dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
