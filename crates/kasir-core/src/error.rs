//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Checkout / report rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── LedgerError      - CoreError | DbError from the engine            │
//! │                                                                         │
//! │  kasir-api errors                                                      │
//! │  └── ApiError         - What HTTP clients see (status + JSON body)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → ApiError → Client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// None of these are transient: they describe bad caller input and are
/// surfaced as-is, never retried.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A checkout line references a product that does not exist.
    #[error("Product id {0} not found")]
    ProductNotFound(i64),

    /// Insufficient stock to complete a checkout line.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout [{product 2, qty 10}]
    ///      │
    ///      ▼
    /// Lock product 2: stock=5
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 2, available: 5, requested: 10 }
    ///      │
    ///      ▼
    /// Whole batch rolled back, client gets 400
    /// ```
    #[error(
        "Insufficient stock for product {product_name} (id {product_id}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: i64,
        product_name: String,
        available: i64,
        requested: i64,
    },

    /// Checkout batch has no lines.
    #[error("Checkout must contain at least one item")]
    EmptyCheckout,

    /// Checkout batch has more lines than allowed.
    #[error("Checkout cannot have more than {max} items")]
    TooManyLines { max: usize },

    /// An amount does not fit in the money representation.
    #[error("Amount overflow while computing {context}")]
    AmountOverflow { context: String },

    /// Report window starts after it ends.
    #[error("start_date {start} is after end_date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before any storage access.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid date, invalid offset).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
