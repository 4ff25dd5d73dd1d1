//! # Ledger Engine
//!
//! Orchestration of the checkout and report flows over a [`LedgerStore`].
//!
//! - [`CheckoutEngine`] - atomic checkout: validate, price, decrement, record
//! - [`ReportAggregator`] - read-only revenue / best-seller summaries
//!
//! Both depend only on the store traits, so they run unchanged over
//! SQLite and over the in-memory store.
//!
//! [`LedgerStore`]: crate::store::LedgerStore

pub mod checkout;
pub mod report;

use thiserror::Error;

use crate::error::DbError;
use kasir_core::CoreError;

pub use checkout::CheckoutEngine;
pub use report::ReportAggregator;

/// Failure of a checkout or report.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Rejected by a business rule (unknown product, stock, bad input).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed. The scope, if any, was rolled back.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] DbError),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
