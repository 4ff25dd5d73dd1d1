//! # kasir-db: Database Layer for Kasir POS
//!
//! This crate provides storage for the Kasir POS backend, and the checkout
//! and report engines that run on top of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /api/checkout)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kasir-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐   │   │
//! │  │   │    ledger     │   │     store     │   │   Database    │   │   │
//! │  │   │ CheckoutEngine│──►│ CatalogStore  │   │   (pool.rs)   │   │   │
//! │  │   │ReportAggreg.  │   │ LedgerStore   │   │  SqlitePool   │   │   │
//! │  │   └───────────────┘   │ LedgerScope   │   │  Migrations   │   │   │
//! │  │                       └───────┬───────┘   └───────▲───────┘   │   │
//! │  │                     ┌─────────┴─────────┐         │           │   │
//! │  │                     ▼                   ▼         │           │   │
//! │  │               MemoryStore         SqliteStore ────┘           │   │
//! │  │               (memory.rs)         (repository/)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (kasir.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`store`] - Storage traits
//! - [`repository`] - SQLite implementations
//! - [`memory`] - In-memory implementation
//! - [`ledger`] - Checkout engine and report aggregator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kasir_db::{CheckoutEngine, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kasir.db")).await?;
//! let engine = CheckoutEngine::new(Arc::new(db.store()));
//! let transaction = engine.checkout(&[CheckoutItem::new(1, 2)]).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use ledger::{CheckoutEngine, LedgerError, LedgerResult, ReportAggregator};
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig};
pub use repository::SqliteStore;
pub use store::{CatalogStore, LedgerScope, LedgerStore};
