//! Shared handler state.

use std::sync::Arc;

use chrono::FixedOffset;

use kasir_db::{CatalogStore, CheckoutEngine, LedgerStore, ReportAggregator};

/// Application state cloned into every handler.
///
/// ```text
/// AppState
///   ├── catalog  : Arc<dyn CatalogStore>   categories, products
///   ├── checkout : CheckoutEngine          POST /api/checkout
///   └── reports  : ReportAggregator        GET  /api/report*
/// ```
///
/// All three share one underlying store.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub checkout: CheckoutEngine,
    pub reports: ReportAggregator,
}

impl AppState {
    /// Builds the state over a store that serves both catalog and ledger.
    pub fn new<S>(store: Arc<S>, offset: FixedOffset) -> Self
    where
        S: CatalogStore + LedgerStore + 'static,
    {
        let ledger: Arc<dyn LedgerStore> = store.clone();
        AppState {
            catalog: store,
            checkout: CheckoutEngine::new(ledger.clone()),
            reports: ReportAggregator::new(ledger, offset),
        }
    }
}
