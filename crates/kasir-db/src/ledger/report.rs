//! # Report Aggregator
//!
//! Read-only sales summaries over calendar-day windows.
//!
//! Calendar days are interpreted in a fixed UTC offset (the shop's local
//! time). See `kasir_core::ledger::ReportWindow` for how a day range maps
//! to stored UTC timestamps.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::debug;

use super::LedgerResult;
use crate::store::LedgerStore;
use kasir_core::ledger::{summarize, ReportWindow};
use kasir_core::SalesReport;

/// Builds [`SalesReport`]s from a [`LedgerStore`].
#[derive(Clone)]
pub struct ReportAggregator {
    store: Arc<dyn LedgerStore>,
    offset: FixedOffset,
}

impl ReportAggregator {
    pub fn new(store: Arc<dyn LedgerStore>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    /// Report for the current calendar day.
    pub async fn today(&self) -> LedgerResult<SalesReport> {
        self.today_at(Utc::now()).await
    }

    /// Report for the calendar day `now` falls on.
    pub async fn today_at(&self, now: DateTime<Utc>) -> LedgerResult<SalesReport> {
        let window = ReportWindow::today(now, self.offset)?;
        self.window(&window).await
    }

    /// Report for `start..=end`. Fails with `InvalidDateRange` if
    /// `start > end`.
    pub async fn range(&self, start: NaiveDate, end: NaiveDate) -> LedgerResult<SalesReport> {
        let window = ReportWindow::new(start, end, self.offset)?;
        self.window(&window).await
    }

    async fn window(&self, window: &ReportWindow) -> LedgerResult<SalesReport> {
        debug!(
            start = %window.start,
            end = %window.end,
            from = %window.from,
            until = %window.until,
            "Building sales report"
        );

        let totals = self.store.sales_totals(window.from, window.until).await?;
        if totals.transaction_count == 0 {
            return Ok(SalesReport::empty());
        }

        let sales = self.store.product_sales(window.from, window.until).await?;
        Ok(summarize(totals, &sales))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CheckoutEngine, LedgerError};
    use crate::memory::MemoryStore;
    use crate::store::CatalogStore;
    use crate::{Database, DbConfig};
    use chrono::TimeZone;
    use kasir_core::{CheckoutItem, CoreError, ProductInput};

    fn jakarta() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn add_product(store: &dyn CatalogStore, name: &str, price: i64) {
        store
            .create_product(&ProductInput {
                name: name.to_string(),
                price,
                stock: 100,
                category_id: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_day() {
        let store = Arc::new(MemoryStore::new());
        let reports = ReportAggregator::new(store, jakarta());

        let report = reports.today().await.unwrap();
        assert_eq!(report, SalesReport::empty());
    }

    #[tokio::test]
    async fn test_reversed_range_rejected() {
        let store = Arc::new(MemoryStore::new());
        let reports = ReportAggregator::new(store, jakarta());

        let err = reports
            .range(date(2026, 3, 2), date(2026, 3, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::InvalidDateRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_range_includes_both_boundary_days() {
        let store = Arc::new(MemoryStore::new());
        add_product(store.as_ref(), "Nasi Goreng", 15_000).await;
        add_product(store.as_ref(), "Teh Botol", 3_000).await;

        let engine = CheckoutEngine::new(store.clone());
        let reports = ReportAggregator::new(store.clone(), jakarta());

        // 2026-03-01 00:00 local, 2026-03-02 23:59 local, 2026-03-03 00:00 local
        let first_instant = Utc.with_ymd_and_hms(2026, 2, 28, 17, 0, 0).unwrap();
        let last_instant = Utc.with_ymd_and_hms(2026, 3, 2, 16, 59, 0).unwrap();
        let outside = Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap();

        for (items, at) in [
            (vec![CheckoutItem::new(1, 2)], first_instant),
            (vec![CheckoutItem::new(2, 3)], last_instant),
            (vec![CheckoutItem::new(2, 50)], outside),
        ] {
            let transaction = engine.checkout(&items).await.unwrap();
            store.set_transaction_time(transaction.id, at).await.unwrap();
        }

        let report = reports
            .range(date(2026, 3, 1), date(2026, 3, 2))
            .await
            .unwrap();
        assert_eq!(report.total_revenue, 39_000);
        assert_eq!(report.transaction_count, 2);
        let best = report.best_seller.unwrap();
        assert_eq!(best.name, "Teh Botol");
        assert_eq!(best.quantity_sold, 3);

        let report = reports.today_at(outside).await.unwrap();
        assert_eq!(report.transaction_count, 1);
        assert_eq!(report.total_revenue, 150_000);
    }

    #[tokio::test]
    async fn test_sqlite_range_ending_on_last_representable_day() {
        let store = Arc::new(Database::new(DbConfig::in_memory()).await.unwrap().store());
        add_product(store.as_ref(), "Gula Pasir", 10_000).await;

        let engine = CheckoutEngine::new(store.clone());
        let sale = engine.checkout(&[CheckoutItem::new(1, 1)]).await.unwrap();
        let today = sale.created_at.date_naive();

        for offset in [FixedOffset::east_opt(0).unwrap(), FixedOffset::west_opt(5 * 3600).unwrap()] {
            let reports = ReportAggregator::new(store.clone(), offset);
            for end in [date(9998, 12, 31), date(9999, 12, 31)] {
                let report = reports.range(today - chrono::Days::new(1), end).await.unwrap();
                assert_eq!(report.transaction_count, 1, "end {end} at {offset}");
                assert_eq!(report.total_revenue, 10_000);
            }
        }
    }

    #[tokio::test]
    async fn test_sqlite_report_uses_current_name_and_tie_break() {
        let store = Arc::new(Database::new(DbConfig::in_memory()).await.unwrap().store());
        add_product(store.as_ref(), "Kopi", 5_000).await;
        add_product(store.as_ref(), "Susu", 6_000).await;
        add_product(store.as_ref(), "Roti", 14_000).await;

        let engine = CheckoutEngine::new(store.clone());
        let first = engine
            .checkout(&[CheckoutItem::new(2, 2), CheckoutItem::new(1, 2)])
            .await
            .unwrap();
        engine.checkout(&[CheckoutItem::new(3, 1)]).await.unwrap();

        // Deleted product falls back to its snapshot name
        store.delete_product(3).await.unwrap();
        store
            .update_product(
                1,
                &ProductInput {
                    name: "Kopi Tubruk".to_string(),
                    price: 5_000,
                    stock: 98,
                    category_id: None,
                },
            )
            .await
            .unwrap();

        let reports = ReportAggregator::new(store.clone(), jakarta());
        let report = reports.today_at(first.created_at).await.unwrap();

        assert_eq!(report.transaction_count, 2);
        assert_eq!(report.total_revenue, 12_000 + 10_000 + 14_000);

        // Kopi and Susu tie at 2: lowest id wins, under its current name
        let best = report.best_seller.unwrap();
        assert_eq!(best.name, "Kopi Tubruk");
        assert_eq!(best.quantity_sold, 2);

        let sales = store
            .transactions()
            .product_sales(
                first.created_at - chrono::Duration::hours(1),
                first.created_at + chrono::Duration::hours(1),
            )
            .await
            .unwrap();
        let roti = sales.iter().find(|s| s.product_id == 3).unwrap();
        assert_eq!(roti.product_name, "Roti");
    }
}
