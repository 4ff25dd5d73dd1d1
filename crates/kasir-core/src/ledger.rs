//! # Ledger Rules
//!
//! The pure half of checkout and reporting. The storage half (locking,
//! decrementing, inserting, aggregating queries) lives in `kasir-db`.
//!
//! ## Checkout Line Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each CheckoutItem, inside one transaction scope:                   │
//! │                                                                         │
//! │   lock_product ──► check_stock ──► price_line ──► RunningTotal::add    │
//! │   (kasir-db)       (this file)     (this file)    (this file)          │
//! │                         │               │               │               │
//! │                         ▼               ▼               ▼               │
//! │                InsufficientStock   AmountOverflow   AmountOverflow     │
//! │                                                                         │
//! │  then decrement_stock (kasir-db), so the next line for the same        │
//! │  product sees the reduced stock.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Report Window
//! ```text
//!   start_date=2026-03-01, end_date=2026-03-02, offset=+07:00
//!
//!   local:  [2026-03-01 00:00+07:00 ........ 2026-03-03 00:00+07:00)
//!   utc:    [2026-02-28 17:00Z      ........ 2026-03-02 17:00Z)
//!
//!   Both boundary days are included; the upper bound is exclusive.
//! ```

use chrono::{DateTime, Days, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BestSellingProduct, ProductSales, ProductSnapshot, SalesReport, SalesTotals};

// =============================================================================
// Stock Validator
// =============================================================================

/// Checks that `quantity` units of `product` are on hand.
pub fn check_stock(product: &ProductSnapshot, quantity: i64) -> CoreResult<()> {
    if product.stock < quantity {
        return Err(CoreError::InsufficientStock {
            product_id: product.id,
            product_name: product.name.clone(),
            available: product.stock,
            requested: quantity,
        });
    }
    Ok(())
}

// =============================================================================
// Pricing Calculator
// =============================================================================

/// A checkout line priced at the moment of sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    /// Name snapshot persisted on the detail row.
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// Prices one line: `subtotal = price * quantity`, overflow-checked.
pub fn price_line(product: &ProductSnapshot, quantity: i64) -> CoreResult<PricedLine> {
    let unit_price = Money::from_units(product.price);
    let subtotal = unit_price
        .checked_mul(quantity)
        .ok_or_else(|| CoreError::AmountOverflow {
            context: format!("subtotal of product {}", product.id),
        })?;

    Ok(PricedLine {
        product_id: product.id,
        product_name: product.name.clone(),
        quantity,
        unit_price,
        subtotal,
    })
}

/// Accumulates line subtotals into a transaction total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningTotal {
    total: Money,
}

impl RunningTotal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a priced line, failing on overflow.
    pub fn add(&mut self, line: &PricedLine) -> CoreResult<()> {
        self.total = self
            .total
            .checked_add(line.subtotal)
            .ok_or_else(|| CoreError::AmountOverflow {
                context: "transaction total".to_string(),
            })?;
        Ok(())
    }

    pub fn total(&self) -> Money {
        self.total
    }
}

// =============================================================================
// Report Rules
// =============================================================================

/// An inclusive range of calendar days, resolved to a half-open UTC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Inclusive lower bound: `start` at local midnight.
    pub from: DateTime<Utc>,
    /// Exclusive upper bound: the day after `end` at local midnight.
    pub until: DateTime<Utc>,
}

impl ReportWindow {
    /// Resolves `[start, end]` in the given offset.
    ///
    /// ## Errors
    /// `InvalidDateRange` if `start > end`, or if a bound falls outside
    /// chrono's representable range.
    pub fn new(start: NaiveDate, end: NaiveDate, offset: FixedOffset) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidDateRange { start, end };

        if start > end {
            return Err(invalid());
        }

        let from = local_midnight(start, offset).ok_or_else(invalid)?;
        let next_day = end.checked_add_days(Days::new(1)).ok_or_else(invalid)?;
        let until = local_midnight(next_day, offset)
            .ok_or_else(invalid)?
            .min(latest_stored_instant().ok_or_else(invalid)?);

        Ok(Self {
            start,
            end,
            from,
            until,
        })
    }

    /// The window covering the calendar day `now` falls on in `offset`.
    pub fn today(now: DateTime<Utc>, offset: FixedOffset) -> CoreResult<Self> {
        let day = now.with_timezone(&offset).date_naive();
        Self::new(day, day, offset)
    }
}

/// Timestamps are stored as RFC 3339 text and compared as strings, which
/// only orders correctly while the year has four digits.
fn latest_stored_instant() -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(9999, 12, 31)?
        .and_hms_nano_opt(23, 59, 59, 999_999_999)
        .map(|at| at.and_utc())
}

fn local_midnight(day: NaiveDate, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&midnight)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

/// Picks the best seller: highest quantity, ties go to the lowest product id.
pub fn pick_best_seller(sales: &[ProductSales]) -> Option<BestSellingProduct> {
    sales
        .iter()
        .filter(|s| s.quantity_sold > 0)
        .max_by(|a, b| {
            a.quantity_sold
                .cmp(&b.quantity_sold)
                .then_with(|| b.product_id.cmp(&a.product_id))
        })
        .map(|s| BestSellingProduct {
            name: s.product_name.clone(),
            quantity_sold: s.quantity_sold,
        })
}

/// Builds the report from the window's aggregates.
pub fn summarize(totals: SalesTotals, sales: &[ProductSales]) -> SalesReport {
    if totals.transaction_count == 0 {
        return SalesReport::empty();
    }

    SalesReport {
        total_revenue: totals.revenue,
        transaction_count: totals.transaction_count,
        best_seller: pick_best_seller(sales),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: i64, name: &str, price: i64, stock: i64) -> ProductSnapshot {
        ProductSnapshot {
            id,
            name: name.to_string(),
            price,
            stock,
        }
    }

    fn sales(product_id: i64, name: &str, quantity_sold: i64) -> ProductSales {
        ProductSales {
            product_id,
            product_name: name.to_string(),
            quantity_sold,
        }
    }

    fn jakarta() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_check_stock() {
        let teh = snapshot(2, "Teh Botol", 3_000, 5);
        assert!(check_stock(&teh, 5).is_ok());

        match check_stock(&teh, 10) {
            Err(CoreError::InsufficientStock {
                product_id,
                available,
                requested,
                ..
            }) => {
                assert_eq!(product_id, 2);
                assert_eq!(available, 5);
                assert_eq!(requested, 10);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn test_price_and_total() {
        let nasi = snapshot(1, "Nasi Goreng", 15_000, 10);
        let teh = snapshot(2, "Teh Botol", 3_000, 5);

        let mut total = RunningTotal::new();
        let first = price_line(&nasi, 2).unwrap();
        let second = price_line(&teh, 3).unwrap();
        total.add(&first).unwrap();
        total.add(&second).unwrap();

        assert_eq!(first.subtotal.units(), 30_000);
        assert_eq!(second.subtotal.units(), 9_000);
        assert_eq!(total.total().units(), 39_000);
    }

    #[test]
    fn test_price_overflow() {
        let gold = snapshot(9, "Emas", i64::MAX / 2, 10);
        assert!(matches!(
            price_line(&gold, 3),
            Err(CoreError::AmountOverflow { .. })
        ));

        let line = price_line(&gold, 2).unwrap();
        let mut total = RunningTotal::new();
        total.add(&line).unwrap();
        assert!(total.add(&line).is_err());
    }

    #[test]
    fn test_report_window_bounds() {
        let window = ReportWindow::new(date(2026, 3, 1), date(2026, 3, 2), jakarta()).unwrap();
        assert_eq!(window.from.to_rfc3339(), "2026-02-28T17:00:00+00:00");
        assert_eq!(window.until.to_rfc3339(), "2026-03-02T17:00:00+00:00");

        // Both boundary days are included
        let late_on_end_day = Utc.with_ymd_and_hms(2026, 3, 2, 16, 59, 59).unwrap();
        assert!(window.from <= late_on_end_day && late_on_end_day < window.until);
    }

    #[test]
    fn test_report_window_stays_within_four_digit_years() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let window = ReportWindow::new(date(2026, 3, 1), date(9999, 12, 31), utc).unwrap();
        assert_eq!(
            window.until.to_rfc3339(),
            "9999-12-31T23:59:59.999999999+00:00"
        );

        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let window = ReportWindow::new(date(9999, 12, 31), date(9999, 12, 31), west).unwrap();
        assert!(window.from < window.until);
        assert!(window.until.to_rfc3339().starts_with("9999-"));
    }

    #[test]
    fn test_report_window_rejects_reversed_range() {
        assert!(matches!(
            ReportWindow::new(date(2026, 3, 2), date(2026, 3, 1), jakarta()),
            Err(CoreError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_today_uses_local_calendar_day() {
        // 18:30 UTC is already the next day in +07:00
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 18, 30, 0).unwrap();
        let window = ReportWindow::today(now, jakarta()).unwrap();
        assert_eq!(window.start, date(2026, 3, 2));
        assert_eq!(window.end, date(2026, 3, 2));
        assert!(window.from <= now && now < window.until);
    }

    #[test]
    fn test_best_seller_tie_break() {
        let rows = vec![
            sales(5, "Kopi", 4),
            sales(3, "Teh", 7),
            sales(2, "Susu", 7),
            sales(1, "Air", 1),
        ];
        let best = pick_best_seller(&rows).unwrap();
        assert_eq!(best.name, "Susu");
        assert_eq!(best.quantity_sold, 7);

        assert!(pick_best_seller(&[]).is_none());
    }

    #[test]
    fn test_summarize_empty_window() {
        let report = summarize(SalesTotals::default(), &[]);
        assert_eq!(report, SalesReport::empty());
    }

    #[test]
    fn test_summarize() {
        let totals = SalesTotals {
            revenue: 39_000,
            transaction_count: 1,
        };
        let report = summarize(totals, &[sales(1, "Nasi Goreng", 2), sales(2, "Teh Botol", 3)]);
        assert_eq!(report.total_revenue, 39_000);
        assert_eq!(report.transaction_count, 1);
        assert_eq!(report.best_seller.unwrap().name, "Teh Botol");
    }
}
