//! Sales report handlers.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use kasir_core::validation::parse_date;
use kasir_core::SalesReport;

use crate::error::{ApiResult, ErrorBody};
use crate::state::AppState;

/// Report window, as calendar days in the shop's offset.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReportQuery {
    /// First day, `YYYY-MM-DD`
    pub start_date: Option<String>,

    /// Last day (inclusive), `YYYY-MM-DD`
    pub end_date: Option<String>,
}

/// Sales report over a date range; today when either date is missing
#[utoipa::path(
    get,
    path = "/api/report",
    params(ReportQuery),
    responses(
        (status = 200, description = "Sales report", body = SalesReport),
        (status = 400, description = "Malformed date or start after end", body = ErrorBody)
    ),
    tag = "report"
)]
pub async fn report_range(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<SalesReport>> {
    let Query(query) = query?;

    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let report = match (present(query.start_date), present(query.end_date)) {
        (Some(start), Some(end)) => {
            let start = parse_date("start_date", &start)?;
            let end = parse_date("end_date", &end)?;
            state.reports.range(start, end).await?
        }
        _ => state.reports.today().await?,
    };

    Ok(Json(report))
}

/// Sales report for the current day
#[utoipa::path(
    get,
    path = "/api/report/today",
    responses(
        (status = 200, description = "Today's sales report", body = SalesReport),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "report"
)]
pub async fn report_today(State(state): State<AppState>) -> ApiResult<Json<SalesReport>> {
    Ok(Json(state.reports.today().await?))
}
