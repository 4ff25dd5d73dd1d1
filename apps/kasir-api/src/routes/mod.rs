//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /                               home::home  (HTML landing page)       │
//! │  /health                         health::health                        │
//! │  /api                                                                   │
//! │   ├── /categories               categories::{list, create}             │
//! │   ├── /categories/{id}          categories::{get, update, delete}      │
//! │   ├── /produk                   products::{list, create}               │
//! │   ├── /produk/{id}              products::{get, update, delete}        │
//! │   ├── /checkout                 checkout::checkout                     │
//! │   ├── /report                   report::range                          │
//! │   └── /report/today             report::today  (alias /report/hari-ini)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod categories;
pub mod checkout;
pub mod health;
pub mod home;
pub mod products;
pub mod report;

use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Business routes, mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/produk",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/produk/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/checkout", post(checkout::checkout))
        .route("/report", get(report::report_range))
        .route("/report/today", get(report::report_today))
        .route("/report/hari-ini", get(report::report_today))
}

/// Body of delete responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// Parses a path id. Non-numeric ids are rejected as bad input rather than
/// left to the extractor.
pub(crate) fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::invalid(format!("Invalid id: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("").is_err());
        assert!(parse_id("1.5").is_err());
    }
}
