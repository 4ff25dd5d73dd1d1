//! Checkout handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;

use kasir_core::{CheckoutItem, Transaction};

use crate::error::{ApiResult, ErrorBody};
use crate::state::AppState;

/// Checkout body: `{"items": [...]}` or a bare array of items.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CheckoutRequest {
    Wrapped { items: Vec<CheckoutItem> },
    Bare(Vec<CheckoutItem>),
}

impl CheckoutRequest {
    pub fn into_items(self) -> Vec<CheckoutItem> {
        match self {
            CheckoutRequest::Wrapped { items } | CheckoutRequest::Bare(items) => items,
        }
    }
}

/// Sell a batch of products atomically
#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = Transaction),
        (status = 400, description = "Invalid batch, unknown product or insufficient stock", body = ErrorBody),
        (status = 500, description = "Storage failure, nothing recorded", body = ErrorBody)
    ),
    tag = "checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Json(request) = body?;
    let transaction = state.checkout.checkout(&request.into_items()).await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_body_shapes() {
        let wrapped: CheckoutRequest =
            serde_json::from_str(r#"{"items":[{"product_id":1,"quantity":2}]}"#).unwrap();
        let bare: CheckoutRequest =
            serde_json::from_str(r#"[{"product_id":1,"quantity":2}]"#).unwrap();

        assert_eq!(wrapped.into_items(), vec![CheckoutItem::new(1, 2)]);
        assert_eq!(bare.into_items(), vec![CheckoutItem::new(1, 2)]);
    }
}
