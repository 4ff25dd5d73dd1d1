//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kasir API                              │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  PUT /api/categories/42                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::NotFound ───────────┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Rule Violation? ─── LedgerError::Core ────── ApiError ─────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── 404 {"error":"Not Found","code":"NOT_FOUND","message":"..."}    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage details never reach the client: they are logged with
//! `tracing::error!` and replaced by a generic message.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use kasir_core::{CoreError, ValidationError};
use kasir_db::{DbError, LedgerError};

/// API error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Malformed body, id, date or a failed field rule (400)
    InvalidInput,

    /// Checkout references an unknown product (400)
    ProductNotFound,

    /// Checkout asks for more than is on hand (400)
    InsufficientStock,

    /// Storage failure (500)
    PersistenceFailure,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidInput
            | ErrorCode::ProductNotFound
            | ErrorCode::InsufficientStock => StatusCode::BAD_REQUEST,
            ErrorCode::PersistenceFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of every error response.
///
/// ```json
/// {
///   "error": "Bad Request",
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for product Teh Botol (id 2): available 5, requested 10"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Canonical HTTP reason phrase
    pub error: String,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: i64) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            code: self.code,
            message: self.message,
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::ForeignKeyViolation { message } => {
                tracing::debug!(%message, "Rejected reference");
                ApiError::invalid("Referenced category does not exist")
            }
            DbError::ConstraintViolation { message } => {
                tracing::debug!(%message, "Rejected by constraint");
                ApiError::invalid("Value violates a data constraint")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::PersistenceFailure, "Database is busy")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::PersistenceFailure, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match err {
            CoreError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            _ => ErrorCode::InvalidInput,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::invalid(err.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Core(e) => e.into(),
            LedgerError::Persistence(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid(rejection.body_text())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(DbError::not_found("Category", 7)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DbError::foreign_key("FOREIGN KEY constraint failed")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DbError::QueryFailed("disk I/O error".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(CoreError::ProductNotFound(99)).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_ledger_errors_keep_their_code() {
        let err: ApiError = LedgerError::Core(CoreError::InsufficientStock {
            product_id: 2,
            product_name: "Teh Botol".to_string(),
            available: 5,
            requested: 10,
        })
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Teh Botol"));

        let err: ApiError =
            LedgerError::Persistence(DbError::TransactionFailed("locked".to_string())).into();
        assert_eq!(err.code, ErrorCode::PersistenceFailure);
        assert!(!err.message.contains("locked"));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "Not Found".to_string(),
            code: ErrorCode::NotFound,
            message: "Category not found: 3".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["error"], "Not Found");
    }
}
