//! # kasir-api: HTTP Server for Kasir POS
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TcpListener ──► axum Router ──► TraceLayer (request span)             │
//! │                       │                                                 │
//! │                       ├── /            landing page                    │
//! │                       ├── /health                                       │
//! │                       ├── /swagger/*   Swagger UI                       │
//! │                       ├── /api-docs/openapi.json                        │
//! │                       └── /api/* ──► handler(State<AppState>)          │
//! │                                          │                              │
//! │                     ┌────────────────────┼─────────────────────┐        │
//! │                     ▼                    ▼                     ▼        │
//! │              CatalogStore         CheckoutEngine        ReportAggregator│
//! │                     └────────────────────┴─────────────────────┘        │
//! │                                          │                              │
//! │                                   SqliteStore / MemoryStore             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The router is built by [`app`] so tests can drive it with
//! `tower::ServiceExt::oneshot` without opening a socket.

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home::home))
        .route("/health", get(routes::health::health))
        .merge(swagger_ui())
        .nest("/api", routes::api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Swagger UI at `/swagger/index.html`, backed by `/api-docs/openapi.json`.
fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger").url("/api-docs/openapi.json", openapi::ApiDoc::openapi())
}
