//! Product handlers (`/api/produk`).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use kasir_core::validation::validate_product_input;
use kasir_core::{Product, ProductInput};

use super::{parse_id, MessageResponse};
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::state::AppState;

/// List all products with their category names
#[utoipa::path(
    get,
    path = "/api/produk",
    responses(
        (status = 200, description = "Products", body = [Product]),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "products"
)]
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog.list_products().await?))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/produk",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid body or unknown category", body = ErrorBody)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = body?;
    let input = validate_product_input(&input)?;

    let product = state.catalog.create_product(&input).await?;
    info!(
        product_id = product.id,
        name = %product.name,
        price = product.price,
        stock = product.stock,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/produk/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 400, description = "Non-numeric id", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&id)?;
    state
        .catalog
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Replace a product's fields
#[utoipa::path(
    put,
    path = "/api/produk/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Invalid id, body or category", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let input = validate_product_input(&input)?;

    Ok(Json(state.catalog.update_product(id, &input).await?))
}

/// Delete a product. Past sales keep their name snapshot.
#[utoipa::path(
    delete,
    path = "/api/produk/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, description = "Non-numeric id", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.catalog.delete_product(id).await?;
    info!(product_id = id, "Product deleted");

    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
