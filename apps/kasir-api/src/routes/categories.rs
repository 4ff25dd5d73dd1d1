//! Category handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use kasir_core::validation::validate_category_input;
use kasir_core::{Category, CategoryInput};

use super::{parse_id, MessageResponse};
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::state::AppState;

/// List all categories, newest first
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories", body = [Category]),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog.list_categories().await?))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid body", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(input) = body?;
    let input = validate_category_input(&input)?;

    let category = state.catalog.create_category(&input).await?;
    info!(category_id = category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 400, description = "Non-numeric id", body = ErrorBody),
        (status = 404, description = "No such category", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    let id = parse_id(&id)?;
    state
        .catalog
        .get_category(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category", id))
}

/// Replace a category's name and description
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Updated category", body = Category),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 404, description = "No such category", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let input = validate_category_input(&input)?;

    Ok(Json(state.catalog.update_category(id, &input).await?))
}

/// Delete a category. Its products are kept without a category.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 400, description = "Non-numeric id", body = ErrorBody),
        (status = 404, description = "No such category", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.catalog.delete_category(id).await?;
    info!(category_id = id, "Category deleted");

    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
