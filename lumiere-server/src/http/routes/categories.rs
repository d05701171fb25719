//! Category endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::db::repos::CategoryRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::models::{
    ApiResponse, Category, CategoryInput, CategoryListParams, CategoryRequest, ErrorBody,
    MessageResponse,
};
use crate::state::AppState;

/// GET /categories - all categories by name
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    params(CategoryListParams),
    responses(
        (status = 200, description = "Categories ordered by name", body = ApiResponse<Vec<Category>>),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<CategoryListParams>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = CategoryRepo::new(&state.pool)
        .list(params.search.as_deref())
        .await?;
    Ok(Json(ApiResponse::new(categories)))
}

/// POST /categories - slug derived from name
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Name is required", body = ErrorBody),
        (status = 409, description = "Name or slug already exists", body = ErrorBody)
    )
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), ApiError> {
    let input = CategoryInput::try_from(req)?;
    let category = CategoryRepo::new(&state.pool).create(&input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(category))))
}

/// GET /categories/{id}
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = uuid::Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<Category>),
        (status = 404, description = "Category not found", body = ErrorBody)
    )
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let category = CategoryRepo::new(&state.pool).get(id).await?;
    Ok(Json(ApiResponse::new(category)))
}

/// PUT /categories/{id} - replace name and description, slug recomputed
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = uuid::Uuid, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = ApiResponse<Category>),
        (status = 400, description = "Name is required", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody),
        (status = 409, description = "Name or slug already exists", body = ErrorBody)
    )
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<CategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let input = CategoryInput::try_from(req)?;
    let category = CategoryRepo::new(&state.pool).update(id, &input).await?;
    Ok(Json(ApiResponse::new(category)))
}

/// DELETE /categories/{id} - refused while photos link to it
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = uuid::Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, description = "Category not found", body = ErrorBody),
        (status = 409, description = "Category is used by photos", body = ErrorBody)
    )
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<MessageResponse>, ApiError> {
    CategoryRepo::new(&state.pool).delete(id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}
