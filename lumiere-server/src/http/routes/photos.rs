//! Photo endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::db::repos::PhotoRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::models::{
    ApiResponse, CreatePhotoRequest, ErrorBody, MessageResponse, NewPhoto, Paginated,
    PhotoChanges, PhotoDetails, PhotoFilters, PhotoListParams, UpdatePhotoRequest,
};
use crate::state::AppState;

/// GET /photos - filtered, sorted, paginated list
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "photos",
    params(PhotoListParams),
    responses(
        (status = 200, description = "One page of photos", body = Paginated<PhotoDetails>),
        (status = 400, description = "Invalid query parameter", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PhotoListParams>,
) -> Result<Json<Paginated<PhotoDetails>>, ApiError> {
    let filters = PhotoFilters::try_from(params)?;
    let page = PhotoRepo::new(&state.pool).list(&filters).await?;
    Ok(Json(page))
}

/// POST /photos - create a photo and link its categories
#[utoipa::path(
    post,
    path = "/api/photos",
    tag = "photos",
    request_body = CreatePhotoRequest,
    responses(
        (status = 201, description = "Photo created", body = ApiResponse<PhotoDetails>),
        (status = 400, description = "Missing title or file_path", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
pub async fn create_photo(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreatePhotoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PhotoDetails>>), ApiError> {
    let photo = NewPhoto::try_from(req)?;
    let created = PhotoRepo::new(&state.pool).create(&photo).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(created))))
}

/// GET /photos/{id}
#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = uuid::Uuid, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Photo with categories, quotes and media", body = ApiResponse<PhotoDetails>),
        (status = 404, description = "Photo not found", body = ErrorBody)
    )
)]
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ApiResponse<PhotoDetails>>, ApiError> {
    let photo = PhotoRepo::new(&state.pool).get(id).await?;
    Ok(Json(ApiResponse::new(photo)))
}

/// PUT /photos/{id} - partial update; `categories` replaces the whole set
#[utoipa::path(
    put,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = uuid::Uuid, Path, description = "Photo id")),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Updated photo", body = ApiResponse<PhotoDetails>),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "Photo not found", body = ErrorBody)
    )
)]
pub async fn update_photo(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<UpdatePhotoRequest>,
) -> Result<Json<ApiResponse<PhotoDetails>>, ApiError> {
    let changes = PhotoChanges::try_from(req)?;
    let photo = PhotoRepo::new(&state.pool).update(id, &changes).await?;
    Ok(Json(ApiResponse::new(photo)))
}

/// DELETE /photos/{id}
#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = uuid::Uuid, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Photo deleted", body = MessageResponse),
        (status = 404, description = "Photo not found", body = ErrorBody)
    )
)]
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<MessageResponse>, ApiError> {
    PhotoRepo::new(&state.pool).delete(id).await?;
    Ok(Json(MessageResponse::new("Photo deleted successfully")))
}

/// Photo routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/photos", get(list_photos).post(create_photo))
        .route(
            "/photos/{id}",
            get(get_photo).put(update_photo).delete(delete_photo),
        )
}
