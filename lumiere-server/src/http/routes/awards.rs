//! Award endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::db::repos::AwardRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidUuid};
use crate::models::{
    ApiResponse, Award, AwardChanges, CreateAwardRequest, ErrorBody, MessageResponse, NewAward,
    UpdateAwardRequest,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/awards",
    tag = "awards",
    responses(
        (status = 200, description = "Awards, most recent first", body = ApiResponse<Vec<Award>>)
    )
)]
pub async fn list_awards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Award>>>, ApiError> {
    let awards = AwardRepo::new(&state.pool).list().await?;
    Ok(Json(ApiResponse::new(awards)))
}

#[utoipa::path(
    post,
    path = "/api/awards",
    tag = "awards",
    request_body = CreateAwardRequest,
    responses(
        (status = 201, description = "Award created", body = ApiResponse<Award>),
        (status = 400, description = "Missing title, year or organization", body = ErrorBody)
    )
)]
pub async fn create_award(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateAwardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Award>>), ApiError> {
    let award = NewAward::try_from(req)?;
    let created = AwardRepo::new(&state.pool).create(&award).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(created))))
}

#[utoipa::path(
    get,
    path = "/api/awards/{id}",
    tag = "awards",
    params(("id" = uuid::Uuid, Path, description = "Award id")),
    responses(
        (status = 200, description = "Award", body = ApiResponse<Award>),
        (status = 404, description = "Award not found", body = ErrorBody)
    )
)]
pub async fn get_award(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ApiResponse<Award>>, ApiError> {
    let award = AwardRepo::new(&state.pool).get(id).await?;
    Ok(Json(ApiResponse::new(award)))
}

#[utoipa::path(
    put,
    path = "/api/awards/{id}",
    tag = "awards",
    params(("id" = uuid::Uuid, Path, description = "Award id")),
    request_body = UpdateAwardRequest,
    responses(
        (status = 200, description = "Updated award", body = ApiResponse<Award>),
        (status = 400, description = "Blank field", body = ErrorBody),
        (status = 404, description = "Award not found", body = ErrorBody)
    )
)]
pub async fn update_award(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<UpdateAwardRequest>,
) -> Result<Json<ApiResponse<Award>>, ApiError> {
    let changes = AwardChanges::try_from(req)?;
    let award = AwardRepo::new(&state.pool).update(id, &changes).await?;
    Ok(Json(ApiResponse::new(award)))
}

#[utoipa::path(
    delete,
    path = "/api/awards/{id}",
    tag = "awards",
    params(("id" = uuid::Uuid, Path, description = "Award id")),
    responses(
        (status = 200, description = "Award deleted", body = MessageResponse),
        (status = 404, description = "Award not found", body = ErrorBody)
    )
)]
pub async fn delete_award(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<MessageResponse>, ApiError> {
    AwardRepo::new(&state.pool).delete(id).await?;
    Ok(Json(MessageResponse::new("Award deleted successfully")))
}

/// Award routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/awards", get(list_awards).post(create_award))
        .route(
            "/awards/{id}",
            get(get_award).put(update_award).delete(delete_award),
        )
}
