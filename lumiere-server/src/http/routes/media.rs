//! Media upload endpoints
//!
//! - POST: local disk, type and size checked before anything is written
//! - PUT: object storage bucket, type checked

use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::http::error::ApiError;
use crate::models::{ApiResponse, ErrorBody};
use crate::state::AppState;
use crate::storage::{upload_to_bucket, StorageError, StoredFile, Upload};

/// Documented shape of the local upload form
#[derive(utoipa::ToSchema)]
pub struct LocalUploadForm {
    #[schema(format = Binary)]
    pub file: String,
}

/// Documented shape of the bucket upload form
#[derive(utoipa::ToSchema)]
pub struct BucketUploadForm {
    #[schema(format = Binary)]
    pub file: String,
    /// Defaults to `photos`
    pub bucket: Option<String>,
}

/// Multipart form fields we care about
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<Upload>,
    bucket: Option<String>,
}

async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> Result<UploadForm, ApiError> {
    let mut multipart = multipart.map_err(|rejection| ApiError::BadRequest {
        message: rejection.body_text(),
    })?;

    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(Upload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some("bucket") => {
                let bucket = field.text().await.map_err(multipart_error)?;
                form.bucket = Some(bucket.trim().to_owned()).filter(|b| !b.is_empty());
            }
            _ => {}
        }
    }
    Ok(form)
}

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::BadRequest {
        message: e.body_text(),
    }
}

/// POST /media/upload - store a file on local disk
#[utoipa::path(
    post,
    path = "/api/media/upload",
    tag = "media",
    request_body(content = LocalUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = ApiResponse<StoredFile>),
        (status = 400, description = "Missing file, wrong type or too large", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
pub async fn upload_local(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<StoredFile>>), ApiError> {
    let form = read_form(multipart).await?;
    let upload = form.file.ok_or(StorageError::MissingFile)?;

    let stored = state.local_store.save(&upload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(stored))))
}

/// PUT /media/upload - store a file in an object storage bucket
#[utoipa::path(
    put,
    path = "/api/media/upload",
    tag = "media",
    request_body(content = BucketUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded", body = ApiResponse<StoredFile>),
        (status = 400, description = "Missing file or wrong type", body = ErrorBody),
        (status = 500, description = "Upload failed", body = ErrorBody)
    )
)]
pub async fn upload_bucket(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<StoredFile>>), ApiError> {
    let form = read_form(multipart).await?;
    let upload = form.file.ok_or(StorageError::MissingFile)?;
    let bucket = form
        .bucket
        .unwrap_or_else(|| state.config.storage.default_bucket.clone());

    let store = state
        .object_store
        .as_deref()
        .ok_or(StorageError::NotConfigured)?;

    let stored = upload_to_bucket(store, &bucket, &upload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(stored))))
}

/// Media routes; `max_body_bytes` replaces axum's default body limit
pub fn router(max_body_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/media/upload", post(upload_local).put(upload_bucket))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
