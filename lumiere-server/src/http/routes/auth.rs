//! Session endpoints backed by the external auth provider

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{
    access_token, expired_cookie, AuthError, AuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
};
use crate::http::error::ApiError;
use crate::models::{ApiResponse, ErrorBody, MessageResponse};
use crate::state::AppState;

/// `data` of `GET /auth/me`
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: AuthUser,
}

/// GET /auth/me - user behind the access token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<MeResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let token = access_token(&headers).ok_or(AuthError::MissingToken)?;
    let auth = state.auth.as_deref().ok_or(AuthError::NotConfigured)?;

    let user = auth.get_user(&token).await?;
    Ok(Json(ApiResponse::new(MeResponse { user })))
}

/// POST /auth/logout - revoke the session and clear auth cookies
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out, cookies cleared", body = MessageResponse),
        (status = 500, description = "Provider refused the logout", body = ErrorBody)
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state.auth.as_deref().ok_or(AuthError::NotConfigured)?;

    if let Some(token) = access_token(&headers) {
        auth.sign_out(&token).await.map_err(|e| ApiError::Upstream {
            message: "Failed to logout",
            detail: e.to_string(),
        })?;
    }

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, expired_cookie(ACCESS_TOKEN_COOKIE)),
            (header::SET_COOKIE, expired_cookie(REFRESH_TOKEN_COOKIE)),
        ]),
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}
