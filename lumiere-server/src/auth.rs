//! Session lookup against the external auth provider
//!
//! Tokens are issued elsewhere; this module only resolves a token to a user
//! and revokes it on logout.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::SupabaseSettings;

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Role reported when the user has none in their metadata
pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("auth provider is not configured")]
    NotConfigured,

    #[error("auth provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("auth request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Authenticated user as exposed by `/auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
}

/// Trait for token lookups (testable)
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve an access token to its user.
    async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError>;

    /// Revoke the session behind `token`. An already-invalid token is not an error.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;
}

/// Auth REST client for a Supabase-compatible project
pub struct SupabaseAuth {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(settings: &SupabaseSettings) -> Result<Self, AuthError> {
        let http = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<serde_json::Value>,
}

impl From<ProviderUser> for AuthUser {
    fn from(user: ProviderUser) -> Self {
        let role = user
            .user_metadata
            .as_ref()
            .and_then(|meta| meta.get("role"))
            .and_then(|role| role.as_str())
            .filter(|role| !role.is_empty())
            .unwrap_or(DEFAULT_ROLE)
            .to_string();

        Self {
            id: user.id,
            email: user.email,
            role,
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let user: ProviderUser = response.json().await?;
                Ok(user.into())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            status => Err(AuthError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(format!("{}/auth/v1/logout", self.base_url))
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                tracing::debug!("Logout with an already-invalid token");
                Ok(())
            }
            status => Err(AuthError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

/// Access token from the `access_token` cookie, or a Bearer header.
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, ACCESS_TOKEN_COOKIE).or_else(|| bearer_token(headers))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value that deletes `name`
pub fn expired_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// Fixed token table for testing
#[derive(Default)]
pub struct StaticAuth {
    users: HashMap<String, AuthUser>,
    signed_out: Mutex<Vec<String>>,
    fail_sign_out: bool,
}

impl StaticAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as `user`
    pub fn with_user(mut self, token: impl Into<String>, user: AuthUser) -> Self {
        self.users.insert(token.into(), user);
        self
    }

    /// Make every `sign_out` fail upstream
    pub fn failing_sign_out(mut self) -> Self {
        self.fail_sign_out = true;
        self
    }

    /// Tokens passed to `sign_out`, in call order
    pub fn signed_out(&self) -> Vec<String> {
        self.signed_out
            .lock()
            .map(|tokens| tokens.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.users.get(token).cloned().ok_or(AuthError::InvalidToken)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        if self.fail_sign_out {
            return Err(AuthError::Upstream {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        if let Ok(mut tokens) = self.signed_out.lock() {
            tokens.push(token.to_string());
        }
        Ok(())
    }
}
