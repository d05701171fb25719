//! Router tests that never reach the database
//!
//! Requests are rejected (or served) before any query runs, so a lazy pool
//! pointing at a closed port is enough.

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use lumiere_server::auth::{AuthUser, StaticAuth};
use lumiere_server::db::create_lazy_pool;
use lumiere_server::storage::MemoryStore;
use lumiere_server::{build_router, AppConfig, AppState};

const UNREACHABLE_DB: &str = "postgres://lumiere@127.0.0.1:1/lumiere";
const BOUNDARY: &str = "lumiere-test-boundary";
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

fn state_for(upload_dir: &Path) -> AppState {
    let pool = create_lazy_pool(UNREACHABLE_DB, 1).unwrap();
    let mut config = AppConfig::default();
    config.storage.upload_dir = upload_dir.to_path_buf();
    AppState::new(pool, config)
}

fn chef() -> AuthUser {
    AuthUser {
        id: "user-1".into(),
        email: Some("chef@example.com".into()),
        role: "admin".into(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

enum Part<'a> {
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

fn multipart(method: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri("/api/media/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn png(name: &str) -> Part<'_> {
    Part::File {
        name: "file",
        file_name: name,
        content_type: "image/png",
        bytes: PNG_BYTES,
    }
}

// === Health and docs ===

#[tokio::test]
async fn health_reports_ok() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()));

    let (status, body) = send(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/photos"].is_object());
}

// === Request validation ===

#[tokio::test]
async fn photo_without_title_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()));

    let (status, body) = send(
        &app,
        json_request("POST", "/api/photos", r#"{"file_path": "/uploads/a.png"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Title and file_path are required" }));
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()));

    let (status, body) = send(&app, json_request("POST", "/api/photos", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
}

#[tokio::test]
async fn invalid_photo_id_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()));

    let (status, body) = send(&app, get("/api/photos/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("id"));
}

#[tokio::test]
async fn unknown_sort_field_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()));

    let (status, body) = send(&app, get("/api/photos?sort_by=password")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sort_by"));
}

#[tokio::test]
async fn category_without_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()));

    let (status, body) = send(&app, json_request("POST", "/api/categories", r#"{"name": "  "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");
}

// === Local uploads ===

#[tokio::test]
async fn local_upload_writes_file_and_serves_it() {
    let dir = TempDir::new().unwrap();
    let upload_dir = dir.path().join("uploads");
    let app = build_router(state_for(&upload_dir));

    let (status, body) = send(&app, multipart("POST", &[png("plate.png")])).await;
    assert_eq!(status, StatusCode::CREATED);

    let data = &body["data"];
    let file_path = data["file_path"].as_str().unwrap();
    assert!(file_path.starts_with("/uploads/"));
    assert!(file_path.ends_with(".png"));
    assert_eq!(data["file_size"], PNG_BYTES.len());
    assert_eq!(data["mime_type"], "image/png");
    assert!(data.get("storage_path").is_none());

    let file_name = file_path.trim_start_matches("/uploads/");
    let on_disk = std::fs::read(upload_dir.join(file_name)).unwrap();
    assert_eq!(on_disk, PNG_BYTES);

    let response = app.clone().oneshot(get(file_path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&served[..], PNG_BYTES);
}

#[tokio::test]
async fn local_upload_rejects_wrong_type_without_writing() {
    let dir = TempDir::new().unwrap();
    let upload_dir = dir.path().join("uploads");
    let app = build_router(state_for(&upload_dir));

    let part = Part::File {
        name: "file",
        file_name: "notes.txt",
        content_type: "text/plain",
        bytes: b"hello",
    };
    let (status, body) = send(&app, multipart("POST", &[part])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid file type. Only JPEG, PNG, and WebP are allowed."
    );
    assert!(!upload_dir.exists());
}

#[tokio::test]
async fn local_upload_requires_file_field() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()));

    let part = Part::Text {
        name: "caption",
        value: "dessert",
    };
    let (status, body) = send(&app, multipart("POST", &[part])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let dir = TempDir::new().unwrap();
    let upload_dir = dir.path().join("uploads");
    let pool = create_lazy_pool(UNREACHABLE_DB, 1).unwrap();
    let mut config = AppConfig::default();
    config.storage.upload_dir = upload_dir.clone();
    config.storage.max_upload_bytes = 4;
    let app = build_router(AppState::new(pool, config));

    let (status, _) = send(&app, multipart("POST", &[png("big.png")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!upload_dir.exists());
}

// === Bucket uploads ===

#[tokio::test]
async fn bucket_upload_goes_to_default_bucket() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new("https://storage.example"));
    let state = state_for(dir.path()).with_object_store(store.clone());
    let app = build_router(state);

    let (status, body) = send(&app, multipart("PUT", &[png("menu.png")])).await;
    assert_eq!(status, StatusCode::CREATED);

    let storage_path = body["data"]["storage_path"].as_str().unwrap();
    assert!(storage_path.ends_with(".png"));
    assert_eq!(
        body["data"]["file_path"],
        format!("https://storage.example/public/photos/{storage_path}")
    );
    let (content_type, bytes) = store.get("photos", storage_path).unwrap();
    assert_eq!(content_type, "image/png");
    assert_eq!(&bytes[..], PNG_BYTES);
}

#[tokio::test]
async fn bucket_upload_honours_bucket_field() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new("https://storage.example"));
    let app = build_router(state_for(dir.path()).with_object_store(store.clone()));

    let bucket = Part::Text {
        name: "bucket",
        value: "awards",
    };
    let (status, body) = send(&app, multipart("PUT", &[bucket, png("cup.png")])).await;
    assert_eq!(status, StatusCode::CREATED);
    let storage_path = body["data"]["storage_path"].as_str().unwrap();
    assert!(store.get("awards", storage_path).is_some());
    assert!(store.get("photos", storage_path).is_none());
}

#[tokio::test]
async fn bucket_upload_without_store_is_server_error() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()));

    let (status, body) = send(&app, multipart("PUT", &[png("menu.png")])).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

// === Auth ===

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let dir = TempDir::new().unwrap();
    let app = build_router(state_for(dir.path()).with_auth(Arc::new(StaticAuth::new())));

    let (status, body) = send(&app, get("/api/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authenticated");
}

#[tokio::test]
async fn me_resolves_cookie_token() {
    let dir = TempDir::new().unwrap();
    let auth = StaticAuth::new().with_user("good-token", chef());
    let app = build_router(state_for(dir.path()).with_auth(Arc::new(auth)));

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, "access_token=good-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], "user-1");
    assert_eq!(body["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn me_rejects_unknown_bearer_token() {
    let dir = TempDir::new().unwrap();
    let auth = StaticAuth::new().with_user("good-token", chef());
    let app = build_router(state_for(dir.path()).with_auth(Arc::new(auth)));

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, "Bearer stale-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn logout_clears_both_cookies() {
    let dir = TempDir::new().unwrap();
    let auth = Arc::new(StaticAuth::new().with_user("good-token", chef()));
    let app = build_router(state_for(dir.path()).with_auth(auth.clone()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, "access_token=good-token; refresh_token=r")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("access_token=;")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=;")));
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Logged out successfully");
    assert_eq!(auth.signed_out(), vec!["good-token".to_string()]);
}

#[tokio::test]
async fn logout_reports_provider_failure() {
    let dir = TempDir::new().unwrap();
    let auth = StaticAuth::new().failing_sign_out();
    let app = build_router(state_for(dir.path()).with_auth(Arc::new(auth)));

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, "Bearer whatever")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to logout");
}
