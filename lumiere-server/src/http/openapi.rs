//! OpenAPI document generated from the route annotations

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use super::routes::{auth, awards, categories, health, media, photos};
use crate::auth::AuthUser;
use crate::models::{
    Award, Category, CategoryRequest, CreateAwardRequest, CreatePhotoRequest, ErrorBody,
    MediaType, MessageResponse, Photo, PhotoDetails, PhotoMedia, PhotoQuote, UpdateAwardRequest,
    UpdatePhotoRequest,
};
use crate::storage::StoredFile;

/// Path the document is served at
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lumiere Portfolio API",
        description = "Photos, categories and awards for a food photography portfolio"
    ),
    paths(
        health::health,
        health::ready,
        photos::list_photos,
        photos::create_photo,
        photos::get_photo,
        photos::update_photo,
        photos::delete_photo,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        awards::list_awards,
        awards::create_award,
        awards::get_award,
        awards::update_award,
        awards::delete_award,
        media::upload_local,
        media::upload_bucket,
        auth::me,
        auth::logout,
    ),
    components(schemas(
        Photo,
        PhotoDetails,
        PhotoQuote,
        PhotoMedia,
        MediaType,
        CreatePhotoRequest,
        UpdatePhotoRequest,
        Category,
        CategoryRequest,
        Award,
        CreateAwardRequest,
        UpdateAwardRequest,
        StoredFile,
        AuthUser,
        auth::MeResponse,
        MessageResponse,
        ErrorBody,
    )),
    tags(
        (name = "photos", description = "Portfolio photos with categories, quotes and media"),
        (name = "categories", description = "Photo categories"),
        (name = "awards", description = "Awards and recognition"),
        (name = "media", description = "File uploads"),
        (name = "auth", description = "Session lookup and logout"),
        (name = "health", description = "Liveness and readiness")
    )
)]
pub struct ApiDoc;

/// Document as pretty JSON
pub fn openapi_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ApiDoc::openapi())
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Route serving the document
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(OPENAPI_PATH, get(serve_openapi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/photos",
            "/api/photos/{id}",
            "/api/categories",
            "/api/categories/{id}",
            "/api/awards",
            "/api/awards/{id}",
            "/api/media/upload",
            "/api/auth/me",
            "/api/auth/logout",
            "/health",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn document_serializes() {
        let json = openapi_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["openapi"].as_str().unwrap().starts_with("3."));
        assert!(value["components"]["schemas"]["Photo"].is_object());
    }
}
