//! Photo records, child records and request schemas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::patch::deserialize_some;
use super::{Category, ValidationError};

/// Maximum length for photo titles
const MAX_TITLE_LEN: usize = 255;

/// Photo row as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Photo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub camera_model: Option<String>,
    pub lens: Option<String>,
    pub focal_length: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<i32>,
    pub taken_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub is_featured: bool,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Photo with its categories, quotes and media variants
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PhotoDetails {
    #[serde(flatten)]
    pub photo: Photo,
    pub categories: Vec<Category>,
    pub quotes: Vec<PhotoQuote>,
    pub media: Vec<PhotoMedia>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoQuote {
    pub id: Uuid,
    pub photo_id: Uuid,
    pub quote: String,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Rendition size of a stored media variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Thumbnail,
    Medium,
    Large,
    Original,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoMedia {
    pub id: Uuid,
    pub photo_id: Uuid,
    pub file_path: String,
    pub media_type: MediaType,
    pub file_size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /photos`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreatePhotoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub camera_model: Option<String>,
    pub lens: Option<String>,
    pub focal_length: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<i32>,
    pub taken_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
    /// Category ids to link to the new photo
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

/// Body for `PUT /photos/{id}`.
///
/// Absent keys are left untouched; `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePhotoRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Cannot be cleared
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub file_size: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub mime_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    pub width: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    pub height: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub camera_model: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub lens: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub focal_length: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub aperture: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub shutter_speed: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    pub iso: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub taken_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
    /// When present, replaces the full category set
    pub categories: Option<Vec<Uuid>>,
}

/// Validated photo title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoTitle(String);

impl PhotoTitle {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated insert for the `photos` table
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub title: PhotoTitle,
    pub description: Option<String>,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub camera_model: Option<String>,
    pub lens: Option<String>,
    pub focal_length: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<i32>,
    pub taken_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub is_featured: bool,
    pub is_published: bool,
    pub sort_order: i32,
    pub categories: Vec<Uuid>,
}

impl TryFrom<CreatePhotoRequest> for NewPhoto {
    type Error = ValidationError;

    fn try_from(req: CreatePhotoRequest) -> Result<Self, Self::Error> {
        let title = req.title.as_deref().map(str::trim).unwrap_or_default();
        let file_path = req.file_path.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() || file_path.is_empty() {
            return Err(ValidationError::Required {
                message: "Title and file_path are required",
            });
        }

        Ok(Self {
            title: PhotoTitle::new(title)?,
            file_path: file_path.to_owned(),
            description: req.description,
            file_size: req.file_size,
            mime_type: req.mime_type,
            width: req.width,
            height: req.height,
            camera_model: req.camera_model,
            lens: req.lens,
            focal_length: req.focal_length,
            aperture: req.aperture,
            shutter_speed: req.shutter_speed,
            iso: req.iso,
            taken_at: req.taken_at,
            location: req.location,
            is_featured: req.is_featured.unwrap_or(false),
            is_published: req.is_published.unwrap_or(true),
            sort_order: req.sort_order.unwrap_or(0),
            categories: dedup_ids(req.categories),
        })
    }
}

/// Validated partial update for the `photos` table
#[derive(Debug, Clone, Default)]
pub struct PhotoChanges {
    pub title: Option<PhotoTitle>,
    pub description: Option<Option<String>>,
    pub file_path: Option<String>,
    pub file_size: Option<Option<i64>>,
    pub mime_type: Option<Option<String>>,
    pub width: Option<Option<i32>>,
    pub height: Option<Option<i32>>,
    pub camera_model: Option<Option<String>>,
    pub lens: Option<Option<String>>,
    pub focal_length: Option<Option<String>>,
    pub aperture: Option<Option<String>>,
    pub shutter_speed: Option<Option<String>>,
    pub iso: Option<Option<i32>>,
    pub taken_at: Option<Option<DateTime<Utc>>>,
    pub location: Option<Option<String>>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
    pub categories: Option<Vec<Uuid>>,
}

impl TryFrom<UpdatePhotoRequest> for PhotoChanges {
    type Error = ValidationError;

    fn try_from(req: UpdatePhotoRequest) -> Result<Self, Self::Error> {
        let title = req.title.as_deref().map(PhotoTitle::new).transpose()?;
        let file_path = match req.file_path.as_deref().map(str::trim) {
            Some("") => return Err(ValidationError::Empty { field: "file_path" }),
            other => other.map(str::to_owned),
        };

        Ok(Self {
            title,
            description: req.description,
            file_path,
            file_size: req.file_size,
            mime_type: req.mime_type,
            width: req.width,
            height: req.height,
            camera_model: req.camera_model,
            lens: req.lens,
            focal_length: req.focal_length,
            aperture: req.aperture,
            shutter_speed: req.shutter_speed,
            iso: req.iso,
            taken_at: req.taken_at,
            location: req.location,
            is_featured: req.is_featured,
            is_published: req.is_published,
            sort_order: req.sort_order,
            categories: req.categories.map(dedup_ids),
        })
    }
}

/// Drop repeated ids, keeping first-seen order.
fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
