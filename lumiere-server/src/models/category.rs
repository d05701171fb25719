//! Category records and request schemas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::patch::deserialize_some;
use super::{Slug, ValidationError};

/// Maximum length for category names
const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Category record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for `POST /categories` and `PUT /categories/{id}`
///
/// On update an absent `description` is left as stored; `null` clears it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

/// Query parameters for `GET /categories`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryListParams {
    /// Case-insensitive substring match on name or description
    pub search: Option<String>,
}

/// Validated category name together with its derived slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryName {
    name: String,
    slug: Slug,
}

impl CategoryName {
    /// Validate a display name and derive its slug.
    ///
    /// # Rules
    /// - Required, trimmed, max 100 characters
    /// - Must slugify to a non-empty token
    pub fn new(name: Option<&str>) -> Result<Self, ValidationError> {
        let trimmed = name.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                message: "Name is required",
            });
        }
        if trimmed.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_CATEGORY_NAME_LEN,
            });
        }

        let slug = Slug::from_name(trimmed)?;
        Ok(Self {
            name: trimmed.to_owned(),
            slug,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }
}

/// Validated category write
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: CategoryName,
    /// `None` when the key was absent
    pub description: Option<Option<String>>,
}

impl CategoryInput {
    /// Description to store on insert; absent and `null` both mean none.
    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().and_then(|d| d.as_deref())
    }
}

impl TryFrom<CategoryRequest> for CategoryInput {
    type Error = ValidationError;

    fn try_from(req: CategoryRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: CategoryName::new(req.name.as_deref())?,
            description: req.description,
        })
    }
}
