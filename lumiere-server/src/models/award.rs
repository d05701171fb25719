//! Awards and recognition shown on the about page

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::patch::deserialize_some;
use super::validation::required_text;
use super::ValidationError;

const MAX_TITLE_LEN: usize = 255;
const MAX_YEAR_LEN: usize = 16;
const MAX_ORGANIZATION_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Award {
    pub id: Uuid,
    pub title: String,
    pub year: String,
    pub organization: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for `POST /awards`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateAwardRequest {
    pub title: Option<String>,
    pub year: Option<String>,
    pub organization: Option<String>,
    pub description: Option<String>,
}

/// Body for `PUT /awards/{id}`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAwardRequest {
    pub title: Option<String>,
    pub year: Option<String>,
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct NewAward {
    pub title: String,
    pub year: String,
    pub organization: String,
    pub description: Option<String>,
}

impl TryFrom<CreateAwardRequest> for NewAward {
    type Error = ValidationError;

    fn try_from(req: CreateAwardRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required_text("title", req.title.as_deref(), MAX_TITLE_LEN)?,
            year: required_text("year", req.year.as_deref(), MAX_YEAR_LEN)?,
            organization: required_text(
                "organization",
                req.organization.as_deref(),
                MAX_ORGANIZATION_LEN,
            )?,
            description: req.description,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AwardChanges {
    pub title: Option<String>,
    pub year: Option<String>,
    pub organization: Option<String>,
    pub description: Option<Option<String>>,
}

impl TryFrom<UpdateAwardRequest> for AwardChanges {
    type Error = ValidationError;

    fn try_from(req: UpdateAwardRequest) -> Result<Self, Self::Error> {
        let title = req
            .title
            .map(|t| required_text("title", Some(&t), MAX_TITLE_LEN))
            .transpose()?;
        let year = req
            .year
            .map(|y| required_text("year", Some(&y), MAX_YEAR_LEN))
            .transpose()?;
        let organization = req
            .organization
            .map(|o| required_text("organization", Some(&o), MAX_ORGANIZATION_LEN))
            .transpose()?;

        Ok(Self {
            title,
            year,
            organization,
            description: req.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_all_headline_fields() {
        let req: CreateAwardRequest =
            serde_json::from_str(r#"{"title": "Best Food Photography", "year": "2024"}"#).unwrap();
        let err = NewAward::try_from(req).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "organization" }));
    }

    #[test]
    fn create_trims() {
        let req: CreateAwardRequest = serde_json::from_str(
            r#"{"title": " Best Food Photography ", "year": "2024", "organization": "Culinary Arts Awards"}"#,
        )
        .unwrap();
        let award = NewAward::try_from(req).unwrap();
        assert_eq!(award.title, "Best Food Photography");
        assert!(award.description.is_none());
    }

    #[test]
    fn update_rejects_blank_supplied_field() {
        let req: UpdateAwardRequest = serde_json::from_str(r#"{"year": " "}"#).unwrap();
        assert!(AwardChanges::try_from(req).is_err());

        let req: UpdateAwardRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let changes = AwardChanges::try_from(req).unwrap();
        assert_eq!(changes.description, Some(None));
        assert!(changes.title.is_none());
    }
}
