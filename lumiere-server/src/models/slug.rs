//! Category slug generation
//!
//! `slugify` lowercases the name and collapses every run of characters
//! outside `[a-z0-9]` into a single hyphen, then strips hyphens from both
//! ends. Non-ASCII letters count as separators.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("invalid separator regex"));

/// Derive the URL slug for a display name.
///
/// ```
/// use lumiere_server::models::slugify;
///
/// assert_eq!(slugify("Main Course!"), "main-course");
/// assert_eq!(slugify("  Desserts & Pastries  "), "desserts-pastries");
/// ```
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    SEPARATOR_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_owned()
}

/// Validated category slug, always derived from a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from `name`; names without any letter or digit are rejected.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: "name",
                reason: "must contain at least one letter or digit",
            });
        }
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
