//! Photo list query translation
//!
//! Raw query-string values are parsed here, before any SQL is built, so a
//! bad `page` or `sort_by` is a 400 and never a half-applied query.

use serde::Deserialize;
use utoipa::IntoParams;

use super::pagination::DEFAULT_LIMIT;
use super::{Pagination, ValidationError};

/// Query parameters for `GET /photos`, as received
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotoListParams {
    /// Category slug
    pub category: Option<String>,
    /// `true` restricts to featured photos; `false` applies no filter
    pub is_featured: Option<String>,
    /// `true` / `false`, defaults to `true`
    pub is_published: Option<String>,
    /// Case-insensitive substring match on title or description
    pub search: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 12, max 100)
    pub limit: Option<String>,
    /// `created_at` (default), `title` or `sort_order`
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default)
    pub sort_order: Option<String>,
}

/// Sortable photo columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    Title,
    SortOrder,
}

impl SortField {
    /// Column name, safe to splice into SQL.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Title => "title",
            Self::SortOrder => "sort_order",
        }
    }

    fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "created_at" => Ok(Self::CreatedAt),
            "title" => Ok(Self::Title),
            "sort_order" => Ok(Self::SortOrder),
            other => Err(ValidationError::InvalidVariant {
                field: "sort_by",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationError::InvalidVariant {
                field: "sort_order",
                value: value.to_owned(),
            }),
        }
    }
}

/// Validated photo list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFilters {
    pub category: Option<String>,
    pub is_featured: Option<bool>,
    pub is_published: Option<bool>,
    pub search: Option<String>,
    pub pagination: Pagination,
    pub sort_by: SortField,
    pub sort_order: SortDirection,
}

impl Default for PhotoFilters {
    fn default() -> Self {
        Self {
            category: None,
            is_featured: None,
            is_published: Some(true),
            search: None,
            pagination: Pagination::default(),
            sort_by: SortField::default(),
            sort_order: SortDirection::default(),
        }
    }
}

impl PhotoFilters {
    /// `ILIKE` pattern for the search term
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(like_pattern)
    }
}

/// Wrap a literal term for ILIKE, escaping `%`, `_` and `\`.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl TryFrom<PhotoListParams> for PhotoFilters {
    type Error = ValidationError;

    fn try_from(params: PhotoListParams) -> Result<Self, Self::Error> {
        let page = parse_number("page", params.page.as_deref())?.unwrap_or(1);
        let limit = parse_number("limit", params.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT);

        Ok(Self {
            category: non_blank(params.category),
            // Only featured photos can be singled out
            is_featured: parse_flag("is_featured", params.is_featured.as_deref())?
                .filter(|featured| *featured),
            is_published: Some(
                parse_flag("is_published", params.is_published.as_deref())?.unwrap_or(true),
            ),
            search: non_blank(params.search),
            pagination: Pagination::new(page, limit),
            sort_by: params
                .sort_by
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(SortField::parse)
                .transpose()?
                .unwrap_or_default(),
            sort_order: params
                .sort_order
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(SortDirection::parse)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_flag(field: &'static str, value: Option<&str>) -> Result<Option<bool>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(v) => Err(ValidationError::InvalidVariant {
            field,
            value: v.to_owned(),
        }),
    }
}

fn parse_number(field: &'static str, value: Option<&str>) -> Result<Option<u32>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidVariant {
                field,
                value: v.to_owned(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> PhotoListParams {
        let value = serde_json::Value::Object(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), serde_json::Value::String((*v).to_owned())))
                .collect(),
        );
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn defaults_when_empty() {
        let filters = PhotoFilters::try_from(PhotoListParams::default()).unwrap();
        assert_eq!(filters, PhotoFilters::default());
        assert_eq!(filters.is_published, Some(true));
        assert_eq!(filters.pagination, Pagination::new(1, 12));
        assert_eq!(filters.sort_by, SortField::CreatedAt);
        assert_eq!(filters.sort_order, SortDirection::Desc);
    }

    #[test]
    fn second_page_range() {
        let filters = PhotoFilters::try_from(params(&[("page", "2"), ("limit", "12")])).unwrap();
        assert_eq!(filters.pagination.range(), (12, 23));
    }

    #[test]
    fn parses_flags_and_sort() {
        let filters = PhotoFilters::try_from(params(&[
            ("is_featured", "true"),
            ("is_published", "false"),
            ("sort_by", "title"),
            ("sort_order", "asc"),
            ("category", "desserts"),
        ]))
        .unwrap();
        assert_eq!(filters.is_featured, Some(true));
        assert_eq!(filters.is_published, Some(false));
        assert_eq!(filters.sort_by.column(), "title");
        assert_eq!(filters.sort_order.keyword(), "ASC");
        assert_eq!(filters.category.as_deref(), Some("desserts"));
    }

    #[test]
    fn featured_false_is_no_filter() {
        let filters = PhotoFilters::try_from(params(&[("is_featured", "false")])).unwrap();
        assert_eq!(filters.is_featured, None);

        let filters = PhotoFilters::try_from(params(&[("is_featured", "TRUE")])).unwrap();
        assert_eq!(filters.is_featured, Some(true));
    }

    #[test]
    fn rejects_unknown_sort_column() {
        let err = PhotoFilters::try_from(params(&[("sort_by", "id; DROP TABLE photos")]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "sort_by", .. }));
    }

    #[test]
    fn rejects_non_numeric_page() {
        let err = PhotoFilters::try_from(params(&[("page", "two")])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "page", .. }));
    }

    #[test]
    fn rejects_bad_flag() {
        let err = PhotoFilters::try_from(params(&[("is_featured", "yes")])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "is_featured", .. }));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filters = PhotoFilters::try_from(params(&[("search", "  ")])).unwrap();
        assert!(filters.search.is_none());
        assert!(filters.search_pattern().is_none());
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        let filters = PhotoFilters::try_from(params(&[("search", "50%_off")])).unwrap();
        assert_eq!(filters.search_pattern().as_deref(), Some(r"%50\%\_off%"));
    }
}
