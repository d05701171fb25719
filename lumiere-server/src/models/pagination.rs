//! Pagination types

use serde::Serialize;
use utoipa::ToSchema;

/// Maximum items per page
pub const MAX_LIMIT: u32 = 100;

/// Default items per page (one gallery grid)
pub const DEFAULT_LIMIT: u32 = 12;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Page is clamped to minimum of 1
    /// - Limit is clamped to 1..=100
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Zero-based inclusive row range `(start, end)` covered by this page.
    pub fn range(&self) -> (u64, u64) {
        let start = self.offset();
        (start, start + u64::from(self.limit) - 1)
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated response envelope: `{ data, total, page, limit, totalPages }`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Paginated<T> {
    /// Items for current page
    pub data: Vec<T>,
    /// Total matching rows across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// `ceil(total / limit)`
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, page: Pagination) -> Self {
        Self {
            data,
            total,
            page: page.page,
            limit: page.limit,
            total_pages: total_pages(total, page.limit),
        }
    }
}

/// `ceil(total / limit)`; zero rows means zero pages.
pub fn total_pages(total: i64, limit: u32) -> u32 {
    if total <= 0 || limit == 0 {
        return 0;
    }
    let limit = i64::from(limit);
    ((total + limit - 1) / limit) as u32
}
