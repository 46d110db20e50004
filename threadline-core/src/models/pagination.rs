//! Pagination types for the feed and profile listings

use serde::{Deserialize, Serialize};

/// Upper bound applied to page sizes taken from query strings
pub const MAX_PER_PAGE: u32 = 100;

/// Default items per page
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Pagination parameters
///
/// Fields are private so that `page` and `per_page` are never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    per_page: u32,
}

impl Pagination {
    /// Create pagination, raising `page` and `per_page` to at least 1.
    ///
    /// Any larger page size is kept as given, so `skip()` is always
    /// `(page - 1) * per_page`.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Page number (1-indexed)
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of records to skip before this page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page)
            .saturating_sub(1)
            .saturating_mul(u64::from(self.per_page))
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus the information needed to request the next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage<T> {
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    /// True when records exist beyond this page
    pub has_next: bool,
}

impl<T> FeedPage<T> {
    /// Build a page, deriving `has_next` from the unfiltered total.
    pub fn new(items: Vec<T>, total: u64, page: Pagination) -> Self {
        let has_next = total > page.skip() + items.len() as u64;
        Self {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
            has_next,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Query parameters for pagination
///
/// Page sizes from a query string are capped at [`MAX_PER_PAGE`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(
            params.page.unwrap_or(1),
            params
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .min(MAX_PER_PAGE),
        )
    }
}
