//! Page/limit arithmetic for paginated listings.

use serde::Serialize;

/// Default page size.
pub const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size.
pub const MAX_LIMIT: i64 = 100;

/// A resolved page request (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Clamp caller input: page >= 1, limit in `1..=MAX_LIMIT`.
    ///
    /// A missing or zero limit falls back to [`DEFAULT_LIMIT`]; a negative one
    /// clamps to 1.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = match limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(l) => l.clamp(1, MAX_LIMIT),
        };
        Self { page, limit }
    }

    /// Rows to skip for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Pagination metadata for a result set with `total` rows.
    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            total,
            page: self.page,
            limit: self.limit,
            total_pages: (total + self.limit - 1) / self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// The `meta` block returned alongside a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}
