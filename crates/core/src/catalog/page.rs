//! Pagination metadata returned alongside every listing page.

use serde::Serialize;

/// Page metadata for a listing response.
///
/// `total_pages` is `ceil(total / limit)` and is `0` for an empty result set,
/// in which case both navigation flags are `false` (unless `page > 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageMeta {
    /// Derive page metadata from the total matching row count.
    ///
    /// `page` and `limit` are expected to be already validated (both >= 1).
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total = total.max(0);
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };

        Self {
            total,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

/// A single page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            items,
            meta: PageMeta::new(total, page, limit),
        }
    }
}
