//! Fixed-size pagination over ordered listings.
//!
//! Listings show 10 items per page. The `?page=` query parameter is
//! forgiving: anything unparsable clamps to the first page and anything
//! past the end clamps to the last page, so pagination never produces an
//! error response.

use serde::{Deserialize, Serialize};

/// Items per page on every listing endpoint
pub const PAGE_SIZE: i64 = 10;

/// Raw `?page=` query parameter; kept as a string so garbage input
/// clamps instead of failing extraction with a 400.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// A resolved page request: which page to fetch and the LIMIT/OFFSET
/// to fetch it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub num_pages: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Clamp a raw page parameter against the collection size.
pub fn resolve_page(raw: Option<&str>, total: i64) -> PageRequest {
    let num_pages = ((total.max(0) + PAGE_SIZE - 1) / PAGE_SIZE).max(1);

    let requested = raw.and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(1);
    let page = requested.clamp(1, num_pages);

    PageRequest {
        page,
        num_pages,
        limit: PAGE_SIZE,
        offset: (page - 1) * PAGE_SIZE,
    }
}

/// One page of items plus the metadata listings render alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub num_pages: i64,
    pub total: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            page: request.page,
            num_pages: request.num_pages,
            total,
            has_next: request.page < request.num_pages,
            has_previous: request.page > 1,
        }
    }
}
