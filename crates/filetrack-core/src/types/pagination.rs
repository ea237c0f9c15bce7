//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_PAGE_SIZE: u64 = 20;
/// Maximum page size.
const MAX_PAGE_SIZE: u64 = 100;
/// Largest offset Postgres accepts as a `BIGINT`.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Calculate the SQL `OFFSET` value. Pages past the end saturate
    /// instead of overflowing.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(MAX_OFFSET)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Slice an already materialized, ordered collection.
    pub fn slice<T: Serialize>(&self, items: Vec<T>) -> PageResponse<T> {
        let total = items.len() as u64;
        let page: Vec<T> = items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit() as usize)
            .collect();
        PageResponse::new(page, self.page, self.page_size, total)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T: Serialize> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total_items: u64) -> Self {
        let total_pages = if total_items == 0 {
            1
        } else {
            total_items.div_ceil(page_size.max(1))
        };
        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }

    /// Pagination metadata in the shape clients expect.
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            current_page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            items_per_page: self.page_size,
        }
    }
}

/// Pagination metadata returned alongside list payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_second_page() {
        let page = PageRequest::new(2, 2).slice(vec![1, 2, 3, 4, 5]);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.meta().total_items, 5);
    }

    #[test]
    fn test_empty_has_one_page() {
        let page: PageResponse<u8> = PageResponse::new(Vec::new(), 1, 20, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_huge_page_is_empty() {
        let req = PageRequest::new(u64::MAX, 20);
        assert_eq!(req.offset(), i64::MAX as u64);

        let page = req.slice(vec![1, 2, 3]);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 3);
        assert_eq!(page.meta().current_page, u64::MAX);
    }

    #[test]
    fn test_new_clamps() {
        let req = PageRequest::new(0, 1000);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 100);
    }
}
