//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use filetrack_core::types::pagination::PageRequest;

/// Query parameters for paginated endpoints.
///
/// A list endpoint paginates only when `page` is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page (default: 20, max: 100).
    pub limit: Option<u64>,
}

impl PaginationParams {
    /// The requested page, if any.
    pub fn page_request(&self) -> Option<PageRequest> {
        self.page.map(|page| self.with_default(page))
    }

    /// The requested page, defaulting to the first.
    pub fn or_first(&self) -> PageRequest {
        self.with_default(self.page.unwrap_or(1))
    }

    fn with_default(&self, page: u64) -> PageRequest {
        PageRequest::new(page, self.limit.unwrap_or(PageRequest::default().page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_page_means_unpaginated() {
        assert!(PaginationParams::default().page_request().is_none());
    }

    #[test]
    fn test_limit_is_clamped() {
        let params = PaginationParams {
            page: Some(0),
            limit: Some(500),
        };
        let page = params.page_request().unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);
    }
}
