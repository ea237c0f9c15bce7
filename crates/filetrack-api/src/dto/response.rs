//! Response DTOs.

use serde::{Deserialize, Serialize};

use filetrack_core::types::pagination::{PageMeta, PageResponse};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
    /// Item count for list payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Page metadata for paginated payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
    /// Outcome message for workflow transitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
            pagination: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// A complete list with its count.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::ok(items)
        }
    }

    /// One page of a list with its metadata.
    pub fn page(page: PageResponse<T>) -> Self {
        let meta = page.meta();
        Self {
            count: Some(page.items.len()),
            pagination: Some(meta),
            ..Self::ok(page.items)
        }
    }
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetrack_core::types::pagination::PageRequest;

    #[test]
    fn test_page_envelope_carries_meta() {
        let page = PageRequest::new(2, 2).slice(vec!["a", "b", "c"]);
        let body = serde_json::to_value(ApiResponse::page(page)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(body["pagination"]["currentPage"], 2);
        assert_eq!(body["pagination"]["totalPages"], 2);
        assert_eq!(body["pagination"]["totalItems"], 3);
        assert_eq!(body["pagination"]["itemsPerPage"], 2);
        assert!(body.get("message").is_none());
    }
}
