use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A validated page request. `page_size` is already capped at the configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page_number: i64, page_size: i64, max_page_size: i64) -> Result<Self, ApiError> {
        if page_number < 1 {
            return Err(ApiError::bad_request("pageNumber must be 1 or greater"));
        }
        if page_size < 1 {
            return Err(ApiError::bad_request("pageSize must be 1 or greater"));
        }

        Ok(Self {
            page_number,
            page_size: page_size.min(max_page_size.max(1)),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Serialized into the `X-Pagination` response header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: i64,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

impl PaginationMetadata {
    pub fn new(total_count: i64, page: PageRequest) -> Self {
        let total_pages = if total_count <= 0 {
            0
        } else {
            (total_count + page.page_size - 1) / page.page_size
        };

        Self {
            total_count: total_count.max(0),
            page_size: page.page_size,
            current_page: page.page_number,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_page_size_at_maximum() {
        for requested in [21, 50, 1000, i64::MAX] {
            let page = PageRequest::new(1, requested, 20).unwrap();
            assert_eq!(page.page_size, 20);
        }
        assert_eq!(PageRequest::new(1, 20, 20).unwrap().page_size, 20);
        assert_eq!(PageRequest::new(1, 7, 20).unwrap().page_size, 7);
    }

    #[test]
    fn rejects_non_positive_bounds() {
        assert!(matches!(PageRequest::new(0, 10, 20), Err(ApiError::BadRequest(_))));
        assert!(matches!(PageRequest::new(1, 0, 20), Err(ApiError::BadRequest(_))));
        assert!(matches!(PageRequest::new(-3, -3, 20), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn offset_follows_page_number() {
        let page = PageRequest::new(3, 10, 20).unwrap();
        assert_eq!(page.offset(), 20);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn total_pages_is_ceiling_of_count_over_size() {
        for (count, size, expected) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (3, 1, 3), (41, 20, 3)] {
            let page = PageRequest::new(1, size, 20).unwrap();
            let meta = PaginationMetadata::new(count, page);
            assert_eq!(meta.total_pages, expected, "count={count} size={size}");
            assert_eq!(meta.page_size, size);
            assert_eq!(meta.current_page, 1);
        }
    }

    #[test]
    fn metadata_serializes_with_header_field_names() {
        let meta = PaginationMetadata::new(3, PageRequest::new(2, 2, 20).unwrap());
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"totalCount": 3, "pageSize": 2, "currentPage": 2, "totalPages": 2})
        );
    }
}
