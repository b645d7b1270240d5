//! Offset pagination primitives.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Items per page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Hard cap on items per page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a page request, rejecting `page < 1` and sizes outside `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> DomainResult<Self> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(DomainError::validation("page must be >= 1"));
        }
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(DomainError::validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of records to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// One page of results plus the pre-pagination match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let req = PageRequest::new(None, None).unwrap();
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn rejects_page_zero_and_oversized_pages() {
        assert!(matches!(PageRequest::new(Some(0), None), Err(DomainError::Validation(_))));
        assert!(matches!(PageRequest::new(None, Some(0)), Err(DomainError::Validation(_))));
        assert!(matches!(PageRequest::new(None, Some(101)), Err(DomainError::Validation(_))));
        assert!(PageRequest::new(None, Some(100)).is_ok());
    }

    #[test]
    fn third_page_skips_twenty() {
        let req = PageRequest::new(Some(3), Some(10)).unwrap();
        assert_eq!(req.offset(), 20);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn page_echoes_request() {
        let req = PageRequest::new(Some(3), Some(10)).unwrap();
        let page = Page::new(vec![1u8, 2], 22, req).map(u32::from);
        assert_eq!(page.items, vec![1u32, 2]);
        assert_eq!((page.total, page.page, page.page_size), (22, 3, 10));
    }

    proptest! {
        /// Property: consecutive pages never overlap and tile the result set.
        #[test]
        fn offsets_tile_without_gaps(page in 1u32..10_000, size in 1u32..=MAX_PAGE_SIZE) {
            let this = PageRequest::new(Some(page), Some(size)).unwrap();
            let next = PageRequest::new(Some(page + 1), Some(size)).unwrap();
            prop_assert_eq!(this.offset() + this.limit(), next.offset());
        }
    }
}
