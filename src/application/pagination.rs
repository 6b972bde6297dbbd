//! Page-number pagination over listing queries.

use thiserror::Error;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page number must be at least 1, got {0}")]
    PageOutOfRange(u64),
    #[error("per-page size must be between 1 and {MAX_PER_PAGE}, got {0}")]
    PerPageOutOfRange(u32),
}

/// A validated request for one page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::PageOutOfRange(page));
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PaginationError::PerPageOutOfRange(per_page));
        }
        Ok(Self { page, per_page })
    }

    pub fn first(per_page: u32) -> Result<Self, PaginationError> {
        Self::new(1, per_page)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        ((self.page - 1) * u64::from(self.per_page)) as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results together with enough metadata to render navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(u64::from(self.per_page))
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn prev_page(&self) -> Option<u64> {
        self.has_prev().then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<u64> {
        self.has_next().then(|| self.page + 1)
    }

    /// Page numbers to offer as direct links, windowed around the current
    /// page so long listings do not produce unbounded navigation.
    pub fn page_numbers(&self) -> Vec<u64> {
        const WINDOW: u64 = 2;
        let last = self.total_pages();
        let start = self.page.saturating_sub(WINDOW).max(1);
        let end = (self.page + WINDOW).min(last);
        (start..=end).collect()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_page_zero() {
        assert_eq!(
            PageRequest::new(0, 10),
            Err(PaginationError::PageOutOfRange(0))
        );
    }

    #[test]
    fn rejects_oversized_per_page() {
        assert_eq!(
            PageRequest::new(1, MAX_PER_PAGE + 1),
            Err(PaginationError::PerPageOutOfRange(MAX_PER_PAGE + 1))
        );
    }

    #[test]
    fn computes_offsets() {
        let request = PageRequest::new(3, 10).unwrap();
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn page_metadata() {
        let request = PageRequest::new(2, 10).unwrap();
        let page = Page::new(vec![0u8; 10], request, 35);
        assert_eq!(page.total_pages(), 4);
        assert!(page.has_prev());
        assert!(page.has_next());
        assert_eq!(page.prev_page(), Some(1));
        assert_eq!(page.next_page(), Some(3));
        assert_eq!(page.page_numbers(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_listing_has_one_page() {
        let page = Page::<u8>::new(vec![], PageRequest::default(), 0);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn window_clamps_to_bounds() {
        let request = PageRequest::new(1, 10).unwrap();
        let page = Page::new(vec![0u8; 10], request, 200);
        assert_eq!(page.page_numbers(), vec![1, 2, 3]);

        let request = PageRequest::new(20, 10).unwrap();
        let page = Page::new(vec![0u8; 10], request, 200);
        assert_eq!(page.page_numbers(), vec![18, 19, 20]);
    }
}
