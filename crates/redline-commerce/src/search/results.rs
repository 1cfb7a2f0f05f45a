//! Catalog listing pages and pagination.

use serde::{Deserialize, Serialize};

use super::query::CatalogQuery;

/// Pagination info derived from a query and the catalog's reported total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of matching items.
    pub total: u64,
    /// Total number of pages; at least 1.
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total.div_ceil(u64::from(per_page)).max(1);
        Self {
            page: page.max(1),
            per_page,
            total,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }

    pub fn for_query(query: &CatalogQuery, total: u64) -> Self {
        Self::new(query.page, query.per_page, total)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Page numbers for a pager control, centred on the current page.
    pub fn page_numbers(&self, max_visible: u32) -> Vec<u32> {
        let max_visible = max_visible.max(1);
        if self.total_pages <= max_visible {
            return (1..=self.total_pages).collect();
        }

        let half = max_visible / 2;
        let start = self.page.saturating_sub(half).max(1);
        let end = (start + max_visible - 1).min(self.total_pages);
        let start = (end + 1).saturating_sub(max_visible).max(1);

        (start..=end).collect()
    }

    /// First item number on this page (1-indexed), 0 when empty.
    pub fn start_item(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            (u64::from(self.page) - 1) * u64::from(self.per_page) + 1
        }
    }

    /// Last item number on this page.
    pub fn end_item(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.per_page)).min(self.total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, CatalogQuery::DEFAULT_PER_PAGE, 0)
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> CatalogPage<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Pagination::default())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Transform items, keeping pagination.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CatalogPage<U> {
        CatalogPage {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

impl<T> Default for CatalogPage<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_basics() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next());
        assert!(p.has_prev());
    }

    #[test]
    fn test_pagination_last_page() {
        let p = Pagination::new(5, 10, 45);
        assert!(p.has_prev());
        assert!(!p.has_next());
        assert_eq!(p.start_item(), 41);
        assert_eq!(p.end_item(), 45);
    }

    #[test]
    fn test_empty_total_has_one_page() {
        let p = Pagination::new(1, 24, 0);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.start_item(), 0);
        assert_eq!(p.end_item(), 0);
        assert!(!p.has_next());
    }

    #[test]
    fn test_page_numbers_centred() {
        let p = Pagination::new(5, 10, 100);
        assert_eq!(p.page_numbers(5), vec![3, 4, 5, 6, 7]);

        let p = Pagination::new(10, 10, 100);
        assert_eq!(p.page_numbers(5), vec![6, 7, 8, 9, 10]);

        let p = Pagination::new(1, 10, 30);
        assert_eq!(p.page_numbers(5), vec![1, 2, 3]);
    }

    #[test]
    fn test_for_query() {
        let query = CatalogQuery::new().with_pagination(3, 20);
        let p = Pagination::for_query(&query, 61);
        assert_eq!(p.total_pages, 4);
        assert_eq!(p.start_item(), 41);
    }

    #[test]
    fn test_page_map() {
        let page = CatalogPage::new(vec![1, 2, 3], Pagination::new(1, 10, 3));
        let doubled = page.map(|n| n * 2);
        assert_eq!(doubled.items, vec![2, 4, 6]);
        assert_eq!(doubled.len(), 3);
    }
}
