//! Shared pagination envelope for list endpoints.
//!
//! All list views page their results; out-of-range page numbers clamp to the
//! nearest valid page rather than erroring.

use serde::{Deserialize, Serialize};

/// Resolved window over a result set of `total` rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageWindow {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub offset: i64,
    pub limit: i64,
}

/// Computes the effective page window, clamping the requested page into
/// [1, total_pages]. An empty result set still yields page 1 of 1.
pub fn page_window(requested: u32, per_page: u32, total: i64) -> PageWindow {
    let per_page = per_page.max(1);
    let total_pages = if total <= 0 {
        1
    } else {
        ((total as u64).div_ceil(per_page as u64)) as u32
    };
    let page = requested.clamp(1, total_pages);
    PageWindow {
        page,
        per_page,
        total_pages,
        offset: (page as i64 - 1) * per_page as i64,
        limit: per_page as i64,
    }
}

/// JSON envelope returned by paginated endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, window: &PageWindow) -> Self {
        Page {
            items,
            total,
            page: window.page,
            per_page: window.per_page,
            total_pages: window.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_is_single_page() {
        let w = page_window(1, 10, 0);
        assert_eq!(w.page, 1);
        assert_eq!(w.total_pages, 1);
        assert_eq!(w.offset, 0);
    }

    #[test]
    fn test_exact_multiple_of_per_page() {
        let w = page_window(3, 10, 30);
        assert_eq!(w.total_pages, 3);
        assert_eq!(w.page, 3);
        assert_eq!(w.offset, 20);
    }

    #[test]
    fn test_partial_last_page() {
        let w = page_window(1, 10, 31);
        assert_eq!(w.total_pages, 4);
    }

    #[test]
    fn test_out_of_range_clamps_to_last() {
        let w = page_window(99, 10, 25);
        assert_eq!(w.page, 3);
        assert_eq!(w.offset, 20);
    }

    #[test]
    fn test_page_zero_clamps_to_first() {
        let w = page_window(0, 15, 100);
        assert_eq!(w.page, 1);
        assert_eq!(w.offset, 0);
    }

    #[test]
    fn test_envelope_carries_window() {
        let w = page_window(2, 10, 25);
        let page = Page::new(vec![1, 2, 3], 25, &w);
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total, 25);
    }
}
