//! Pagination window derivation
//!
//! Page size is a constant chosen per viewport class, never user-selected.
//! The prefetch range covers the current page plus the following one so the
//! avatar warmer stays ahead of forward navigation.

use std::ops::Range;

/// Visible slice for one page, clamped to the row count
pub fn page_slice<T>(rows: &[T], page: usize, page_size: usize) -> &[T] {
    let start = (page * page_size).min(rows.len());
    let end = (start + page_size).min(rows.len());
    &rows[start..end]
}

/// Index range of pages `page` and `page + 1`, clamped to `len`
pub fn prefetch_range(page: usize, page_size: usize, len: usize) -> Range<usize> {
    let start = (page * page_size).min(len);
    let end = (page * page_size + 2 * page_size).min(len);
    start..end
}

/// Whether forward navigation is still possible
pub fn has_next(page: usize, page_size: usize, len: usize) -> bool {
    (page + 1) * page_size < len
}

/// Search term and page cursor for one table
///
/// Owns the rule that a search change invalidates the current page: any
/// mutation of the term resets the cursor to page 0.
#[derive(Debug, Clone)]
pub struct TableState {
    search: String,
    page: usize,
    page_size: usize,
}

impl TableState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            page: 0,
            page_size,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Update the search term, resetting the cursor to page 0
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 0;
    }

    /// Advance one page when the row count allows it
    pub fn next_page(&mut self, len: usize) {
        if has_next(self.page, self.page_size, len) {
            self.page += 1;
        }
    }

    /// Go back one page, saturating at 0
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }
}
