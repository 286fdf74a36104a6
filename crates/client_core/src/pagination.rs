//! Page selection over the in-memory post list.
//!
//! The paginator never changes which posts exist, only which slice is rendered.

use std::ops::Range;

use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 20];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page size options must be non-empty and positive")]
    InvalidOptions,
    #[error("page size {size} is not one of {options:?}")]
    UnsupportedPageSize { size: usize, options: Vec<usize> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    page_index: usize,
    page_size_options: Vec<usize>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

impl Paginator {
    pub fn new(page_size: usize, page_size_options: Vec<usize>) -> Result<Self, PageError> {
        if page_size_options.is_empty() || page_size_options.contains(&0) {
            return Err(PageError::InvalidOptions);
        }
        if !page_size_options.contains(&page_size) {
            return Err(PageError::UnsupportedPageSize {
                size: page_size,
                options: page_size_options,
            });
        }
        Ok(Self {
            page_size,
            page_index: 0,
            page_size_options,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    fn last_index(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    pub fn info(&self, total: usize) -> PageInfo {
        PageInfo {
            page_index: self.page_index,
            page_size: self.page_size,
            page_count: self.page_count(total),
            total,
        }
    }

    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[self.range(rows.len())]
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page_index < self.last_index(total)
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn next_page(&mut self, total: usize) -> bool {
        if !self.has_next(total) {
            return false;
        }
        self.page_index += 1;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    pub fn first_page(&mut self) {
        self.page_index = 0;
    }

    pub fn last_page(&mut self, total: usize) {
        self.page_index = self.last_index(total);
    }

    /// Moves to `index`, clamped to the last page.
    pub fn set_page(&mut self, index: usize, total: usize) {
        self.page_index = index.min(self.last_index(total));
    }

    /// Changes the page size while keeping the first visible row on screen.
    pub fn set_page_size(&mut self, size: usize) -> Result<(), PageError> {
        if !self.page_size_options.contains(&size) {
            return Err(PageError::UnsupportedPageSize {
                size,
                options: self.page_size_options.clone(),
            });
        }
        let start = self.page_index * self.page_size;
        self.page_index = start / size;
        self.page_size = size;
        Ok(())
    }

    /// Pulls the page index back after the row count shrank.
    pub fn clamp(&mut self, total: usize) {
        let last = self.last_index(total);
        if self.page_index > last {
            self.page_index = last;
        }
    }

    pub fn range_label(&self, total: usize) -> String {
        if total == 0 {
            return format!("0 of {total}");
        }
        let start = self.page_index * self.page_size;
        let end = if start < total {
            (start + self.page_size).min(total)
        } else {
            start + self.page_size
        };
        format!("{} – {end} of {total}", start + 1)
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
