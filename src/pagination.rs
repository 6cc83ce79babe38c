//! Fixed-size client-side pagination.
//!
//! Page numbers are 1-based. Every request is clamped into range; nothing
//! here returns an error.
use serde::Serialize;

/// Entries per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Number of pages needed for `len` items. Always at least 1.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// One page's view of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number after clamping.
    pub number: usize,
    pub total_pages: usize,
    /// Position of `items[0]` within the full sequence.
    pub offset: usize,
}

impl<T> Page<'_, T> {
    /// Controls are only drawn when there is more than one page.
    pub fn shows_controls(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Slice out page `page` (clamped to `[1, total_pages]`).
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let total = total_pages(items.len(), size);
    let number = page.clamp(1, total);
    let start = ((number - 1) * size).min(items.len());
    let end = (start + size).min(items.len());

    Page {
        items: &items[start..end],
        number,
        total_pages: total,
        offset: start,
    }
}

/// Page navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
    First,
    Last,
}

/// Current-page tracker for a sequence whose length can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current: usize,
    total: usize,
}

impl Paginator {
    /// A page size of 0 is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
            total: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self) -> usize {
        self.total
    }

    /// Update for a sequence of `len` items, keeping the current page in range.
    pub fn set_len(&mut self, len: usize) {
        self.total = total_pages(len, self.page_size);
        self.current = self.current.clamp(1, self.total);
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Jump to `page`, clamped.
    pub fn go_to(&mut self, page: usize) {
        self.current = page.clamp(1, self.total);
    }

    /// Returns true if the page changed.
    pub fn next(&mut self) -> bool {
        if self.current < self.total {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Returns true if the page changed.
    pub fn prev(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Returns true if the page changed.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let before = self.current;
        match direction {
            Direction::Prev => {
                self.prev();
            }
            Direction::Next => {
                self.next();
            }
            Direction::First => self.current = 1,
            Direction::Last => self.current = self.total,
        }
        before != self.current
    }

    /// Slice the current page out of `items`.
    pub fn page<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        paginate(items, self.page_size, self.current)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

// ============================================================================
// Tests
// ============================================================================
