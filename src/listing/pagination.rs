use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Cards per page by viewport width
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageSizes {
    pub mobile: usize,
    pub tablet: usize,
    pub desktop: usize,
    /// Widths below this are mobile
    pub mobile_below_px: u32,
    /// Widths below this (and not mobile) are tablet
    pub tablet_below_px: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            mobile: 4,
            tablet: 6,
            desktop: 9,
            mobile_below_px: 640,
            tablet_below_px: 1024,
        }
    }
}

impl PageSizes {
    pub fn for_width(&self, width_px: u32) -> usize {
        let size = if width_px < self.mobile_below_px {
            self.mobile
        } else if width_px < self.tablet_below_px {
            self.tablet
        } else {
            self.desktop
        };
        size.max(1)
    }
}

/// Zero-based page cursor over `total` items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    total: usize,
    page: usize,
}

impl Paginator {
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total,
            page: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// At least one page, even when empty.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// Item indices on the current page.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size
    }

    /// Jump to `page`, clamped to the last page.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn next(&mut self) -> bool {
        let before = self.page;
        self.go_to(self.page + 1);
        self.page != before
    }

    pub fn prev(&mut self) -> bool {
        let before = self.page;
        self.page = self.page.saturating_sub(1);
        self.page != before
    }

    /// Change the page size, keeping the first visible item on screen.
    pub fn set_page_size(&mut self, page_size: usize) {
        let first = self.range().start;
        self.page_size = page_size.max(1);
        self.go_to(self.page_of(first));
    }
}
