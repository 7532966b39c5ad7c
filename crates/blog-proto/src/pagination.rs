//! Page math and the page-selector model behind the pagination bar.

/// Number of pages needed for `total` items, `ceil(total / page_size)`.
///
/// A zero page size never comes out of a validated config; it yields 0 pages
/// here rather than dividing by zero.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// One control per page, exactly one of them active (unless there are none).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSelector {
    total_pages: usize,
    active: Option<usize>,
}

impl PageSelector {
    /// `displayed` is the page whose posts are on screen. When it doesn't
    /// correspond to a control, the first control is marked active.
    pub fn new(total_pages: usize, displayed: usize) -> Self {
        let active = if total_pages == 0 {
            None
        } else if (1..=total_pages).contains(&displayed) {
            Some(displayed)
        } else {
            Some(1)
        };
        Self {
            total_pages,
            active,
        }
    }

    pub fn from_total(total_count: usize, page_size: usize, displayed: usize) -> Self {
        Self::new(page_count(total_count, page_size), displayed)
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, page: usize) -> bool {
        self.active == Some(page)
    }

    /// Page numbers, 1-indexed, in display order.
    pub fn pages(&self) -> impl Iterator<Item = usize> {
        1..=self.total_pages
    }

    /// Move the active mark to `page`. Returns false (and changes nothing)
    /// for pages that have no control.
    pub fn select(&mut self, page: usize) -> bool {
        if !(1..=self.total_pages).contains(&page) {
            return false;
        }
        self.active = Some(page);
        true
    }

    pub fn next_page(&self) -> Option<usize> {
        self.active.filter(|&p| p < self.total_pages).map(|p| p + 1)
    }

    pub fn prev_page(&self) -> Option<usize> {
        self.active.filter(|&p| p > 1).map(|p| p - 1)
    }
}
