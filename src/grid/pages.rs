use std::ops::Range;

/// Which row block is showing. Moves are clamped; requests past either end leave the
/// page unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    total_pages: usize,
    rows_per_page: usize,
    row_count: usize,
}

/// Rows that changed visibility after a page move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChange {
    pub hidden: Range<usize>,
    pub shown: Range<usize>,
}

impl PageState {
    pub fn new(row_count: usize, rows_per_page: usize) -> Self {
        let rows_per_page = rows_per_page.max(1);
        Self {
            current_page: 0,
            total_pages: row_count.div_ceil(rows_per_page).max(1),
            rows_per_page,
            row_count,
        }
    }

    /// Starts on the page holding `row`.
    pub fn starting_at_row(mut self, row: usize) -> Self {
        self.current_page = (row / self.rows_per_page).min(self.total_pages - 1);
        self
    }

    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub const fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub const fn is_first(&self) -> bool {
        self.current_page == 0
    }

    pub const fn is_last(&self) -> bool {
        self.current_page + 1 >= self.total_pages
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page + 1, self.total_pages)
    }

    pub fn visible_rows(&self) -> Range<usize> {
        let start = (self.current_page * self.rows_per_page).min(self.row_count);
        let end = (start + self.rows_per_page).min(self.row_count);
        start..end
    }

    pub fn is_row_visible(&self, row: usize) -> bool {
        self.visible_rows().contains(&row)
    }

    pub fn next_page(&mut self) -> Option<PageChange> {
        if self.is_last() {
            return None;
        }
        Some(self.move_to(self.current_page + 1))
    }

    pub fn previous_page(&mut self) -> Option<PageChange> {
        if self.is_first() {
            return None;
        }
        Some(self.move_to(self.current_page - 1))
    }

    fn move_to(&mut self, page: usize) -> PageChange {
        let hidden = self.visible_rows();
        self.current_page = page;
        PageChange {
            hidden,
            shown: self.visible_rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_cover_every_row() {
        for rows in 0..20 {
            for per_page in 1..6 {
                let pages = PageState::new(rows, per_page);
                assert!(pages.total_pages() * pages.rows_per_page() >= rows);
                assert!(pages.total_pages() >= 1);
            }
        }
    }

    #[test]
    fn next_page_stops_on_the_last_page() {
        let mut pages = PageState::new(5, 1);
        for _ in 0..pages.total_pages() {
            let _ = pages.next_page();
        }
        assert_eq!(pages.current_page(), pages.total_pages() - 1);
        assert!(pages.next_page().is_none());
        assert_eq!(pages.label(), "Page 5 of 5");
    }

    #[test]
    fn previous_page_on_first_page_is_a_noop() {
        let mut pages = PageState::new(3, 1);
        assert!(pages.previous_page().is_none());
        assert_eq!(pages.current_page(), 0);
        assert_eq!(pages.label(), "Page 1 of 3");
    }

    #[test]
    fn page_change_toggles_exactly_one_row_block() {
        let mut pages = PageState::new(3, 1);
        let change = pages.next_page().expect("second page should exist");
        assert_eq!(change.hidden, 0..1);
        assert_eq!(change.shown, 1..2);
        assert!(pages.is_row_visible(1));
        assert!(!pages.is_row_visible(0));
    }

    #[test]
    fn last_page_may_be_partial() {
        let mut pages = PageState::new(5, 2);
        let _ = pages.next_page();
        let change = pages.next_page().expect("third page should exist");
        assert_eq!(change.shown, 4..5);
    }

    #[test]
    fn starting_row_selects_its_page() {
        let pages = PageState::new(5, 1).starting_at_row(3);
        assert_eq!(pages.current_page(), 3);
        let clamped = PageState::new(2, 1).starting_at_row(9);
        assert_eq!(clamped.current_page(), 1);
    }
}
