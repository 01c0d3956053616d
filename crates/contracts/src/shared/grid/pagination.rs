//! Pagination state for the data grid.
//!
//! Pages are 0-indexed. The state is derived from
//! `(current_page, page_size, total_rows, max_buttons)` and recomputed on every
//! change; nothing here mutates `current_page`. Navigation requests are
//! validated by [`PaginationState::navigate`], which refuses targets outside
//! the page range instead of clamping the stored page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("at least 3 page buttons are required, got {0}")]
    TooFewButtons(usize),
}

/// One entry of the page-button bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageButton {
    Page(usize),
    Ellipsis,
}

/// Navigation request coming from the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    First,
    Previous,
    Next,
    Last,
    Page(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    /// First row index of the page (inclusive)
    pub start_row: usize,
    /// Row index after the last row of the page (exclusive)
    pub end_row: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub page_buttons: Vec<PageButton>,
}

pub fn compute_pagination(
    current_page: usize,
    page_size: usize,
    total_rows: usize,
    max_buttons: usize,
) -> Result<PaginationState, PaginationError> {
    if page_size == 0 {
        return Err(PaginationError::ZeroPageSize);
    }
    if max_buttons < 3 {
        return Err(PaginationError::TooFewButtons(max_buttons));
    }

    let total_pages = total_rows.div_ceil(page_size);

    // An out-of-range page reads as an empty slice at the end of the data.
    let start_row = current_page.saturating_mul(page_size).min(total_rows);
    let end_row = start_row.saturating_add(page_size).min(total_rows);

    Ok(PaginationState {
        current_page,
        page_size,
        total_rows,
        total_pages,
        start_row,
        end_row,
        has_previous: current_page > 0,
        has_next: current_page.saturating_add(1) < total_pages,
        page_buttons: page_buttons(current_page, total_pages, max_buttons),
    })
}

fn page_buttons(current_page: usize, total_pages: usize, max_buttons: usize) -> Vec<PageButton> {
    if total_pages <= max_buttons {
        return (0..total_pages).map(PageButton::Page).collect();
    }

    let last = total_pages - 1;
    // Window over the inner pages 1..=last-1, always at least one page wide.
    let window = max_buttons - 2;
    let lo = current_page
        .saturating_sub(window / 2)
        .max(1)
        .min(last - window);
    let hi = lo + window - 1;

    let mut buttons = Vec::with_capacity(max_buttons + 2);
    buttons.push(PageButton::Page(0));
    if lo > 1 {
        buttons.push(PageButton::Ellipsis);
    }
    buttons.extend((lo..=hi).map(PageButton::Page));
    if hi < last - 1 {
        buttons.push(PageButton::Ellipsis);
    }
    buttons.push(PageButton::Page(last));
    buttons
}

impl PaginationState {
    /// Resolves a navigation request to a target page.
    ///
    /// Returns `None` when the target is outside `0..total_pages` or equals
    /// the current page, so callers can treat `None` as "do nothing".
    pub fn navigate(&self, request: PageRequest) -> Option<usize> {
        let target = match request {
            PageRequest::First => 0,
            PageRequest::Previous => self.current_page.checked_sub(1)?,
            PageRequest::Next => self.current_page.checked_add(1)?,
            PageRequest::Last => self.total_pages.checked_sub(1)?,
            PageRequest::Page(page) => page,
        };
        if target >= self.total_pages || target == self.current_page {
            return None;
        }
        Some(target)
    }

    /// Whether `current_page` points inside the data (always false when empty).
    pub fn is_in_range(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// "41–60 из 95"; "0 из 0" when empty.
    pub fn range_label(&self) -> String {
        if self.start_row == self.end_row {
            format!("0 из {}", self.total_rows)
        } else {
            format!("{}–{} из {}", self.start_row + 1, self.end_row, self.total_rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageButton::{Ellipsis, Page};

    fn calc(current: usize, size: usize, total: usize, buttons: usize) -> PaginationState {
        compute_pagination(current, size, total, buttons).unwrap()
    }

    #[test]
    fn test_scenario_middle_page() {
        let s = calc(2, 20, 95, 7);
        assert_eq!(s.total_pages, 5);
        assert_eq!(s.start_row, 40);
        assert_eq!(s.end_row, 60);
        assert!(s.has_previous);
        assert!(s.has_next);
        assert_eq!(s.page_buttons, vec![Page(0), Page(1), Page(2), Page(3), Page(4)]);
    }

    #[test]
    fn test_scenario_empty() {
        let s = calc(0, 20, 0, 7);
        assert_eq!(s.total_pages, 0);
        assert_eq!(s.start_row, 0);
        assert_eq!(s.end_row, 0);
        assert!(!s.has_previous);
        assert!(!s.has_next);
        assert!(s.page_buttons.is_empty());
        assert_eq!(s.range_label(), "0 из 0");
    }

    #[test]
    fn test_last_partial_page() {
        let s = calc(4, 20, 95, 7);
        assert_eq!(s.start_row, 80);
        assert_eq!(s.end_row, 95);
        assert!(!s.has_next);
        assert_eq!(s.range_label(), "81–95 из 95");
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            compute_pagination(0, 0, 10, 7),
            Err(PaginationError::ZeroPageSize)
        );
        assert_eq!(
            compute_pagination(0, 10, 10, 2),
            Err(PaginationError::TooFewButtons(2))
        );
    }

    #[test]
    fn test_window_collapses_both_sides() {
        let s = calc(10, 10, 200, 7);
        assert_eq!(
            s.page_buttons,
            vec![Page(0), Ellipsis, Page(8), Page(9), Page(10), Page(11), Page(12), Ellipsis, Page(19)]
        );
    }

    #[test]
    fn test_window_clamps_at_edges() {
        let start = calc(0, 10, 200, 7);
        assert_eq!(
            start.page_buttons,
            vec![Page(0), Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(19)]
        );

        let end = calc(19, 10, 200, 7);
        assert_eq!(
            end.page_buttons,
            vec![Page(0), Ellipsis, Page(14), Page(15), Page(16), Page(17), Page(18), Page(19)]
        );
    }

    #[test]
    fn test_minimum_buttons() {
        let s = calc(5, 1, 10, 3);
        assert_eq!(s.page_buttons, vec![Page(0), Ellipsis, Page(5), Ellipsis, Page(9)]);
    }

    #[test]
    fn test_out_of_range_page_is_reported_not_corrected() {
        // rows shrank from 100 to 30 while the user was on page 7
        let s = calc(7, 10, 30, 7);
        assert_eq!(s.current_page, 7);
        assert!(!s.is_in_range());
        assert_eq!(s.start_row, 30);
        assert_eq!(s.end_row, 30);
        assert!(s.has_previous);
        assert!(!s.has_next);
    }

    #[test]
    fn test_navigate_clamps_requests() {
        let s = calc(2, 20, 95, 7);
        assert_eq!(s.navigate(PageRequest::Next), Some(3));
        assert_eq!(s.navigate(PageRequest::Previous), Some(1));
        assert_eq!(s.navigate(PageRequest::First), Some(0));
        assert_eq!(s.navigate(PageRequest::Last), Some(4));
        assert_eq!(s.navigate(PageRequest::Page(4)), Some(4));
        assert_eq!(s.navigate(PageRequest::Page(5)), None);
        assert_eq!(s.navigate(PageRequest::Page(2)), None);

        let last = calc(4, 20, 95, 7);
        assert_eq!(last.navigate(PageRequest::Next), None);

        let first = calc(0, 20, 95, 7);
        assert_eq!(first.navigate(PageRequest::Previous), None);

        let empty = calc(0, 20, 0, 7);
        assert_eq!(empty.navigate(PageRequest::Last), None);
        assert_eq!(empty.navigate(PageRequest::Next), None);
    }

    #[test]
    fn test_navigate_from_invalid_state() {
        let s = calc(7, 10, 30, 7);
        assert_eq!(s.navigate(PageRequest::Next), None);
        assert_eq!(s.navigate(PageRequest::Previous), None);
        assert_eq!(s.navigate(PageRequest::First), Some(0));
        assert_eq!(s.navigate(PageRequest::Last), Some(2));
    }

    #[test]
    fn test_invariants_hold_for_small_inputs() {
        for total_rows in 0..=120 {
            for page_size in 1..=13 {
                let expected_pages = if total_rows == 0 {
                    0
                } else {
                    (total_rows + page_size - 1) / page_size
                };
                for max_buttons in 3..=9 {
                    for current in 0..expected_pages.max(1) {
                        let s = calc(current, page_size, total_rows, max_buttons);
                        assert_eq!(s.total_pages, expected_pages);
                        assert!(s.start_row <= s.end_row);
                        assert!(s.end_row <= total_rows);
                        assert!(s.end_row - s.start_row <= page_size);
                        check_buttons(&s, max_buttons);
                    }
                }
            }
        }
    }

    fn check_buttons(s: &PaginationState, max_buttons: usize) {
        let pages: Vec<usize> = s
            .page_buttons
            .iter()
            .filter_map(|b| match b {
                Page(p) => Some(*p),
                Ellipsis => None,
            })
            .collect();

        assert!(pages.len() <= max_buttons);
        assert!(pages.windows(2).all(|w| w[0] < w[1]));
        assert!(pages.iter().all(|p| *p < s.total_pages));

        if s.total_pages > max_buttons {
            assert_eq!(pages.first(), Some(&0));
            assert_eq!(pages.last(), Some(&(s.total_pages - 1)));
            assert!(pages.contains(&s.current_page));
        } else {
            assert_eq!(pages.len(), s.total_pages);
        }

        for pair in s.page_buttons.windows(2) {
            assert!(!(pair[0] == Ellipsis && pair[1] == Ellipsis));
            // consecutive page numbers never hide a gap
            if let (Page(a), Page(b)) = (pair[0], pair[1]) {
                assert_eq!(b, a + 1);
            }
        }
    }
}
