//! Page counting and the compressed page-number strip.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::listing_const::PAGE_WINDOW_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

pub fn page_count(total_items: usize, page_size: usize) -> u32 {
    let page_size = page_size.max(1);
    u32::try_from(total_items.div_ceil(page_size)).unwrap_or(u32::MAX)
}

/// Page numbers to show around `current_page`: a window of up to five pages,
/// plus the first and last page with ellipses over any gap.
pub fn compute_page_window(current_page: u32, total_pages: u32) -> Vec<PageToken> {
    let window = PAGE_WINDOW_SIZE;
    if total_pages <= window {
        return (1..=total_pages).map(PageToken::Page).collect();
    }

    let current_page = current_page.clamp(1, total_pages);
    let start = current_page.saturating_sub(window / 2).clamp(1, total_pages - window + 1);
    let end = start + window - 1;

    let mut tokens = Vec::with_capacity(window as usize + 4);
    if start > 1 {
        tokens.push(PageToken::Page(1));
        if start > 2 {
            tokens.push(PageToken::Ellipsis);
        }
    }
    tokens.extend((start..=end).map(PageToken::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            tokens.push(PageToken::Ellipsis);
        }
        tokens.push(PageToken::Page(total_pages));
    }
    tokens
}

/// Current page (1-indexed) and page total; the current page is always within range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
}

impl PaginationState {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self { current_page: current_page.clamp(1, total_pages.max(1)), total_pages }
    }

    pub fn for_items(current_page: u32, total_items: usize, page_size: usize) -> Self {
        Self::new(current_page, page_count(total_items, page_size))
    }

    /// Nothing to paginate with zero or one page.
    pub fn should_render(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn previous(&self) -> Option<u32> {
        self.has_previous().then(|| self.current_page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current_page + 1)
    }

    pub fn window(&self) -> Vec<PageToken> {
        compute_page_window(self.current_page, self.total_pages)
    }

    /// Slice bounds of the current page within a list of `total_items`.
    pub fn item_range(&self, page_size: usize, total_items: usize) -> Range<usize> {
        let page_size = page_size.max(1);
        let page_index = self.current_page.saturating_sub(1) as usize;
        let start = page_index.saturating_mul(page_size).min(total_items);
        let end = start.saturating_add(page_size).min(total_items);
        start..end
    }
}
