//! Listing constants shared between the engine and the service.

pub const PAGE_SIZE: usize = 12;

/// Consecutive page numbers shown around the current page.
pub const PAGE_WINDOW_SIZE: u32 = 5;

/// Upper hours bound used when the selection leaves it open.
pub const MAX_HOURS_UNBOUNDED: f64 = 375_000.0;

/// 100 miles.
pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 160_934;

/// Records fetched per listing request; everything is filtered in memory.
pub const MAX_SEARCH_HITS: u32 = 1000;
