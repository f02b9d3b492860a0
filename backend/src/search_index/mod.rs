//! Client for the external geo-search index holding machine listings.

mod client;
pub use client::{GeoRadius, SearchIndexClient, SearchRequest, SearchResponse};

pub mod filters;
pub use filters::{ListingKind, build_filters};

#[derive(Debug, thiserror::Error)]
pub enum SearchIndexError {
    #[error("search index is not configured")]
    NotConfigured,
    #[error("search index returned {status}: {body}")]
    Status { status: u16, body: String },
}
