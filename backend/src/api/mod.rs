//! HTTP routes proxying the search index.

use axum::Router;
use axum::routing::get;
use common::listing::ListingPipeline;

use crate::search_index::SearchIndexClient;

pub mod error;

mod listings;
pub use listings::{buy_listings, geo_radius_from_query_pairs, listing_facets, rent_listings};

mod machines;
pub use machines::get_machine;

#[derive(Debug, Clone)]
pub struct AppState {
    pub client: SearchIndexClient,
    pub pipeline: ListingPipeline,
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/listings", get(rent_listings))
        .route("/api/listings/buy", get(buy_listings))
        .route("/api/facets", get(listing_facets))
        .route("/api/machines/{id}", get(get_machine))
        .with_state(state)
}
