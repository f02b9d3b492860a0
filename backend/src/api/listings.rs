//! Listing endpoints: fetch around a point, then filter, sort and paginate in memory.

use axum::Json;
use axum::extract::{Query, State};
use common::equipment::EquipmentRecord;
use common::facets::{FacetSet, compute_facets};
use common::listing::ListingPage;
use common::listing_const::DEFAULT_SEARCH_RADIUS_METERS;
use common::listing_params::ListingParams;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::search_index::{GeoRadius, ListingKind};

type QueryPairs = Vec<(String, String)>;

/// Reads `lat`, `lng` and `radius` from the query; a point needs both coordinates.
pub fn geo_radius_from_query_pairs(pairs: &[(String, String)]) -> Option<GeoRadius> {
    let value = |name: &str| {
        pairs
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    };
    let lat = value("lat").filter(|v| (-90.0..=90.0).contains(v))?;
    let lng = value("lng").filter(|v| (-180.0..=180.0).contains(v))?;
    let radius_meters = value("radius")
        .filter(|r| *r >= 1.0)
        .map(|r| r.min(u32::MAX as f64) as u32)
        .unwrap_or(DEFAULT_SEARCH_RADIUS_METERS);
    Some(GeoRadius { lat, lng, radius_meters })
}

/// Every record of the storefront around the point. The attribute selection
/// is left out so the facets still offer the unselected values.
async fn fetch_records(
    state: &AppState,
    kind: ListingKind,
    pairs: &[(String, String)],
) -> anyhow::Result<Vec<EquipmentRecord>> {
    let around = geo_radius_from_query_pairs(pairs);
    state.client.search_listing(kind, around).await
}

async fn listing_page(
    state: AppState,
    kind: ListingKind,
    pairs: QueryPairs,
) -> Result<Json<ListingPage>, ApiError> {
    let params =
        ListingParams::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let records = fetch_records(&state, kind, &pairs).await?;
    Ok(Json(state.pipeline.run(&records, &params)))
}

pub async fn rent_listings(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<ListingPage>, ApiError> {
    listing_page(state, ListingKind::Rent, pairs).await
}

pub async fn buy_listings(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<ListingPage>, ApiError> {
    listing_page(state, ListingKind::Buy, pairs).await
}

/// Facets for the records around a point, ignoring the attribute selection.
pub async fn listing_facets(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> Result<Json<FacetSet>, ApiError> {
    let kind = match pairs.iter().rev().find(|(k, _)| k == "kind").map(|(_, v)| v.as_str()) {
        Some("buy") => ListingKind::Buy,
        _ => ListingKind::Rent,
    };
    let records = fetch_records(&state, kind, &pairs).await?;
    Ok(Json(compute_facets(&records)))
}
