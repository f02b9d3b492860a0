//! Filter-string builder for search-index queries.

use serde::{Deserialize, Serialize};

/// Which storefront a listing request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    #[default]
    Rent,
    Buy,
}

/// Index filter for a listing fetch. Only the storefront is pushed down:
/// facets are counted over everything fetched, so the attribute selection
/// and the hours range are applied in memory.
pub fn build_filters(kind: ListingKind) -> Option<String> {
    match kind {
        ListingKind::Rent => None,
        ListingKind::Buy => Some("buyItNow:true".to_string()),
    }
}
