//! Listing engine shared by the service: data model, facets, filtering, sorting and pagination.

extern crate serde;


pub mod equipment;
pub mod facets;
pub mod filter;
pub mod sort;
pub mod pagination;
pub mod listing;
pub mod listing_params;
pub mod listing_const;
