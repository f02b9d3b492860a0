//! Listing service: search-index client, response cache and HTTP routes.

pub mod api;
pub mod cache;
pub mod config;
pub mod search_index;
