//! Typed listing parameters parsed from URL query pairs.
//!
//! This is the only place raw query strings are interpreted. Anything
//! malformed falls back to "unconstrained" or the default instead of failing.

use serde::{Deserialize, Serialize};

use crate::filter::{FilterSelection, PurchaseOption};
use crate::sort::SortKey;

pub const PARAM_CATEGORY: &str = "category";
pub const PARAM_MAKE: &str = "make";
pub const PARAM_MODEL: &str = "model";
pub const PARAM_PURCHASE_OPTIONS: &str = "purchaseOptions";
pub const PARAM_MIN_HOURS: &str = "minHours";
pub const PARAM_MAX_HOURS: &str = "maxHours";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_PAGE: &str = "page";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingParams {
    pub selection: FilterSelection,
    pub sort: SortKey,
    pub page: u32,
}

impl Default for ListingParams {
    fn default() -> Self {
        Self { selection: FilterSelection::default(), sort: SortKey::default(), page: 1 }
    }
}

fn parse_bound(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl ListingParams {
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = ListingParams::default();
        let mut sort = None;
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            let selection = &mut params.selection;
            match key.as_ref() {
                PARAM_CATEGORY => {
                    selection.categories.insert(value.to_string());
                }
                PARAM_MAKE => {
                    selection.makes.insert(value.to_string());
                }
                PARAM_MODEL => {
                    selection.models.insert(value.to_string());
                }
                PARAM_PURCHASE_OPTIONS => {
                    if let Ok(option) = value.parse::<PurchaseOption>() {
                        selection.purchase_options.insert(option);
                    }
                }
                PARAM_MIN_HOURS => selection.min_hours = parse_bound(value),
                PARAM_MAX_HOURS => selection.max_hours = parse_bound(value),
                PARAM_SORT => sort = Some(value.to_string()),
                PARAM_PAGE => params.page = value.parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1),
                _ => {}
            }
        }
        params.sort = SortKey::parse_or_default(sort.as_deref());
        params
    }

    /// Canonical query pairs; defaults are left out.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let selection = &self.selection;
        pairs.extend(selection.categories.iter().map(|v| (PARAM_CATEGORY, v.clone())));
        pairs.extend(selection.makes.iter().map(|v| (PARAM_MAKE, v.clone())));
        pairs.extend(selection.models.iter().map(|v| (PARAM_MODEL, v.clone())));
        pairs.extend(selection.purchase_options.iter().map(|o| (PARAM_PURCHASE_OPTIONS, o.to_string())));
        if let Some(min) = selection.min_hours() {
            pairs.push((PARAM_MIN_HOURS, format_bound(min)));
        }
        if let Some(max) = selection.max_hours() {
            pairs.push((PARAM_MAX_HOURS, format_bound(max)));
        }
        if self.sort != SortKey::default() {
            pairs.push((PARAM_SORT, self.sort.to_string()));
        }
        if self.page > 1 {
            pairs.push((PARAM_PAGE, self.page.to_string()));
        }
        pairs
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self { page: page.max(1), ..self.clone() }
    }
}
