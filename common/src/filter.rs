//! Filter predicate engine: AND across dimensions, OR within a dimension.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::equipment::EquipmentRecord;
use crate::listing_const::MAX_HOURS_UNBOUNDED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PurchaseOption {
    RentToPurchase,
    BuyItNow,
}

impl PurchaseOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOption::RentToPurchase => "rentToPurchase",
            PurchaseOption::BuyItNow => "buyItNow",
        }
    }
}

impl fmt::Display for PurchaseOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown purchase option: {0:?}")]
pub struct ParsePurchaseOptionError(pub String);

impl FromStr for PurchaseOption {
    type Err = ParsePurchaseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rentToPurchase" => Ok(PurchaseOption::RentToPurchase),
            "buyItNow" => Ok(PurchaseOption::BuyItNow),
            other => Err(ParsePurchaseOptionError(other.to_string())),
        }
    }
}

/// The user's current filter intent. Empty sets and `None` bounds mean "no constraint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub makes: BTreeSet<String>,
    pub models: BTreeSet<String>,
    pub purchase_options: BTreeSet<PurchaseOption>,
    pub min_hours: Option<f64>,
    pub max_hours: Option<f64>,
}

fn member_or_unconstrained(selected: &BTreeSet<String>, value: Option<&String>) -> bool {
    if selected.is_empty() {
        return true;
    }
    value.is_some_and(|v| selected.contains(v))
}

impl FilterSelection {
    pub fn is_unconstrained(&self) -> bool {
        self.categories.is_empty()
            && self.makes.is_empty()
            && self.models.is_empty()
            && self.purchase_options.is_empty()
            && self.min_hours().is_none()
            && self.max_hours().is_none()
    }

    pub fn min_hours(&self) -> Option<f64> {
        self.min_hours.filter(|v| v.is_finite())
    }

    pub fn max_hours(&self) -> Option<f64> {
        self.max_hours.filter(|v| v.is_finite())
    }

    /// Inclusive hours range with defaults applied.
    pub fn hours_range(&self) -> (f64, f64) {
        (self.min_hours().unwrap_or(0.0), self.max_hours().unwrap_or(MAX_HOURS_UNBOUNDED))
    }

    pub fn matches(&self, record: &EquipmentRecord) -> bool {
        if !member_or_unconstrained(&self.categories, record.primary_type.as_ref()) {
            return false;
        }
        if !member_or_unconstrained(&self.makes, record.make.as_ref()) {
            return false;
        }
        if !member_or_unconstrained(&self.models, record.model.as_ref()) {
            return false;
        }

        let (min, max) = self.hours_range();
        let hours = record.hours_or_zero();
        if !(min <= hours && hours <= max) {
            return false;
        }

        self.purchase_options.is_empty()
            || self.purchase_options.iter().any(|option| record.has_purchase_option(*option))
    }
}

pub fn filter_records(records: &[EquipmentRecord], selection: &FilterSelection) -> Vec<EquipmentRecord> {
    records.iter().filter(|r| selection.matches(r)).cloned().collect()
}
