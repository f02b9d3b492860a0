//! Sort orders for listing results.
//!
//! Every comparator is a total order and the sort is stable, so equal keys keep
//! their input order and sorting twice gives the same list. Records that lack
//! the sort field go last for the rate, buy-it-now, distance and recency keys.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::equipment::EquipmentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Closest,
    YearDesc,
    YearAsc,
    RecentlyAdded,
    RateAsc,
    RateDesc,
    BuyItNowAsc,
    BuyItNowDesc,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0:?}")]
pub struct ParseSortKeyError(pub String);

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Closest,
        SortKey::YearDesc,
        SortKey::YearAsc,
        SortKey::RecentlyAdded,
        SortKey::RateAsc,
        SortKey::RateDesc,
        SortKey::BuyItNowAsc,
        SortKey::BuyItNowDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Closest => "closest",
            SortKey::YearDesc => "year-desc",
            SortKey::YearAsc => "year-asc",
            SortKey::RecentlyAdded => "recently-added",
            SortKey::RateAsc => "rate-asc",
            SortKey::RateDesc => "rate-desc",
            SortKey::BuyItNowAsc => "buy-it-now-asc",
            SortKey::BuyItNowDesc => "buy-it-now-desc",
        }
    }

    /// Absent or unrecognized values fall back to [`SortKey::Closest`].
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ParseSortKeyError(s.to_string()))
    }
}

/// Present values first in the requested direction, missing values last.
fn missing_last<T: PartialOrd>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn distance(record: &EquipmentRecord) -> f64 {
    record.distance_meters.filter(|d| !d.is_nan()).unwrap_or(f64::INFINITY)
}

fn compare(a: &EquipmentRecord, b: &EquipmentRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Closest => distance(a).total_cmp(&distance(b)),
        SortKey::YearAsc => a.year.unwrap_or(0).cmp(&b.year.unwrap_or(0)),
        SortKey::YearDesc => b.year.unwrap_or(0).cmp(&a.year.unwrap_or(0)),
        SortKey::RecentlyAdded => missing_last(a.created_at, b.created_at, true),
        SortKey::RateAsc => missing_last(a.resolved_rental_rate(), b.resolved_rental_rate(), false),
        SortKey::RateDesc => missing_last(a.resolved_rental_rate(), b.resolved_rental_rate(), true),
        SortKey::BuyItNowAsc => missing_last(a.buy_it_now_offer(), b.buy_it_now_offer(), false),
        SortKey::BuyItNowDesc => missing_last(a.buy_it_now_offer(), b.buy_it_now_offer(), true),
    }
}

pub fn sort_records(records: &[EquipmentRecord], key: SortKey) -> Vec<EquipmentRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key));
    sorted
}
