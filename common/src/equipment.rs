//! Equipment records as returned by the search index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::PurchaseOption;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRecord {
    #[serde(rename = "objectID")]
    pub id: String,
    #[serde(default)]
    pub primary_type: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub rental_rate: Option<RentalRate>,
    #[serde(default)]
    pub rates: Vec<RateSchedule>,
    #[serde(default)]
    pub buy_it_now_price: Option<f64>,
    #[serde(default)]
    pub rent_to_purchase: Option<bool>,
    #[serde(default)]
    pub buy_it_now: Option<bool>,

    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default, rename = "_geoloc")]
    pub geoloc: Option<GeoPoint>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub images: Vec<ImageRef>,

    /// Distance from the search origin, filled in from the index's ranking info.
    #[serde(default)]
    pub distance_meters: Option<f64>,
    /// Arrival time in the index, backing the recently-added sort.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Rental price: either one monthly number or a per-period breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RentalRate {
    Flat(f64),
    Tiered {
        #[serde(default)]
        daily: Option<f64>,
        #[serde(default)]
        weekly: Option<f64>,
        #[serde(default)]
        monthly: Option<f64>,
    },
}

impl RentalRate {
    /// The monthly figure, or the flat value. Non-finite numbers resolve to nothing.
    pub fn monthly(&self) -> Option<f64> {
        let value = match self {
            RentalRate::Flat(value) => Some(*value),
            RentalRate::Tiered { monthly, .. } => *monthly,
        };
        value.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSchedule {
    pub label: String,
    pub days: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ImageRef {
    pub fn display_url(&self) -> &str {
        self.thumbnail.as_deref().filter(|t| !t.is_empty()).unwrap_or(&self.url)
    }
}

impl EquipmentRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    pub fn hours_or_zero(&self) -> f64 {
        self.hours.unwrap_or(0.0)
    }

    pub fn resolved_rental_rate(&self) -> Option<f64> {
        self.rental_rate.as_ref().and_then(RentalRate::monthly)
    }

    pub fn is_rent_to_purchase(&self) -> bool {
        self.rent_to_purchase.unwrap_or(false)
    }

    pub fn is_buy_it_now(&self) -> bool {
        self.buy_it_now.unwrap_or(false)
    }

    /// Buy-it-now price, only when the record is actually offered for purchase.
    pub fn buy_it_now_offer(&self) -> Option<f64> {
        if !self.is_buy_it_now() {
            return None;
        }
        self.buy_it_now_price.filter(|p| p.is_finite())
    }

    pub fn has_purchase_option(&self, option: PurchaseOption) -> bool {
        match option {
            PurchaseOption::RentToPurchase => self.is_rent_to_purchase(),
            PurchaseOption::BuyItNow => self.is_buy_it_now(),
        }
    }

    pub fn primary_image_url(&self) -> Option<&str> {
        self.images.first().map(ImageRef::display_url)
    }

    pub fn image_urls(&self) -> Vec<&str> {
        self.images.iter().map(ImageRef::display_url).collect()
    }
}
