//! Cabin listings and reviews

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;
use super::money::{self, lenient};

/// Cabin record as served by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cabin {
    #[serde(alias = "Id", alias = "_id", deserialize_with = "de::flexible_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// Nightly rate
    #[serde(with = "lenient", default)]
    pub price: Decimal,
    #[serde(default)]
    pub sleeps: u32,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default, rename = "reviews")]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Cabin {
    /// Location up to the first comma ("Aspen, Colorado" -> "Aspen")
    pub fn primary_location(&self) -> &str {
        self.location.split(',').next().unwrap_or_default().trim()
    }

    /// Nightly rate, never negative
    pub fn nightly_rate(&self) -> Decimal {
        self.price.max(Decimal::ZERO)
    }
}

/// Listing filters, taken from the query string.
///
/// Empty values mean "no filter", matching what the search form submits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinFilter {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub guests: Option<String>,
}

impl CabinFilter {
    pub fn matches(&self, cabin: &Cabin) -> bool {
        if let Some(location) = non_empty(&self.location) {
            if !cabin.primary_location().eq_ignore_ascii_case(location.trim()) {
                return false;
            }
        }
        if let Some(min) = non_empty(&self.min_price).and_then(money::parse_money) {
            if cabin.price < min {
                return false;
            }
        }
        if let Some(max) = non_empty(&self.max_price).and_then(money::parse_money) {
            if cabin.price > max {
                return false;
            }
        }
        if let Some(guests) = non_empty(&self.guests).and_then(|g| g.trim().parse::<u32>().ok()) {
            if cabin.sleeps < guests {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, cabins: &[Cabin]) -> Vec<Cabin> {
        cabins.iter().filter(|c| self.matches(c)).cloned().collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Distinct primary locations, in first-seen order
pub fn distinct_locations(cabins: &[Cabin]) -> Vec<String> {
    let mut locations: Vec<String> = Vec::new();
    for cabin in cabins {
        let location = cabin.primary_location();
        if !location.is_empty() && !locations.iter().any(|l| l == location) {
            locations.push(location.to_string());
        }
    }
    locations
}

/// Guest review of a cabin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, alias = "Id", alias = "_id", deserialize_with = "de::flexible_id")]
    pub id: String,
    #[serde(alias = "CabinId", deserialize_with = "de::flexible_id")]
    pub cabin_id: String,
    pub name: String,
    pub rating: f32,
    #[serde(default)]
    pub comment: String,
    #[serde(default, alias = "date")]
    pub created_at: Option<DateTime<Utc>>,
}
