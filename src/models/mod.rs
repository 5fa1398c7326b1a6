//! Domain records exchanged with the cabin rentals backend.

pub mod booking;
pub mod cabin;
pub mod money;
pub mod user;

pub use booking::{Booking, BookingStatus};
pub use cabin::{Cabin, CabinFilter, Review};
pub use user::{Preferences, User, UserProfile};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Parse a stay date from either a plain date or an ISO 8601 timestamp.
///
/// The backend stores check-in/out as full timestamps while forms send
/// `YYYY-MM-DD`; both collapse to the calendar date.
pub fn parse_stay_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

/// Serde helpers for loosely typed backend fields.
pub mod de {
    use super::*;

    /// Ids arrive as strings (document ids) or integers (seed data).
    pub fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Null => Ok(String::new()),
            other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
        }
    }

    pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = flexible_id(deserializer)?;
        Ok(if id.is_empty() { None } else { Some(id) })
    }

    pub fn stay_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_stay_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }
}
