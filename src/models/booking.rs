//! Persisted bookings

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;
use super::money::lenient;

/// Booking lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[default]
    #[serde(alias = "confirmed", alias = "CONFIRMED")]
    Confirmed,
    #[serde(
        alias = "cancelled",
        alias = "CANCELLED",
        alias = "Canceled",
        alias = "canceled"
    )]
    Cancelled,
}

/// Booking as returned by the backend.
///
/// The backend has used several spellings over time (`checkInDate`,
/// `CheckIn`, `totalPrice`, ...); the aliases accept all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "Id", alias = "_id", deserialize_with = "de::flexible_id")]
    pub id: String,
    #[serde(alias = "CabinId", deserialize_with = "de::flexible_id")]
    pub cabin_id: String,
    #[serde(default, alias = "CabinName")]
    pub cabin_name: Option<String>,
    #[serde(default, alias = "UserId", deserialize_with = "de::optional_id")]
    pub user_id: Option<String>,
    #[serde(
        alias = "checkInDate",
        alias = "CheckIn",
        deserialize_with = "de::stay_date"
    )]
    pub check_in: NaiveDate,
    #[serde(
        alias = "checkOutDate",
        alias = "CheckOut",
        deserialize_with = "de::stay_date"
    )]
    pub check_out: NaiveDate,
    #[serde(default, alias = "NumberOfGuests")]
    pub number_of_guests: u32,
    #[serde(default, alias = "totalPrice", alias = "TotalAmount", with = "lenient")]
    pub total_amount: Decimal,
    #[serde(default, alias = "Status")]
    pub status: BookingStatus,
    #[serde(default, alias = "BookingDate")]
    pub booking_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "ConfirmationCode")]
    pub confirmation_code: Option<String>,
}

impl Booking {
    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    /// Whole nights between check-in and check-out, never negative
    pub fn nights(&self) -> u32 {
        (self.check_out - self.check_in).num_days().max(0) as u32
    }

    pub fn belongs_to(&self, user_id: &str) -> bool {
        self.user_id.as_deref().map_or(true, |owner| owner == user_id)
    }
}
