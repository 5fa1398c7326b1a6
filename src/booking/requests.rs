//! Request DTOs for booking API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use super::calculators::AddOnSelection;
use crate::models::{de, parse_stay_date};

/// Request to price a prospective stay.
///
/// Dates are optional so the form can show a running total while the guest
/// is still choosing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default, alias = "checkInDate")]
    pub check_in: Option<String>,
    #[serde(default, alias = "checkOutDate")]
    pub check_out: Option<String>,
    #[serde(flatten)]
    pub add_ons: AddOnSelection,
}

impl QuoteRequest {
    pub fn check_in_date(&self) -> Option<NaiveDate> {
        self.check_in.as_deref().and_then(parse_stay_date)
    }

    pub fn check_out_date(&self) -> Option<NaiveDate> {
        self.check_out.as_deref().and_then(parse_stay_date)
    }
}

/// Request to book a cabin
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(deserialize_with = "de::flexible_id")]
    #[validate(length(min = 1, message = "Please choose a cabin"))]
    pub cabin_id: String,
    #[serde(default, alias = "checkInDate")]
    pub check_in: Option<String>,
    #[serde(default, alias = "checkOutDate")]
    pub check_out: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "At least one guest is required"))]
    pub number_of_guests: u32,
    #[serde(flatten)]
    pub add_ons: AddOnSelection,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please enter your name"))]
    pub contact_name: String,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub contact_email: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "Please enter a phone number"))]
    pub contact_phone: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Special requests are limited to 1000 characters"))]
    pub special_requests: String,
}

/// Request to move an existing booking to new dates
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    #[serde(default, alias = "checkInDate")]
    pub check_in: Option<String>,
    #[serde(default, alias = "checkOutDate")]
    pub check_out: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "At least one guest is required"))]
    pub number_of_guests: Option<u32>,
}

/// Review left on a cabin page
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please enter your name"))]
    pub name: String,
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub rating: f32,
    #[serde(default)]
    #[validate(length(min = 1, max = 2000, message = "Please write a short comment"))]
    pub comment: String,
}
