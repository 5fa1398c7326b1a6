//! Request bodies sent to the backend.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::booking::calculators::AddOnSelection;
use crate::models::BookingStatus;

/// Body of `POST /bookings`. The backend expects PascalCase keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewBooking {
    pub user_id: String,
    pub cabin_id: String,
    pub cabin_name: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
    pub confirmation_code: String,
    pub number_of_guests: u32,
    pub early_check_in: bool,
    pub late_checkout: bool,
    pub firewood_package: bool,
    pub breakfast_package: bool,
    pub wine_package: bool,
    pub tour_guide: bool,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub special_requests: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl NewBooking {
    pub fn add_ons(&self) -> AddOnSelection {
        AddOnSelection {
            early_check_in: self.early_check_in,
            late_checkout: self.late_checkout,
            firewood_package: self.firewood_package,
            breakfast_package: self.breakfast_package,
            wine_package: self.wine_package,
            tour_guide: self.tour_guide,
        }
    }
}

/// Body of `PUT /bookings/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

/// Body of `POST /reviews`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub cabin_id: String,
    pub name: String,
    pub rating: f32,
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginPayload<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RegisterPayload<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyCodePayload<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordPayload<'a> {
    pub email: &'a str,
    pub code: &'a str,
    pub new_password: &'a str,
}
