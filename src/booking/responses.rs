//! Response DTOs for booking API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{AddOn, BookingStats, PriceBreakdown, PriceLine, RefundQuote};
use crate::models::money::{format_money, CURRENCY};
use crate::models::{Booking, BookingStatus, Cabin};

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    /// Two-decimal display form, e.g. `"390.00"`
    pub formatted: String,
}

impl MoneyResponse {
    pub fn usd(amount: Decimal) -> Self {
        Self {
            amount,
            currency: CURRENCY.to_string(),
            formatted: format_money(amount),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLineResponse {
    pub label: String,
    pub amount: MoneyResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_on: Option<AddOn>,
}

impl From<&PriceLine> for PriceLineResponse {
    fn from(line: &PriceLine) -> Self {
        Self {
            label: line.label.clone(),
            amount: MoneyResponse::usd(line.amount),
            add_on: line.add_on,
        }
    }
}

/// Response for a stay quote
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub cabin_id: String,
    pub cabin_name: String,
    pub nights: u32,
    pub nightly_rate: MoneyResponse,
    pub base_price: MoneyResponse,
    pub add_ons_price: MoneyResponse,
    pub total: MoneyResponse,
    pub lines: Vec<PriceLineResponse>,
}

impl QuoteResponse {
    pub fn new(cabin: &Cabin, breakdown: &PriceBreakdown) -> Self {
        Self {
            cabin_id: cabin.id.clone(),
            cabin_name: cabin.name.clone(),
            nights: breakdown.nights,
            nightly_rate: MoneyResponse::usd(breakdown.nightly_rate),
            base_price: MoneyResponse::usd(breakdown.base_price),
            add_ons_price: MoneyResponse::usd(breakdown.add_ons_price),
            total: MoneyResponse::usd(breakdown.total),
            lines: breakdown.lines.iter().map(PriceLineResponse::from).collect(),
        }
    }
}

/// Response for a booking submission
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedResponse {
    pub booking: Booking,
    /// `true` when this repeated an earlier identical submission
    pub duplicate: bool,
    pub total: MoneyResponse,
    pub message: String,
}

/// Response for a refund preview
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundQuoteResponse {
    pub booking_id: String,
    pub days_until_check_in: i64,
    pub percentage: u32,
    pub refund: MoneyResponse,
    pub message: String,
}

impl RefundQuoteResponse {
    pub fn new(booking_id: &str, quote: &RefundQuote) -> Self {
        Self {
            booking_id: booking_id.to_string(),
            days_until_check_in: quote.days_until_check_in,
            percentage: quote.percentage,
            refund: MoneyResponse::usd(quote.amount),
            message: quote.message(),
        }
    }
}

/// Response for a cancellation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    pub booking_id: String,
    pub status: BookingStatus,
    pub percentage: u32,
    pub refund: MoneyResponse,
    pub message: String,
}

impl CancellationResponse {
    pub fn new(booking_id: &str, quote: &RefundQuote) -> Self {
        Self {
            booking_id: booking_id.to_string(),
            status: BookingStatus::Cancelled,
            percentage: quote.percentage,
            refund: MoneyResponse::usd(quote.amount),
            message: quote.message(),
        }
    }
}

/// A guest's bookings with summary figures
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
    pub stats: BookingStats,
}
