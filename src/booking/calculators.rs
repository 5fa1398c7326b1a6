//! Core booking calculation functions.
//!
//! Pure functions for stay pricing and cancellation refunds - no network
//! access. Everything here is deterministic given its inputs, including
//! "now", which callers pass in explicitly.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::money::format_money;
use crate::models::Booking;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Used for internal splits (e.g. deriving a nightly rate from a total) so
/// repeated divisions do not drift in one direction.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use cabin_booking::booking::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Round a customer-facing amount to cents, half away from zero.
pub fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Optional fixed-fee extras offered with a stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOn {
    EarlyCheckIn,
    LateCheckout,
    Firewood,
    Breakfast,
    Wine,
    TourGuide,
}

impl AddOn {
    /// Every add-on, in the order they appear on a price breakdown
    pub const ALL: [AddOn; 6] = [
        AddOn::EarlyCheckIn,
        AddOn::LateCheckout,
        AddOn::Firewood,
        AddOn::Breakfast,
        AddOn::Wine,
        AddOn::TourGuide,
    ];

    pub fn fee(self) -> Decimal {
        match self {
            AddOn::EarlyCheckIn => dec!(50),
            AddOn::LateCheckout => dec!(50),
            AddOn::Firewood => dec!(40),
            AddOn::Breakfast => dec!(120),
            AddOn::Wine => dec!(95),
            AddOn::TourGuide => dec!(200),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AddOn::EarlyCheckIn => "Early check-in (11am)",
            AddOn::LateCheckout => "Late checkout (3pm)",
            AddOn::Firewood => "Firewood package",
            AddOn::Breakfast => "Breakfast package",
            AddOn::Wine => "Wine package",
            AddOn::TourGuide => "Local tour guide (4 hours)",
        }
    }
}

/// Add-on checkboxes as submitted by the booking form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddOnSelection {
    pub early_check_in: bool,
    pub late_checkout: bool,
    pub firewood_package: bool,
    pub breakfast_package: bool,
    pub wine_package: bool,
    pub tour_guide: bool,
}

impl AddOnSelection {
    pub fn contains(&self, add_on: AddOn) -> bool {
        match add_on {
            AddOn::EarlyCheckIn => self.early_check_in,
            AddOn::LateCheckout => self.late_checkout,
            AddOn::Firewood => self.firewood_package,
            AddOn::Breakfast => self.breakfast_package,
            AddOn::Wine => self.wine_package,
            AddOn::TourGuide => self.tour_guide,
        }
    }

    /// Selected add-ons in breakdown order
    pub fn selected(&self) -> impl Iterator<Item = AddOn> + '_ {
        AddOn::ALL.into_iter().filter(|a| self.contains(*a))
    }

    pub fn fees(&self) -> Decimal {
        self.selected().map(AddOn::fee).sum()
    }
}

/// One labelled line of a price breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLine {
    pub label: String,
    pub amount: Decimal,
    /// `None` for the nights line
    pub add_on: Option<AddOn>,
}

/// Priced summary of a prospective stay
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub nights: u32,
    pub nightly_rate: Decimal,
    pub base_price: Decimal,
    pub add_ons_price: Decimal,
    pub total: Decimal,
    pub lines: Vec<PriceLine>,
}

/// Whole nights between two stay dates; zero if check-out is not after check-in.
pub fn stay_nights(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    (check_out - check_in).num_days().max(0) as u32
}

/// Nights for possibly-missing dates; zero unless both are present.
pub fn nights_between(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> u32 {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => stay_nights(check_in, check_out),
        _ => 0,
    }
}

/// Build the line-item breakdown and total for a stay.
///
/// The nights line appears only when there is at least one night; add-on
/// lines follow in [`AddOn::ALL`] order. A negative rate is treated as zero.
/// Returns `None` if the amounts overflow.
pub fn price_breakdown(
    nightly_rate: Decimal,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    add_ons: &AddOnSelection,
) -> Option<PriceBreakdown> {
    let nightly_rate = nightly_rate.max(Decimal::ZERO);
    let nights = nights_between(check_in, check_out);
    let base_price = nightly_rate.checked_mul(Decimal::from(nights))?;

    let mut lines = Vec::with_capacity(1 + AddOn::ALL.len());
    if nights > 0 {
        lines.push(PriceLine {
            label: format!(
                "{} night{} at ${}/night",
                nights,
                if nights == 1 { "" } else { "s" },
                nightly_rate.normalize()
            ),
            amount: base_price,
            add_on: None,
        });
    }

    for add_on in add_ons.selected() {
        lines.push(PriceLine {
            label: add_on.label().to_string(),
            amount: add_on.fee(),
            add_on: Some(add_on),
        });
    }

    let add_ons_price = add_ons.fees();

    Some(PriceBreakdown {
        nights,
        nightly_rate,
        base_price,
        add_ons_price,
        total: base_price.checked_add(add_ons_price)?,
        lines,
    })
}

impl PriceBreakdown {
    pub fn formatted_total(&self) -> String {
        format_money(self.total)
    }
}

/// Days from `now` until check-in (midnight UTC), rounded up.
///
/// Negative once check-in has passed.
pub fn days_until(check_in: NaiveDate, now: DateTime<Utc>) -> i64 {
    let check_in_at = check_in.and_time(chrono::NaiveTime::MIN).and_utc();
    let seconds = (check_in_at - now).num_seconds();
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    if seconds.rem_euclid(SECONDS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

/// Refund percentage for a cancellation made `days_until_check_in` days ahead.
///
/// More than a week out is a full refund, two to seven days is half,
/// anything later gets nothing.
pub fn refund_percentage(days_until_check_in: i64) -> u32 {
    match days_until_check_in {
        d if d > 7 => 100,
        2..=7 => 50,
        _ => 0,
    }
}

/// Cancellation refund for a booking at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct RefundQuote {
    pub percentage: u32,
    pub amount: Decimal,
    pub days_until_check_in: i64,
}

impl RefundQuote {
    /// Message shown to the guest once the cancellation goes through
    pub fn message(&self) -> String {
        if self.percentage > 0 {
            format!(
                "Booking cancelled successfully. You will receive a refund of ${} ({}%).",
                format_money(self.amount),
                self.percentage
            )
        } else {
            "Booking cancelled successfully. No refund is applicable as per our cancellation policy."
                .to_string()
        }
    }
}

pub fn refund_quote(check_in: NaiveDate, total: Decimal, now: DateTime<Utc>) -> RefundQuote {
    let days_until_check_in = days_until(check_in, now);
    let percentage = refund_percentage(days_until_check_in);
    let amount = round_display(total.max(Decimal::ZERO) * (Decimal::from(percentage) / dec!(100)));

    RefundQuote {
        percentage,
        amount,
        days_until_check_in,
    }
}

/// Total for a rescheduled stay, keeping the nightly rate implied by the
/// original booking (`old_total / old_nights`).
///
/// A zero-night original is priced as one night. Returns `None` if the
/// amount overflows.
pub fn rescheduled_total(old_total: Decimal, old_nights: u32, new_nights: u32) -> Option<Decimal> {
    let per_night = round_money(old_total / Decimal::from(old_nights.max(1)), 2);
    per_night.checked_mul(Decimal::from(new_nights)).map(round_display)
}

/// Aggregate figures for a guest's bookings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total_bookings: usize,
    pub upcoming_stays: usize,
    pub total_nights: u32,
}

pub fn booking_stats(bookings: &[Booking], now: DateTime<Utc>) -> BookingStats {
    let active = || bookings.iter().filter(|b| !b.is_cancelled());

    BookingStats {
        total_bookings: bookings.len(),
        upcoming_stays: active()
            .filter(|b| b.check_in.and_time(chrono::NaiveTime::MIN).and_utc() > now)
            .count(),
        total_nights: active().map(Booking::nights).sum(),
    }
}
