//! Stay ranges and cabin availability.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::backend::{BackendError, BookingBackend};
use crate::models::Booking;

/// A stay as the half-open range `[check_in, check_out)`.
///
/// Half-open means a guest may check in on the day the previous guest
/// checks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayRange {
    /// Returns `None` unless check-out is strictly after check-in.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Option<Self> {
        (check_out > check_in).then_some(Self {
            check_in,
            check_out,
        })
    }

    pub fn of(booking: &Booking) -> Self {
        Self {
            check_in: booking.check_in,
            check_out: booking.check_out,
        }
    }

    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// First active booking for `cabin_id` that collides with `stay`.
///
/// `skip_id` excludes the booking being rescheduled.
pub fn find_conflict<'a>(
    stay: &StayRange,
    cabin_id: &str,
    bookings: &'a [Booking],
    skip_id: Option<&str>,
) -> Option<&'a Booking> {
    bookings.iter().find(|b| {
        !b.is_cancelled()
            && b.cabin_id == cabin_id
            && skip_id != Some(b.id.as_str())
            && StayRange::of(b).overlaps(stay)
    })
}

/// How cabin availability is decided before a booking is submitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AvailabilityMode {
    /// Every cabin is reported available
    #[default]
    Stub,
    /// Ask the backend's availability endpoint
    Remote,
}

impl FromStr for AvailabilityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stub" => Ok(AvailabilityMode::Stub),
            "remote" => Ok(AvailabilityMode::Remote),
            other => Err(format!("unknown availability mode '{other}' (expected stub or remote)")),
        }
    }
}

impl fmt::Display for AvailabilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityMode::Stub => write!(f, "stub"),
            AvailabilityMode::Remote => write!(f, "remote"),
        }
    }
}

pub async fn check_availability<B: BookingBackend>(
    backend: &B,
    mode: AvailabilityMode,
    cabin_id: &str,
    stay: &StayRange,
) -> Result<bool, BackendError> {
    match mode {
        AvailabilityMode::Stub => {
            debug!(
                "Availability stub: cabin {} {}..{} reported available",
                cabin_id, stay.check_in, stay.check_out
            );
            Ok(true)
        }
        AvailabilityMode::Remote => backend.check_availability(cabin_id, stay).await,
    }
}
