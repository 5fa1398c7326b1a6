//! Duplicate submission guard.
//!
//! Remembers recent booking submissions by fingerprint for a short window.
//! A repeat of the same submission (double click, client retry) gets the
//! booking created the first time instead of a second booking. Concurrent
//! repeats wait on the first one rather than racing it. Once a booking is
//! cancelled or moved, its submission is forgotten so the same stay can be
//! booked again.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, info};

use crate::backend::NewBooking;
use crate::error::AppError;
use crate::models::Booking;

#[derive(Clone)]
pub struct SubmissionGuard {
    recent: Option<Recent>,
}

#[derive(Clone)]
struct Recent {
    /// fingerprint -> booking created for it
    bookings: Cache<String, Arc<Booking>>,
    /// booking id -> fingerprint, for [`SubmissionGuard::forget`]
    fingerprints: Cache<String, String>,
}

/// Result of a guarded submission
#[derive(Debug, Clone)]
pub struct Guarded {
    pub booking: Arc<Booking>,
    /// `true` when an earlier identical submission produced `booking`
    pub duplicate: bool,
}

impl SubmissionGuard {
    /// A zero window disables the guard.
    pub fn new(window: Duration) -> Self {
        let recent = (!window.is_zero()).then(|| Recent {
            bookings: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(window)
                .build(),
            fingerprints: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(window)
                .build(),
        });
        Self { recent }
    }

    pub fn is_enabled(&self) -> bool {
        self.recent.is_some()
    }

    /// Identity of a submission: who, where, when and what was chosen.
    ///
    /// Generated fields (confirmation code, booking timestamp) are left out.
    pub fn fingerprint(booking: &NewBooking) -> String {
        let add_ons = booking.add_ons();
        let flags: String = crate::booking::calculators::AddOn::ALL
            .iter()
            .map(|a| if add_ons.contains(*a) { '1' } else { '0' })
            .collect();

        format!(
            "{}|{}|{}|{}|{}|{}",
            booking.user_id,
            booking.cabin_id,
            booking.check_in.date_naive(),
            booking.check_out.date_naive(),
            booking.number_of_guests,
            flags
        )
    }

    /// Run `create` unless a submission with the same fingerprint already
    /// succeeded inside the window. Failed attempts are not remembered.
    pub async fn submit<Fut>(&self, fingerprint: String, create: Fut) -> Result<Guarded, AppError>
    where
        Fut: Future<Output = Result<Booking, AppError>> + Send,
    {
        let Some(recent) = &self.recent else {
            return Ok(Guarded {
                booking: Arc::new(create.await?),
                duplicate: false,
            });
        };

        let entry = recent
            .bookings
            .entry(fingerprint.clone())
            .or_try_insert_with(async { create.await.map(Arc::new) })
            .await
            .map_err(unshare)?;

        let duplicate = !entry.is_fresh();
        if duplicate {
            info!("Duplicate booking submission merged: {}", fingerprint);
        } else {
            recent
                .fingerprints
                .insert(entry.value().id.clone(), fingerprint)
                .await;
        }

        Ok(Guarded {
            booking: entry.into_value(),
            duplicate,
        })
    }

    /// Drop the remembered submission that created `booking_id`, if any.
    ///
    /// Called after the booking is cancelled or rescheduled; a later
    /// identical submission then creates a new booking.
    pub async fn forget(&self, booking_id: &str) {
        let Some(recent) = &self.recent else {
            return;
        };
        if let Some(fingerprint) = recent.fingerprints.remove(booking_id).await {
            recent.bookings.invalidate(&fingerprint).await;
            debug!("Submission for booking {} forgotten", booking_id);
        }
    }
}

/// Errors from a coalesced insert are shared between all waiters.
fn unshare(err: Arc<AppError>) -> AppError {
    Arc::try_unwrap(err).unwrap_or_else(|shared| (*shared).clone())
}
