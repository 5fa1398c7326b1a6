//! Booking service functions with backend access.
//!
//! These functions combine the catalog, the guest's existing bookings and
//! the pure calculators to carry out each booking flow. "Now" is passed in
//! by the caller so the date rules are testable.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rand::{distr::Alphanumeric, Rng};
use tracing::{info, warn};
use validator::Validate;

use super::availability::{check_availability, find_conflict, StayRange};
use super::calculators::{
    booking_stats, price_breakdown, refund_quote, rescheduled_total, stay_nights, BookingStats,
    PriceBreakdown, RefundQuote,
};
use super::guard::{Guarded, SubmissionGuard};
use super::requests::{CreateBookingRequest, QuoteRequest, RescheduleRequest};
use crate::backend::{BookingBackend, BookingUpdate, NewBooking};
use crate::catalog;
use crate::error::{AppError, Result};
use crate::models::{parse_stay_date, Booking, BookingStatus, Cabin};
use crate::session::Session;
use crate::AppState;

const CONFIRMATION_CODE_LEN: usize = 8;

/// Price a prospective stay at a cabin's current nightly rate.
pub async fn quote<B: BookingBackend>(
    state: &AppState<B>,
    cabin_id: &str,
    request: &QuoteRequest,
) -> Result<(Arc<Cabin>, PriceBreakdown)> {
    let cabin = catalog::cabin(&state.cache, &state.backend, cabin_id).await?;
    let breakdown = price_breakdown(
        cabin.nightly_rate(),
        request.check_in_date(),
        request.check_out_date(),
        &request.add_ons,
    )
    .ok_or_else(unpriceable)?;
    Ok((cabin, breakdown))
}

fn unpriceable() -> AppError {
    AppError::validation("This stay cannot be priced")
}

/// Random 8 character uppercase alphanumeric code
pub fn confirmation_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CONFIRMATION_CODE_LEN)
        .map(char::from)
        .collect::<String>()
        .to_ascii_uppercase()
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Parse and check a pair of form dates for a new or moved stay.
fn requested_stay(
    check_in: Option<&str>,
    check_out: Option<&str>,
    now: DateTime<Utc>,
) -> Result<StayRange> {
    let (Some(check_in), Some(check_out)) = (
        check_in.and_then(parse_stay_date),
        check_out.and_then(parse_stay_date),
    ) else {
        return Err(AppError::validation(
            "Please select valid check-in and check-out dates",
        ));
    };

    if check_in < now.date_naive() {
        return Err(AppError::validation("Check-in date cannot be in the past"));
    }

    StayRange::new(check_in, check_out)
        .ok_or_else(|| AppError::validation("Check-out date must be after check-in date"))
}

fn check_capacity(cabin: &Cabin, guests: u32) -> Result<()> {
    if cabin.sleeps > 0 && guests > cabin.sleeps {
        return Err(AppError::validation(format!(
            "{} sleeps at most {} guests",
            cabin.name, cabin.sleeps
        )));
    }
    Ok(())
}

/// The guest's booking with `booking_id`.
async fn find_user_booking<B: BookingBackend>(
    state: &AppState<B>,
    session: &Session,
    booking_id: &str,
) -> Result<(Booking, Vec<Booking>)> {
    let bookings = state.backend.user_bookings(&session.user_id).await?;
    let booking = bookings
        .iter()
        .find(|b| b.id == booking_id && b.belongs_to(&session.user_id))
        .cloned()
        .ok_or_else(|| AppError::NotFound("Booking".to_string()))?;
    Ok((booking, bookings))
}

/// Book a cabin for the session's user.
///
/// The total is always recomputed here from the cabin's rate; anything the
/// client claims the total to be is ignored.
pub async fn submit_booking<B: BookingBackend>(
    state: &AppState<B>,
    session: &Session,
    request: &CreateBookingRequest,
    now: DateTime<Utc>,
) -> Result<(Guarded, PriceBreakdown)> {
    request.validate()?;
    let stay = requested_stay(request.check_in.as_deref(), request.check_out.as_deref(), now)?;

    let cabin = catalog::cabin(&state.cache, &state.backend, &request.cabin_id).await?;
    check_capacity(&cabin, request.number_of_guests)?;

    let breakdown = price_breakdown(
        cabin.nightly_rate(),
        Some(stay.check_in),
        Some(stay.check_out),
        &request.add_ons,
    )
    .ok_or_else(unpriceable)?;

    let add_ons = request.add_ons;
    let new_booking = NewBooking {
        user_id: session.user_id.clone(),
        cabin_id: cabin.id.clone(),
        cabin_name: cabin.name.clone(),
        check_in: midnight_utc(stay.check_in),
        check_out: midnight_utc(stay.check_out),
        status: BookingStatus::Confirmed,
        booking_date: now,
        confirmation_code: confirmation_code(),
        number_of_guests: request.number_of_guests,
        early_check_in: add_ons.early_check_in,
        late_checkout: add_ons.late_checkout,
        firewood_package: add_ons.firewood_package,
        breakfast_package: add_ons.breakfast_package,
        wine_package: add_ons.wine_package,
        tour_guide: add_ons.tour_guide,
        contact_name: request.contact_name.trim().to_string(),
        contact_email: request.contact_email.trim().to_string(),
        contact_phone: request.contact_phone.trim().to_string(),
        special_requests: request.special_requests.trim().to_string(),
        total_amount: breakdown.total,
    };

    let fingerprint = SubmissionGuard::fingerprint(&new_booking);
    let guarded = state
        .guard
        .submit(fingerprint, create_booking(state, session, stay, new_booking))
        .await?;

    Ok((guarded, breakdown))
}

async fn create_booking<B: BookingBackend>(
    state: &AppState<B>,
    session: &Session,
    stay: StayRange,
    new_booking: NewBooking,
) -> Result<Booking> {
    let existing = state.backend.user_bookings(&session.user_id).await?;
    if let Some(clash) = find_conflict(&stay, &new_booking.cabin_id, &existing, None) {
        warn!(
            "Booking for cabin {} overlaps user {}'s booking {}",
            new_booking.cabin_id, session.user_id, clash.id
        );
        return Err(AppError::Conflict(
            "You already have a booking for this cabin on overlapping dates".to_string(),
        ));
    }

    let available = check_availability(
        &state.backend,
        state.config.availability_mode,
        &new_booking.cabin_id,
        &stay,
    )
    .await?;
    if !available {
        return Err(AppError::Conflict(
            "This cabin is not available for the selected dates".to_string(),
        ));
    }

    let booking = state.backend.create_booking(&new_booking).await?;
    info!(
        "Booking {} created: cabin {} for user {} ({} .. {}), total {}",
        booking.id,
        new_booking.cabin_id,
        session.user_id,
        stay.check_in,
        stay.check_out,
        new_booking.total_amount
    );
    Ok(booking)
}

/// Move a booking to new dates, repricing at the rate it was booked at.
pub async fn reschedule_booking<B: BookingBackend>(
    state: &AppState<B>,
    session: &Session,
    booking_id: &str,
    request: &RescheduleRequest,
    now: DateTime<Utc>,
) -> Result<Booking> {
    request.validate()?;
    let stay = requested_stay(request.check_in.as_deref(), request.check_out.as_deref(), now)?;

    let (booking, bookings) = find_user_booking(state, session, booking_id).await?;
    if booking.is_cancelled() {
        return Err(AppError::Conflict(
            "Cancelled bookings cannot be changed".to_string(),
        ));
    }

    if find_conflict(&stay, &booking.cabin_id, &bookings, Some(&booking.id)).is_some() {
        return Err(AppError::Conflict(
            "You already have a booking for this cabin on overlapping dates".to_string(),
        ));
    }

    let number_of_guests = request.number_of_guests.unwrap_or(booking.number_of_guests);
    let cabin = catalog::cabin(&state.cache, &state.backend, &booking.cabin_id).await?;
    check_capacity(&cabin, number_of_guests)?;

    let new_nights = stay_nights(stay.check_in, stay.check_out);
    let update = BookingUpdate {
        check_in: stay.check_in,
        check_out: stay.check_out,
        number_of_guests,
        total_amount: rescheduled_total(booking.total_amount, booking.nights(), new_nights)
            .ok_or_else(unpriceable)?,
    };

    let updated = state.backend.update_booking(&booking.id, &update).await?;
    state.guard.forget(&booking.id).await;
    info!(
        "Booking {} rescheduled to {} .. {}, total {}",
        booking.id, update.check_in, update.check_out, update.total_amount
    );
    Ok(updated)
}

/// What cancelling a booking right now would refund.
pub async fn refund_quote_for<B: BookingBackend>(
    state: &AppState<B>,
    session: &Session,
    booking_id: &str,
    now: DateTime<Utc>,
) -> Result<(Booking, RefundQuote)> {
    let (booking, _) = find_user_booking(state, session, booking_id).await?;
    if booking.is_cancelled() {
        return Err(AppError::Conflict("Booking is already cancelled".to_string()));
    }
    let quote = refund_quote(booking.check_in, booking.total_amount, now);
    Ok((booking, quote))
}

/// Cancel a booking and report the refund it earned.
pub async fn cancel_booking<B: BookingBackend>(
    state: &AppState<B>,
    session: &Session,
    booking_id: &str,
    now: DateTime<Utc>,
) -> Result<(Booking, RefundQuote)> {
    let (booking, quote) = refund_quote_for(state, session, booking_id, now).await?;
    state.backend.delete_booking(&booking.id).await?;
    state.guard.forget(&booking.id).await;
    info!(
        "Booking {} cancelled by user {}: {}% refund of {}",
        booking.id, session.user_id, quote.percentage, quote.amount
    );
    Ok((booking, quote))
}

/// The session user's bookings and summary figures.
pub async fn user_bookings<B: BookingBackend>(
    state: &AppState<B>,
    session: &Session,
    now: DateTime<Utc>,
) -> Result<(Vec<Booking>, BookingStats)> {
    let mut bookings: Vec<Booking> = state
        .backend
        .user_bookings(&session.user_id)
        .await?
        .into_iter()
        .filter(|b| b.belongs_to(&session.user_id))
        .collect();
    bookings.sort_by(|a, b| b.check_in.cmp(&a.check_in));

    let stats = booking_stats(&bookings, now);
    Ok((bookings, stats))
}
