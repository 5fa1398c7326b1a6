//! Booking route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use super::requests::{CreateBookingRequest, QuoteRequest, RescheduleRequest};
use super::responses::{
    BookingCreatedResponse, BookingListResponse, CancellationResponse, MoneyResponse,
    QuoteResponse, RefundQuoteResponse,
};
use super::services;
use crate::backend::BookingBackend;
use crate::error::Result;
use crate::models::Booking;
use crate::session::Session;
use crate::AppState;

pub fn router<B: BookingBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/cabins/:id/quote", post(quote::<B>))
        .route("/bookings", get(list::<B>).post(create::<B>))
        .route("/bookings/:id", put(reschedule::<B>).delete(cancel::<B>))
        .route("/bookings/:id/refund-quote", get(refund_quote::<B>))
}

/// POST /cabins/:id/quote
async fn quote<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Path(cabin_id): Path<String>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let (cabin, breakdown) = services::quote(&state, &cabin_id, &request).await?;
    Ok(Json(QuoteResponse::new(&cabin, &breakdown)))
}

/// GET /bookings
async fn list<B: BookingBackend>(
    State(state): State<AppState<B>>,
    session: Session,
) -> Result<Json<BookingListResponse>> {
    let (bookings, stats) = services::user_bookings(&state, &session, Utc::now()).await?;
    Ok(Json(BookingListResponse { bookings, stats }))
}

/// POST /bookings
///
/// 201 for a new booking, 200 when an identical submission was merged.
async fn create<B: BookingBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>)> {
    let (guarded, breakdown) =
        services::submit_booking(&state, &session, &request, Utc::now()).await?;

    let status = if guarded.duplicate {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let message = if guarded.duplicate {
        "This booking was already submitted".to_string()
    } else {
        "Booking confirmed".to_string()
    };

    Ok((
        status,
        Json(BookingCreatedResponse {
            booking: (*guarded.booking).clone(),
            duplicate: guarded.duplicate,
            total: MoneyResponse::usd(breakdown.total),
            message,
        }),
    ))
}

/// PUT /bookings/:id
async fn reschedule<B: BookingBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Path(booking_id): Path<String>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Booking>> {
    let booking =
        services::reschedule_booking(&state, &session, &booking_id, &request, Utc::now()).await?;
    Ok(Json(booking))
}

/// GET /bookings/:id/refund-quote
async fn refund_quote<B: BookingBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Path(booking_id): Path<String>,
) -> Result<Json<RefundQuoteResponse>> {
    let (booking, quote) =
        services::refund_quote_for(&state, &session, &booking_id, Utc::now()).await?;
    Ok(Json(RefundQuoteResponse::new(&booking.id, &quote)))
}

/// DELETE /bookings/:id
async fn cancel<B: BookingBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Path(booking_id): Path<String>,
) -> Result<Json<CancellationResponse>> {
    let (booking, quote) =
        services::cancel_booking(&state, &session, &booking_id, Utc::now()).await?;
    Ok(Json(CancellationResponse::new(&booking.id, &quote)))
}
