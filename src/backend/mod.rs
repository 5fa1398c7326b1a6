//! The cabin rentals REST backend.
//!
//! The backend owns cabins, bookings, reviews and users. [`BookingBackend`]
//! describes the calls this service makes against it; [`ApiClient`] is the
//! HTTP implementation.

pub mod client;
pub mod payloads;

use std::future::Future;

pub use client::ApiClient;
pub use payloads::{BookingUpdate, NewBooking, NewReview};

use crate::booking::availability::StayRange;
use crate::models::user::ProfileUpdate;
use crate::models::{Booking, Cabin, Review, User, UserProfile};

/// Errors from talking to the backend
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// Connection refused, timeout, TLS failure...
    #[error("Backend unreachable: {0}")]
    Unavailable(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode backend response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Unavailable(_))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            BackendError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            BackendError::Unavailable(err.to_string())
        }
    }
}

/// Calls made against the cabin rentals backend.
///
/// All methods take `&self`; implementations are cheap to clone and share
/// their connection pool between clones.
pub trait BookingBackend: Clone + Send + Sync + 'static {
    fn list_cabins(&self) -> impl Future<Output = Result<Vec<Cabin>, BackendError>> + Send;

    fn get_cabin(&self, id: &str) -> impl Future<Output = Result<Cabin, BackendError>> + Send;

    fn cabin_reviews(
        &self,
        cabin_id: &str,
    ) -> impl Future<Output = Result<Vec<Review>, BackendError>> + Send;

    fn create_review(
        &self,
        review: &NewReview,
    ) -> impl Future<Output = Result<Review, BackendError>> + Send;

    /// `true` when the cabin is free for the whole stay
    fn check_availability(
        &self,
        cabin_id: &str,
        stay: &StayRange,
    ) -> impl Future<Output = Result<bool, BackendError>> + Send;

    fn create_booking(
        &self,
        booking: &NewBooking,
    ) -> impl Future<Output = Result<Booking, BackendError>> + Send;

    fn user_bookings(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Booking>, BackendError>> + Send;

    fn update_booking(
        &self,
        booking_id: &str,
        update: &BookingUpdate,
    ) -> impl Future<Output = Result<Booking, BackendError>> + Send;

    fn delete_booking(
        &self,
        booking_id: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, BackendError>> + Send;

    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, BackendError>> + Send;

    fn user_profile(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserProfile, BackendError>> + Send;

    fn update_user_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<UserProfile, BackendError>> + Send;

    fn request_password_code(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn verify_password_code(
        &self,
        email: &str,
        code: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn change_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}
