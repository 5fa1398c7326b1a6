//! HTTP client for the cabin rentals backend

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::payloads::{ChangePasswordPayload, LoginPayload, RegisterPayload, VerifyCodePayload};
use super::{BackendError, BookingBackend, BookingUpdate, NewBooking, NewReview};
use crate::booking::availability::StayRange;
use crate::models::user::ProfileUpdate;
use crate::models::{Booking, Cabin, Review, User, UserProfile};

/// `reqwest`-backed [`BookingBackend`]
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON body
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = Self::checked(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Send a request, ignoring any body
    async fn execute(&self, request: RequestBuilder) -> Result<(), BackendError> {
        Self::checked(request).await.map(|_| ())
    }

    async fn checked(request: RequestBuilder) -> Result<reqwest::Response, BackendError> {
        let response = request.send().await.map_err(|e| {
            warn!("Backend request failed: {}", e);
            BackendError::from(e)
        })?;

        let status = response.status();
        debug!("Backend {} {}", status.as_u16(), response.url().path());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl BookingBackend for ApiClient {
    async fn list_cabins(&self) -> Result<Vec<Cabin>, BackendError> {
        self.fetch(self.http.get(self.url("/cabins"))).await
    }

    async fn get_cabin(&self, id: &str) -> Result<Cabin, BackendError> {
        self.fetch(self.http.get(self.url(&format!("/cabins/{id}")))).await
    }

    async fn cabin_reviews(&self, cabin_id: &str) -> Result<Vec<Review>, BackendError> {
        self.fetch(self.http.get(self.url(&format!("/reviews/cabin/{cabin_id}"))))
            .await
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review, BackendError> {
        self.fetch(self.http.post(self.url("/reviews")).json(review))
            .await
    }

    async fn check_availability(
        &self,
        cabin_id: &str,
        stay: &StayRange,
    ) -> Result<bool, BackendError> {
        let request = self
            .http
            .get(self.url(&format!("/cabins/availability/{cabin_id}")))
            .query(&[
                ("checkIn", stay.check_in.to_string()),
                ("checkOut", stay.check_out.to_string()),
            ]);
        self.fetch(request).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, BackendError> {
        self.fetch(self.http.post(self.url("/bookings")).json(booking))
            .await
    }

    async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, BackendError> {
        let request = self
            .http
            .get(self.url("/bookings/user"))
            .query(&[("userId", user_id)]);
        self.fetch(request).await
    }

    async fn update_booking(
        &self,
        booking_id: &str,
        update: &BookingUpdate,
    ) -> Result<Booking, BackendError> {
        self.fetch(
            self.http
                .put(self.url(&format!("/bookings/{booking_id}")))
                .json(update),
        )
        .await
    }

    async fn delete_booking(&self, booking_id: &str) -> Result<(), BackendError> {
        self.execute(self.http.delete(self.url(&format!("/bookings/{booking_id}"))))
            .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, BackendError> {
        self.fetch(
            self.http
                .post(self.url("/auth/login"))
                .json(&LoginPayload { email, password }),
        )
        .await
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, BackendError> {
        self.fetch(
            self.http
                .post(self.url("/auth/register"))
                .json(&RegisterPayload {
                    name,
                    email,
                    password,
                }),
        )
        .await
    }

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, BackendError> {
        self.fetch(self.http.get(self.url(&format!("/users/{user_id}"))))
            .await
    }

    async fn update_user_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, BackendError> {
        self.fetch(
            self.http
                .put(self.url(&format!("/users/{user_id}")))
                .json(update),
        )
        .await
    }

    async fn request_password_code(&self, email: &str) -> Result<(), BackendError> {
        // The endpoint takes the bare email as a JSON string
        self.execute(
            self.http
                .post(self.url("/auth/request-password-code"))
                .json(&email),
        )
        .await
    }

    async fn verify_password_code(&self, email: &str, code: &str) -> Result<(), BackendError> {
        self.execute(
            self.http
                .post(self.url("/auth/verify-password-code"))
                .json(&VerifyCodePayload { email, code }),
        )
        .await
    }

    async fn change_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), BackendError> {
        self.execute(
            self.http
                .post(self.url("/auth/change-password"))
                .json(&ChangePasswordPayload {
                    email,
                    code,
                    new_password,
                }),
        )
        .await
    }
}
