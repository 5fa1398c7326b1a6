//! Shared fixtures for the HTTP tests: an in-memory backend and helpers
//! for driving the router.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{request::Builder, Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

use cabin_booking::backend::{
    BackendError, BookingBackend, BookingUpdate, NewBooking, NewReview,
};
use cabin_booking::booking::availability::StayRange;
use cabin_booking::config::Config;
use cabin_booking::models::user::ProfileUpdate;
use cabin_booking::models::{Booking, BookingStatus, Cabin, Review, User, UserProfile};
use cabin_booking::{app, AppState};

pub const USER: &str = "u-1";
pub const PASSWORD: &str = "secret123";

#[derive(Default)]
struct Store {
    cabins: Vec<Cabin>,
    bookings: Vec<Booking>,
    reviews: Vec<Review>,
    /// (cabin id, stay) pairs the availability endpoint reports as taken
    blocked: Vec<(String, StayRange)>,
}

/// Backend double holding everything in memory
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    store: Arc<Mutex<Store>>,
    down: Arc<AtomicBool>,
    next_id: Arc<AtomicUsize>,
    pub created: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    pub fn with_cabins(cabins: Vec<Cabin>) -> Self {
        let backend = Self::default();
        backend.store.lock().unwrap().cabins = cabins;
        backend
    }

    /// Every call fails as if the backend were unreachable
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn add_booking(&self, booking: Booking) {
        self.store.lock().unwrap().bookings.push(booking);
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.store.lock().unwrap().bookings.clone()
    }

    pub fn block(&self, cabin_id: &str, stay: StayRange) {
        self.store
            .lock()
            .unwrap()
            .blocked
            .push((cabin_id.to_string(), stay));
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.down.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn not_found() -> BackendError {
    BackendError::Status {
        status: 404,
        body: String::new(),
    }
}

impl BookingBackend for InMemoryBackend {
    async fn list_cabins(&self) -> Result<Vec<Cabin>, BackendError> {
        self.check()?;
        Ok(self.store.lock().unwrap().cabins.clone())
    }

    async fn get_cabin(&self, id: &str) -> Result<Cabin, BackendError> {
        self.check()?;
        let store = self.store.lock().unwrap();
        store.cabins.iter().find(|c| c.id == id).cloned().ok_or_else(not_found)
    }

    async fn cabin_reviews(&self, cabin_id: &str) -> Result<Vec<Review>, BackendError> {
        self.check()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .reviews
            .iter()
            .filter(|r| r.cabin_id == cabin_id)
            .cloned()
            .collect())
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review, BackendError> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = Review {
            id: format!("r-{id}"),
            cabin_id: review.cabin_id.clone(),
            name: review.name.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: Some(Utc::now()),
        };
        self.store.lock().unwrap().reviews.push(created.clone());
        Ok(created)
    }

    async fn check_availability(
        &self,
        cabin_id: &str,
        stay: &StayRange,
    ) -> Result<bool, BackendError> {
        self.check()?;
        let store = self.store.lock().unwrap();
        Ok(!store
            .blocked
            .iter()
            .any(|(id, taken)| id == cabin_id && taken.overlaps(stay)))
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, BackendError> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = Booking {
            id: format!("b-{id}"),
            cabin_id: booking.cabin_id.clone(),
            cabin_name: Some(booking.cabin_name.clone()),
            user_id: Some(booking.user_id.clone()),
            check_in: booking.check_in.date_naive(),
            check_out: booking.check_out.date_naive(),
            number_of_guests: booking.number_of_guests,
            total_amount: booking.total_amount,
            status: booking.status,
            booking_date: Some(booking.booking_date),
            confirmation_code: Some(booking.confirmation_code.clone()),
        };
        self.store.lock().unwrap().bookings.push(created.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(created)
    }

    async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, BackendError> {
        self.check()?;
        let store = self.store.lock().unwrap();
        Ok(store
            .bookings
            .iter()
            .filter(|b| b.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn update_booking(
        &self,
        booking_id: &str,
        update: &BookingUpdate,
    ) -> Result<Booking, BackendError> {
        self.check()?;
        let mut store = self.store.lock().unwrap();
        let booking = store
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(not_found)?;
        booking.check_in = update.check_in;
        booking.check_out = update.check_out;
        booking.number_of_guests = update.number_of_guests;
        booking.total_amount = update.total_amount;
        Ok(booking.clone())
    }

    async fn delete_booking(&self, booking_id: &str) -> Result<(), BackendError> {
        self.check()?;
        let mut store = self.store.lock().unwrap();
        let booking = store
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(not_found)?;
        booking.status = BookingStatus::Cancelled;
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, BackendError> {
        self.check()?;
        if email == "ada@example.com" && password == PASSWORD {
            Ok(user())
        } else {
            Err(BackendError::Status {
                status: 401,
                body: "Invalid credentials".to_string(),
            })
        }
    }

    async fn register(&self, name: &str, email: &str, _password: &str) -> Result<User, BackendError> {
        self.check()?;
        if email == "ada@example.com" {
            return Err(BackendError::Status {
                status: 400,
                body: "User with this email already exists".to_string(),
            });
        }
        Ok(User {
            id: "u-2".to_string(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, BackendError> {
        self.check()?;
        if user_id != USER {
            return Err(not_found());
        }
        Ok(profile())
    }

    async fn update_user_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, BackendError> {
        let mut profile = self.user_profile(user_id).await?;
        if let Some(name) = &update.name {
            profile.name = name.clone();
        }
        if let Some(phone) = &update.phone {
            profile.phone = Some(phone.clone());
        }
        Ok(profile)
    }

    async fn request_password_code(&self, _email: &str) -> Result<(), BackendError> {
        self.check()
    }

    async fn verify_password_code(&self, _email: &str, code: &str) -> Result<(), BackendError> {
        self.check()?;
        if code == "123456" {
            Ok(())
        } else {
            Err(BackendError::Status {
                status: 400,
                body: "Invalid code".to_string(),
            })
        }
    }

    async fn change_password(
        &self,
        email: &str,
        code: &str,
        _new_password: &str,
    ) -> Result<(), BackendError> {
        self.verify_password_code(email, code).await
    }
}

pub fn user() -> User {
    User {
        id: USER.to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
    }
}

pub fn profile() -> UserProfile {
    UserProfile {
        id: USER.to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: None,
        birthday: None,
        address: None,
        profile_image: None,
        member_since: Some("2023".to_string()),
        preferences: Default::default(),
    }
}

pub fn cabin(id: &str, location: &str, price: Decimal, sleeps: u32) -> Cabin {
    Cabin {
        id: id.to_string(),
        name: format!("Cabin {id}"),
        location: location.to_string(),
        price,
        sleeps,
        bedrooms: None,
        bathrooms: None,
        amenities: Vec::new(),
        rating: None,
        review_count: None,
        description: None,
        long_description: None,
        images: Vec::new(),
    }
}

pub fn test_cabins() -> Vec<Cabin> {
    vec![
        cabin("1", "Aspen, Colorado", dec!(100), 4),
        cabin("2", "Lake Tahoe, California", dec!(240), 6),
        cabin("3", "Aspen, Colorado", dec!(275), 8),
    ]
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn booking(id: &str, cabin_id: &str, check_in: NaiveDate, nights: i64, total: Decimal) -> Booking {
    Booking {
        id: id.to_string(),
        cabin_id: cabin_id.to_string(),
        cabin_name: None,
        user_id: Some(USER.to_string()),
        check_in,
        check_out: check_in + Duration::days(nights),
        number_of_guests: 2,
        total_amount: total,
        status: BookingStatus::Confirmed,
        booking_date: None,
        confirmation_code: Some("ABCD1234".to_string()),
    }
}

pub fn test_app(backend: InMemoryBackend, config: Config) -> Router {
    app(AppState::new(backend, config))
}

pub fn default_app(backend: InMemoryBackend) -> Router {
    test_app(backend, Config::default())
}

/// Send a request and decode the JSON body (`Value::Null` when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn authorized(builder: Builder, token: Option<&str>) -> Builder {
    match token {
        Some(token) => builder.header("Authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    authorized(Request::builder().method("GET").uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    authorized(builder, token)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    authorized(Request::builder().method("DELETE").uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

/// Log in as [`USER`] and return the session token
pub async fn login(app: &Router) -> String {
    let credentials = serde_json::json!({"email": "ada@example.com", "password": PASSWORD});
    let (status, body) = send(app, json("POST", "/api/auth/login", None, credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// Decimal from a MoneyResponse-style `{"amount": "390"}` object
pub fn amount(money: &Value) -> Decimal {
    money["amount"].as_str().unwrap().parse().unwrap()
}
