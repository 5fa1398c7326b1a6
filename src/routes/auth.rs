//! Login, registration and password reset.
//!
//! Credentials are checked by the backend. A successful login or
//! registration opens a session and returns its bearer token with the
//! user record.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::backend::{BackendError, BookingBackend};
use crate::error::{AppError, Result};
use crate::models::User;
use crate::session::Session;
use crate::AppState;

pub fn router<B: BookingBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/auth/login", post(login::<B>))
        .route("/auth/register", post(register::<B>))
        .route("/auth/logout", post(logout::<B>))
        .route("/auth/password-code", post(request_code::<B>))
        .route("/auth/password-code/verify", post(verify_code::<B>))
        .route("/auth/password", post(change_password::<B>))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter your password"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Please enter your name"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordCodeRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter the code from your email"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter the code from your email"))]
    pub code: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// A rejected sign-in reads the same whatever the backend's reason was.
fn credentials_error(err: BackendError) -> AppError {
    match err.status() {
        Some(400 | 401 | 403 | 404) => AppError::InvalidCredentials,
        _ => AppError::Backend(err),
    }
}

/// The backend refuses a registration whose email is already taken; other
/// field problems are caught by validation before the call.
fn registration_error(err: BackendError) -> AppError {
    match err.status() {
        Some(400 | 409) => {
            AppError::Conflict("An account with this email already exists".to_string())
        }
        _ => AppError::Backend(err),
    }
}

/// POST /auth/login
async fn login<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    request.validate()?;
    let email = request.email.trim().to_lowercase();

    let user = state
        .backend
        .login(&email, &request.password)
        .await
        .map_err(credentials_error)?;

    let token = state.sessions.open(&user.id).await;
    info!("User {} logged in", user.id);
    Ok(Json(AuthResponse {
        token,
        user,
        message: "Login successful".to_string(),
    }))
}

/// POST /auth/register
async fn register<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    request.validate()?;
    let email = request.email.trim().to_lowercase();

    let user = state
        .backend
        .register(request.name.trim(), &email, &request.password)
        .await
        .map_err(registration_error)?;

    let token = state.sessions.open(&user.id).await;
    info!("User {} registered", user.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user,
            message: "Account created".to_string(),
        }),
    ))
}

/// POST /auth/logout
async fn logout<B: BookingBackend>(
    State(state): State<AppState<B>>,
    session: Session,
) -> Json<MessageResponse> {
    state.sessions.close(&session.token).await;
    info!("User {} logged out", session.user_id);
    MessageResponse::new("Logged out")
}

/// POST /auth/password-code
async fn request_code<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Json(request): Json<PasswordCodeRequest>,
) -> Result<Json<MessageResponse>> {
    request.validate()?;
    state
        .backend
        .request_password_code(request.email.trim())
        .await?;
    Ok(MessageResponse::new("A verification code has been sent to your email"))
}

/// POST /auth/password-code/verify
async fn verify_code<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<Json<MessageResponse>> {
    request.validate()?;
    state
        .backend
        .verify_password_code(request.email.trim(), request.code.trim())
        .await
        .map_err(|e| match e.status() {
            Some(400 | 404) => AppError::validation("The verification code is invalid or expired"),
            _ => AppError::Backend(e),
        })?;
    Ok(MessageResponse::new("Code verified"))
}

/// POST /auth/password
async fn change_password<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    request.validate()?;
    state
        .backend
        .change_password(
            request.email.trim(),
            request.code.trim(),
            &request.new_password,
        )
        .await?;
    info!("Password changed for {}", request.email.trim());
    Ok(MessageResponse::new("Password updated"))
}
