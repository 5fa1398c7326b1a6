//! Profile route handlers

use axum::{extract::State, routing::get, Json, Router};
use tracing::info;
use validator::Validate;

use crate::backend::BookingBackend;
use crate::error::{AppError, Result};
use crate::models::user::ProfileUpdate;
use crate::models::UserProfile;
use crate::session::Session;
use crate::AppState;

pub fn router<B: BookingBackend>() -> Router<AppState<B>> {
    Router::new().route("/profile", get(show::<B>).put(update::<B>))
}

/// GET /profile
async fn show<B: BookingBackend>(
    State(state): State<AppState<B>>,
    session: Session,
) -> Result<Json<UserProfile>> {
    let profile = state
        .backend
        .user_profile(&session.user_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::NotFound("Profile".to_string())
            } else {
                AppError::Backend(e)
            }
        })?;
    Ok(Json(profile))
}

/// PUT /profile
async fn update<B: BookingBackend>(
    State(state): State<AppState<B>>,
    session: Session,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>> {
    update.validate()?;
    let profile = state
        .backend
        .update_user_profile(&session.user_id, &update)
        .await?;
    info!("Profile updated for user {}", session.user_id);
    Ok(Json(profile))
}
