//! HTTP routes served under `/api`.

pub mod auth;
pub mod cabins;
pub mod profile;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::backend::BookingBackend;
use crate::cache::CacheStats;
use crate::AppState;

pub fn router<B: BookingBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/health", get(health::<B>))
        .merge(cabins::router())
        .merge(crate::booking::router())
        .merge(auth::router())
        .merge(profile::router())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub availability_mode: String,
    pub duplicate_guard: bool,
    pub open_sessions: u64,
    pub cache: CacheStats,
}

/// GET /health
async fn health<B: BookingBackend>(State(state): State<AppState<B>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        availability_mode: state.config.availability_mode.to_string(),
        duplicate_guard: state.guard.is_enabled(),
        open_sessions: state.sessions.open_count(),
        cache: state.cache.stats(),
    })
}
