//! Cabin rental booking service.
//!
//! Serves the booking calculator (stay quotes with add-on fees, refund
//! quotes by days until check-in) and the booking flows around it. Cabins,
//! bookings and users live in the cabin rentals REST backend; this service
//! validates, prices and forwards.

pub mod backend;
pub mod booking;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info_span, warn, Span};
use uuid::Uuid;

use crate::backend::BookingBackend;
use crate::booking::SubmissionGuard;
use crate::cache::AppCache;
use crate::config::Config;
use crate::session::SessionStore;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared handler state
#[derive(Clone)]
pub struct AppState<B> {
    pub backend: B,
    pub cache: AppCache,
    pub guard: SubmissionGuard,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
}

impl<B: BookingBackend> AppState<B> {
    pub fn new(backend: B, config: Config) -> Self {
        Self {
            backend,
            cache: AppCache::new(),
            guard: SubmissionGuard::new(config.duplicate_window),
            sessions: SessionStore::new(config.session_idle),
            config: Arc::new(config),
        }
    }
}

/// The full application router, everything under `/api`.
///
/// Each request gets an `X-Request-Id` (kept if the caller sent one) that
/// is recorded on its trace span and echoed on the response.
pub fn app<B: BookingBackend>(state: AppState<B>) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .nest("/api", routes::router())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

#[derive(Debug, Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS_ORIGIN: {}", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
