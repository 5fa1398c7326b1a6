//! Request-scoped session.
//!
//! Login and registration open a session and hand the caller an opaque
//! token; the caller sends it back as `Authorization: Bearer <token>`.
//! Tokens are random, live only in this service's [`SessionStore`] and
//! expire after a period of inactivity. Handlers that need a user take a
//! [`Session`] argument; a request without a live token is rejected with
//! 401 before the handler runs.

use std::time::Duration;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use crate::backend::BookingBackend;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

/// Open sessions (token -> user id)
#[derive(Clone)]
pub struct SessionStore {
    open: Cache<String, String>,
}

impl SessionStore {
    /// Sessions unused for `idle` are closed.
    pub fn new(idle: Duration) -> Self {
        Self {
            open: Cache::builder()
                .max_capacity(100_000)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Open a session for `user_id` and return its token.
    pub async fn open(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.open.insert(token.clone(), user_id.to_string()).await;
        debug!("Session opened for user {}", user_id);
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<Session> {
        self.open.get(token).await.map(|user_id| Session {
            user_id,
            token: token.to_string(),
        })
    }

    pub async fn close(&self, token: &str) {
        self.open.invalidate(token).await;
    }

    /// Approximate number of open sessions
    pub fn open_count(&self) -> u64 {
        self.open.entry_count()
    }
}

/// The token from an `Authorization: Bearer` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl<B: BookingBackend> FromRequestParts<AppState<B>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<B>,
    ) -> Result<Self, Self::Rejection> {
        let session = match bearer_token(&parts.headers) {
            Some(token) => state.sessions.resolve(token).await,
            None => None,
        };

        session.ok_or_else(|| {
            debug!("Rejected request without session: {}", parts.uri.path());
            AppError::Unauthorized
        })
    }
}
