//! Service configuration from the environment (and `.env`, via dotenvy).

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::booking::availability::AvailabilityMode;

#[derive(Debug, thiserror::Error)]
#[error("Invalid {key} value '{value}': {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Base URL of the REST backend, including the `/api` prefix
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub availability_mode: AvailabilityMode,
    /// Identical booking submissions inside this window are merged; zero disables.
    pub duplicate_window: Duration,
    /// Sessions unused for this long are closed
    pub session_idle: Duration,
    pub cache_refresh: Duration,
    /// Allowed browser origin; `None` allows any
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8080")?,
            backend_url: try_load("BACKEND_URL", "http://localhost:5079/api")?,
            backend_timeout: Duration::from_secs(try_load("BACKEND_TIMEOUT_SECS", "10")?),
            availability_mode: try_load("AVAILABILITY_MODE", "stub")?,
            duplicate_window: Duration::from_secs(try_load("DUPLICATE_WINDOW_SECS", "30")?),
            session_idle: Duration::from_secs(try_load("SESSION_IDLE_SECS", "86400")?),
            cache_refresh: Duration::from_secs(try_load("CACHE_REFRESH_SECS", "600")?),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.trim().is_empty()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            backend_url: "http://localhost:5079/api".to_string(),
            backend_timeout: Duration::from_secs(10),
            availability_mode: AvailabilityMode::Stub,
            duplicate_window: Duration::from_secs(30),
            session_idle: Duration::from_secs(24 * 60 * 60),
            cache_refresh: Duration::from_secs(600),
            cors_origin: None,
        }
    }
}

fn try_load<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}
