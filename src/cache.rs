//! In-memory caching using moka
//!
//! Caches the cabin catalog and per-cabin reviews fetched from the backend.
//! Listings change rarely, so they are kept for a while and refreshed by a
//! background warmer.

use moka::future::Cache;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::backend::BookingBackend;
use crate::models::{Cabin, Review};

const LISTING_KEY: &str = "cabins:all";

static FALLBACK_CABINS: OnceLock<Arc<Vec<Cabin>>> = OnceLock::new();

/// Application cache holding cabins and reviews
#[derive(Clone)]
pub struct AppCache {
    /// Full cabin listing (single entry)
    pub listings: Cache<String, Arc<Vec<Cabin>>>,
    /// Cabins (id -> Cabin)
    pub cabins: Cache<String, Arc<Cabin>>,
    /// Reviews (cabin id -> reviews)
    pub reviews: Cache<String, Arc<Vec<Review>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Listing: 1 entry, 15 min TTL
            listings: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(15 * 60))
                .build(),

            // Cabins: 500 entries, 30 min TTL, 10 min idle
            cabins: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(30 * 60))
                .time_to_idle(Duration::from_secs(10 * 60))
                .build(),

            // Reviews: 500 entries, 5 min TTL (guests post new ones)
            reviews: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    pub fn listing_key() -> String {
        LISTING_KEY.to_string()
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            listing_cached: self.listings.entry_count() > 0,
            cabins_size: self.cabins.entry_count(),
            reviews_size: self.reviews.entry_count(),
        }
    }

    /// Drop cached reviews for a cabin after a new one is posted
    pub async fn invalidate_reviews(&self, cabin_id: &str) {
        self.reviews.invalidate(cabin_id).await;
        info!("Review cache invalidated for cabin: {}", cabin_id);
    }

    /// Store a fresh listing and index each cabin by id
    pub async fn store_listing(&self, cabins: Arc<Vec<Cabin>>) {
        for cabin in cabins.iter() {
            self.cabins
                .insert(cabin.id.clone(), Arc::new(cabin.clone()))
                .await;
        }
        self.listings.insert(Self::listing_key(), cabins).await;
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub listing_cached: bool,
    pub cabins_size: u64,
    pub reviews_size: u64,
}

/// Cabins bundled with the binary, served when the backend is unreachable
pub fn fallback_cabins() -> Arc<Vec<Cabin>> {
    FALLBACK_CABINS
        .get_or_init(|| {
            let cabins = serde_json::from_str::<Vec<Cabin>>(include_str!("../data/cabins.json"))
                .unwrap_or_else(|e| {
                    error!("Bundled cabin data is invalid: {}", e);
                    Vec::new()
                });
            Arc::new(cabins)
        })
        .clone()
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes it every `period`.
/// A zero period warms once and stops.
pub async fn start_cache_warmer<B: BookingBackend>(cache: AppCache, backend: B, period: Duration) {
    if period.is_zero() {
        warm_cache(&cache, &backend).await;
        return;
    }

    let mut interval = interval(period);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &backend).await;
    }
}

/// Warm the cache with the cabin listing
async fn warm_cache<B: BookingBackend>(cache: &AppCache, backend: &B) {
    info!("Starting cache warm-up...");

    match backend.list_cabins().await {
        Ok(cabins) => cache.store_listing(Arc::new(cabins)).await,
        Err(e) => warn!("Failed to warm cabin listing cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
