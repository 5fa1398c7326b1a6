//! Cabin catalog reads: cache first, then the backend, then bundled data.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::{BookingBackend, NewReview};
use crate::cache::{fallback_cabins, AppCache};
use crate::error::{AppError, Result};
use crate::models::{Cabin, Review};

/// Full cabin listing.
///
/// Falls back to the bundled dataset when the backend is unreachable; the
/// fallback is not cached so the next request tries the backend again.
pub async fn all_cabins<B: BookingBackend>(cache: &AppCache, backend: &B) -> Result<Arc<Vec<Cabin>>> {
    if let Some(cached) = cache.listings.get(&AppCache::listing_key()).await {
        debug!("Cache HIT for cabin listing");
        return Ok(cached);
    }

    debug!("Cache MISS for cabin listing");
    match backend.list_cabins().await {
        Ok(cabins) => {
            let cabins = Arc::new(cabins);
            cache.store_listing(cabins.clone()).await;
            Ok(cabins)
        }
        Err(e) if e.is_unavailable() => {
            warn!("Backend unreachable, serving bundled cabins: {}", e);
            Ok(fallback_cabins())
        }
        Err(e) => Err(e.into()),
    }
}

/// One cabin by id, with the same fallback rules as [`all_cabins`]
pub async fn cabin<B: BookingBackend>(cache: &AppCache, backend: &B, id: &str) -> Result<Arc<Cabin>> {
    if let Some(cached) = cache.cabins.get(id).await {
        debug!("Cache HIT for cabin: {}", id);
        return Ok(cached);
    }

    debug!("Cache MISS for cabin: {}", id);
    match backend.get_cabin(id).await {
        Ok(cabin) => {
            let cabin = Arc::new(cabin);
            cache.cabins.insert(id.to_string(), cabin.clone()).await;
            Ok(cabin)
        }
        Err(e) if e.is_not_found() => Err(AppError::NotFound("Cabin".to_string())),
        Err(e) if e.is_unavailable() => {
            warn!("Backend unreachable, looking up cabin {} in bundled data: {}", id, e);
            fallback_cabins()
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .map(Arc::new)
                .ok_or_else(|| AppError::NotFound("Cabin".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Reviews for a cabin; an unreachable backend yields an empty list
pub async fn reviews<B: BookingBackend>(
    cache: &AppCache,
    backend: &B,
    cabin_id: &str,
) -> Result<Arc<Vec<Review>>> {
    if let Some(cached) = cache.reviews.get(cabin_id).await {
        return Ok(cached);
    }

    match backend.cabin_reviews(cabin_id).await {
        Ok(reviews) => {
            let reviews = Arc::new(reviews);
            cache.reviews.insert(cabin_id.to_string(), reviews.clone()).await;
            Ok(reviews)
        }
        Err(e) if e.is_unavailable() || e.is_not_found() => {
            warn!("Could not load reviews for cabin {}: {}", cabin_id, e);
            Ok(Arc::new(Vec::new()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn post_review<B: BookingBackend>(
    cache: &AppCache,
    backend: &B,
    review: &NewReview,
) -> Result<Review> {
    let created = backend.create_review(review).await?;
    cache.invalidate_reviews(&review.cabin_id).await;
    Ok(created)
}
