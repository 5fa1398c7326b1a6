//! Cabin catalog route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use validator::Validate;

use crate::backend::{BookingBackend, NewReview};
use crate::booking::requests::CreateReviewRequest;
use crate::catalog;
use crate::error::Result;
use crate::models::cabin::distinct_locations;
use crate::models::{Cabin, CabinFilter, Review};
use crate::AppState;

pub fn router<B: BookingBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/cabins", get(list::<B>))
        .route("/cabins/locations", get(locations::<B>))
        .route("/cabins/:id", get(detail::<B>))
        .route("/cabins/:id/reviews", post(create_review::<B>))
}

/// Cabin page: the cabin plus its reviews
#[derive(Debug, Serialize)]
pub struct CabinDetailResponse {
    #[serde(flatten)]
    pub cabin: Cabin,
    #[serde(rename = "reviewList")]
    pub review_list: Vec<Review>,
}

/// GET /cabins
async fn list<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Query(filter): Query<CabinFilter>,
) -> Result<Json<Vec<Cabin>>> {
    let cabins = catalog::all_cabins(&state.cache, &state.backend).await?;
    Ok(Json(filter.apply(&cabins)))
}

/// GET /cabins/locations
async fn locations<B: BookingBackend>(State(state): State<AppState<B>>) -> Result<Json<Vec<String>>> {
    let cabins = catalog::all_cabins(&state.cache, &state.backend).await?;
    Ok(Json(distinct_locations(&cabins)))
}

/// GET /cabins/:id
async fn detail<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<Json<CabinDetailResponse>> {
    let cabin = catalog::cabin(&state.cache, &state.backend, &id).await?;
    let reviews = catalog::reviews(&state.cache, &state.backend, &id).await?;

    Ok(Json(CabinDetailResponse {
        cabin: (*cabin).clone(),
        review_list: (*reviews).clone(),
    }))
}

/// POST /cabins/:id/reviews
async fn create_review<B: BookingBackend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    request.validate()?;

    // 404 before posting against a cabin that does not exist
    let cabin = catalog::cabin(&state.cache, &state.backend, &id).await?;

    let review = NewReview {
        cabin_id: cabin.id.clone(),
        name: request.name.trim().to_string(),
        rating: request.rating,
        comment: request.comment.trim().to_string(),
    };
    let created = catalog::post_review(&state.cache, &state.backend, &review).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
