//! Review listing and ingestion endpoints.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::super::{ApiError, AppState};
use crate::models::Review;
use crate::services::{IngestOutcome, ReviewSubmission};

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Place filter parameters.
#[derive(Debug, Deserialize)]
pub struct PlaceParams {
    pub place: Option<String>,
}

/// Reviews for one attraction, or all reviews when `place` is absent or empty.
pub async fn get_reviews(
    State(state): State<AppState>,
    Query(params): Query<PlaceParams>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let place = params.place.as_deref().filter(|p| !p.is_empty());
    let reviews = state.reviews.list(place).await?;
    Ok(Json(reviews))
}

/// Every stored review.
pub async fn api_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state.reviews.list(None).await?;
    Ok(Json(reviews))
}

/// Classify and store a submitted review.
///
/// Malformed bodies are reported through the same 500 envelope as every
/// other failure.
pub async fn add_review(
    State(state): State<AppState>,
    payload: Result<Json<ReviewSubmission>, JsonRejection>,
) -> Result<Json<IngestOutcome>, ApiError> {
    let Json(submission) = payload?;
    let outcome = state.ingest.ingest(submission).await?;
    Ok(Json(outcome))
}
