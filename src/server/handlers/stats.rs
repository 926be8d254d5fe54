//! Sentiment statistics endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::api::PlaceParams;
use super::super::{ApiError, AppState};
use crate::models::{
    AspectBreakdown, AspectSentiment, AttractionSentiment, PlaceSentiment, SentimentSelector,
    TOP_ATTRACTIONS_LIMIT,
};

#[derive(Debug, Deserialize)]
pub struct LabelParams {
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryParams {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AspectParams {
    pub category: Option<String>,
    pub aspect: Option<String>,
}

/// Top attractions by positive (`label=Positive`) or negative count.
pub async fn top10(
    State(state): State<AppState>,
    Query(params): Query<LabelParams>,
) -> Result<Json<Vec<AttractionSentiment>>, ApiError> {
    let selector = SentimentSelector::from_query(params.label.as_deref());
    let top = state
        .reviews
        .top_attractions(selector, TOP_ATTRACTIONS_LIMIT)
        .await?;
    Ok(Json(top))
}

pub async fn get_aspects(
    State(state): State<AppState>,
    Query(params): Query<CategoryParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let aspects = state
        .reviews
        .distinct_aspects(params.category.as_deref())
        .await?;
    Ok(Json(aspects))
}

pub async fn get_aspect_stats(
    State(state): State<AppState>,
    Query(params): Query<AspectParams>,
) -> Result<Json<AspectSentiment>, ApiError> {
    let stats = state
        .reviews
        .aspect_sentiment(params.category.as_deref(), params.aspect.as_deref())
        .await?;
    Ok(Json(stats))
}

pub async fn get_aspect_stats_by_place(
    State(state): State<AppState>,
    Query(params): Query<AspectParams>,
) -> Result<Json<Vec<PlaceSentiment>>, ApiError> {
    let stats = state
        .reviews
        .aspect_sentiment_by_place(params.category.as_deref(), params.aspect.as_deref())
        .await?;
    Ok(Json(stats))
}

pub async fn get_stats_by_category(
    State(state): State<AppState>,
    Query(params): Query<CategoryParams>,
) -> Result<Json<Vec<PlaceSentiment>>, ApiError> {
    let stats = state
        .reviews
        .stats_by_category(params.category.as_deref())
        .await?;
    Ok(Json(stats))
}

pub async fn get_stats_by_place(
    State(state): State<AppState>,
    Query(params): Query<PlaceParams>,
) -> Result<Json<Vec<AspectBreakdown>>, ApiError> {
    let stats = state.reviews.stats_by_place(params.place.as_deref()).await?;
    Ok(Json(stats))
}
