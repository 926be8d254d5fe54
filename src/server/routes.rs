//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::serve_index))
        .route("/favicon.ico", get(handlers::serve_favicon))
        .route("/health", get(handlers::health))
        // Reviews
        .route("/getReviews", get(handlers::get_reviews))
        .route("/api/reviews", get(handlers::api_reviews))
        .route("/addReview", post(handlers::add_review))
        // Statistics
        .route("/top10", get(handlers::top10))
        .route("/getAspects", get(handlers::get_aspects))
        .route("/getAspectStats", get(handlers::get_aspect_stats))
        .route(
            "/getAspectStatsByPlace",
            get(handlers::get_aspect_stats_by_place),
        )
        .route("/getStatsByCategory", get(handlers::get_stats_by_category))
        .route("/getStatsByPlace", get(handlers::get_stats_by_place))
        // Front-end assets
        .fallback(handlers::serve_static)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
