//! HTTP request handlers for the web server.

mod api;
mod static_files;
mod stats;

// Re-export handlers for use by the router
pub use api::{add_review, api_reviews, get_reviews, health};
pub use static_files::{serve_favicon, serve_index, serve_static};
pub use stats::{
    get_aspect_stats, get_aspect_stats_by_place, get_aspects, get_stats_by_category,
    get_stats_by_place, top10,
};
