//! Data models for review-insight.

mod review;
mod stats;

pub use review::{
    intensity_from_value, or_placeholder, Review, ReviewerName, LABEL_NEGATIVE, LABEL_POSITIVE,
    PLACEHOLDER,
};
pub use stats::{
    AspectBreakdown, AspectSentiment, AttractionSentiment, PlaceSentiment, SentimentSelector,
    TOP_ATTRACTIONS_LIMIT,
};
