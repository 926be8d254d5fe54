//! Sentiment classification for incoming reviews.
//!
//! The prediction service is external; [`SentimentClassifier`] is the seam
//! the ingest path talks to, and [`HttpClassifier`] is the production
//! implementation.

mod client;
mod config;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use client::HttpClassifier;
pub use config::ClassifierConfig;

use crate::models::{intensity_from_value, PLACEHOLDER};

/// Errors from a classification call.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
    #[error("Classifier did not respond within {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("Classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The reply was not a JSON object; carries the raw body.
    #[error("Classifier returned a malformed reply: {0}")]
    InvalidResponse(String),
}

/// Classifies review text within a category.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, review: &str, category: &str)
        -> Result<RawPrediction, ClassifierError>;
}

/// Request body sent to the predict route.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub review: &'a str,
    pub category: &'a str,
}

/// Prediction reply as received, before validation.
///
/// Unknown fields are kept so a rejected reply can be reported verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emojis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_label: Option<Value>,
    #[serde(rename = "Aspect", default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A complete prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub sentiment: String,
    pub emojis: Value,
    pub emoji_label: Value,
    pub aspect: String,
    pub score: Value,
}

impl RawPrediction {
    /// Check every required field is present.
    ///
    /// `sentiment` and `Aspect` must be non-empty strings; the other fields
    /// only need to be non-null.
    pub fn validate(&self) -> Option<Prediction> {
        let sentiment = non_empty_str(self.sentiment.as_ref())?;
        let aspect = non_empty_str(self.aspect.as_ref())?;
        let emojis = non_null(self.emojis.as_ref())?;
        let emoji_label = non_null(self.emoji_label.as_ref())?;
        let score = non_null(self.score.as_ref())?;

        Some(Prediction {
            sentiment,
            emojis,
            emoji_label,
            aspect,
            score,
        })
    }

    /// Compact JSON rendering for error messages.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

impl Prediction {
    /// Emoji text for storage: arrays are joined by single spaces.
    pub fn emoji_text(&self) -> String {
        let text = match &self.emojis {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
            other => other.to_string(),
        };

        if text.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            text
        }
    }

    /// Emoji intensity, 0 when the classifier sent something non-numeric.
    pub fn intensity(&self) -> f64 {
        intensity_from_value(&self.emoji_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawPrediction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_canonical_reply_validates() {
        let prediction = raw(json!({
            "review": "Great staff",
            "sentiment": "Positive",
            "emojis": ["😀", "👍"],
            "emoji_label": 2,
            "Aspect": "service",
            "score": 0.93
        }))
        .validate()
        .unwrap();

        assert_eq!(prediction.sentiment, "Positive");
        assert_eq!(prediction.aspect, "service");
        assert_eq!(prediction.emoji_text(), "😀 👍");
        assert_eq!(prediction.intensity(), 2.0);
    }

    #[test]
    fn test_missing_or_null_fields_rejected() {
        let complete = json!({
            "sentiment": "Negative",
            "emojis": "😡",
            "emoji_label": 1,
            "Aspect": "price",
            "score": 0.5
        });
        assert!(raw(complete.clone()).validate().is_some());

        for field in ["sentiment", "emojis", "emoji_label", "Aspect", "score"] {
            let mut missing = complete.clone();
            missing.as_object_mut().unwrap().remove(field);
            assert!(raw(missing).validate().is_none(), "missing {field}");

            let mut null = complete.clone();
            null[field] = Value::Null;
            assert!(raw(null).validate().is_none(), "null {field}");
        }

        let mut empty_aspect = complete.clone();
        empty_aspect["Aspect"] = json!("");
        assert!(raw(empty_aspect).validate().is_none());
    }

    #[test]
    fn test_emoji_text_shapes() {
        let mut prediction = raw(json!({
            "sentiment": "Positive",
            "emojis": "😀",
            "emoji_label": "strong",
            "Aspect": "food",
            "score": 1
        }))
        .validate()
        .unwrap();

        assert_eq!(prediction.emoji_text(), "😀");
        assert_eq!(prediction.intensity(), 0.0);

        prediction.emojis = json!([]);
        assert_eq!(prediction.emoji_text(), PLACEHOLDER);
        prediction.emojis = json!("");
        assert_eq!(prediction.emoji_text(), PLACEHOLDER);
    }

    #[test]
    fn test_rejected_reply_keeps_extra_fields() {
        let reply = raw(json!({"sentiment": "Positive", "review": "ok"}));
        let rendered: Value = serde_json::from_str(&reply.to_json()).unwrap();
        assert_eq!(rendered, json!({"sentiment": "Positive", "review": "ok"}));
    }
}
