//! Aggregate views over reviews.

use serde::{Deserialize, Serialize};

use super::review::{LABEL_NEGATIVE, LABEL_POSITIVE};

/// Number of attractions returned by the top list.
pub const TOP_ATTRACTIONS_LIMIT: i64 = 10;

/// Which count the top-attractions ranking sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentSelector {
    Positive,
    Negative,
}

impl SentimentSelector {
    /// Parse the `label` query parameter.
    ///
    /// Only an exact "Positive" ranks by positives; anything else, including
    /// no parameter at all, ranks by negatives.
    pub fn from_query(label: Option<&str>) -> Self {
        match label {
            Some(LABEL_POSITIVE) => SentimentSelector::Positive,
            _ => SentimentSelector::Negative,
        }
    }
}

/// Positive/negative totals for one attraction, as returned by `/top10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttractionSentiment {
    #[serde(rename = "_id")]
    pub attraction: String,
    #[serde(rename = "positiveCount")]
    pub positive_count: u64,
    #[serde(rename = "negativeCount")]
    pub negative_count: u64,
}

/// Label totals for one (category, aspect) pair, shaped for charting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectSentiment {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl AspectSentiment {
    pub fn new(positive: u64, negative: u64) -> Self {
        Self {
            labels: vec![LABEL_POSITIVE.to_string(), LABEL_NEGATIVE.to_string()],
            values: vec![positive, negative],
        }
    }
}

/// Positive/negative totals for one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSentiment {
    pub place: String,
    pub positive: u64,
    pub negative: u64,
}

/// Positive/negative totals for one aspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectBreakdown {
    pub aspect: String,
    pub positive: u64,
    pub negative: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        assert_eq!(
            SentimentSelector::from_query(Some("Positive")),
            SentimentSelector::Positive
        );
        assert_eq!(
            SentimentSelector::from_query(Some("Negative")),
            SentimentSelector::Negative
        );
        assert_eq!(
            SentimentSelector::from_query(Some("positive")),
            SentimentSelector::Negative
        );
        assert_eq!(SentimentSelector::from_query(None), SentimentSelector::Negative);
    }

    #[test]
    fn test_aspect_sentiment_shape() {
        let json = serde_json::to_value(AspectSentiment::new(2, 1)).unwrap();
        assert_eq!(json, serde_json::json!({"labels": ["Positive", "Negative"], "values": [2, 1]}));
    }

    #[test]
    fn test_attraction_sentiment_field_names() {
        let json = serde_json::to_value(AttractionSentiment {
            attraction: "Chatuchak".to_string(),
            positive_count: 3,
            negative_count: 0,
        })
        .unwrap();
        assert_eq!(json["_id"], "Chatuchak");
        assert_eq!(json["positiveCount"], 3);
        assert_eq!(json["negativeCount"], 0);
    }
}
