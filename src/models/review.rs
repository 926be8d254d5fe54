//! Review record model.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Value stored in any field that has not been set.
pub const PLACEHOLDER: &str = "-";

/// Sentiment label counted in the positive bucket.
pub const LABEL_POSITIVE: &str = "Positive";

/// Sentiment label counted in the negative bucket.
pub const LABEL_NEGATIVE: &str = "Negative";

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

/// Reviewer name as found in the collection.
///
/// Most records carry a plain string, but older imports hold arbitrary JSON
/// (objects, numbers) in this field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReviewerName {
    Text(String),
    Unstructured(serde_json::Value),
}

impl Default for ReviewerName {
    fn default() -> Self {
        ReviewerName::Text(placeholder())
    }
}

impl From<serde_json::Value> for ReviewerName {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => ReviewerName::Text(s),
            serde_json::Value::Null => ReviewerName::default(),
            other => ReviewerName::Unstructured(other),
        }
    }
}

impl<'de> Deserialize<'de> for ReviewerName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(ReviewerName::from)
    }
}

impl ReviewerName {
    /// Encode as JSON text for the `reviewer_name` column.
    pub fn to_json(&self) -> String {
        match self {
            ReviewerName::Text(s) => serde_json::Value::String(s.clone()).to_string(),
            ReviewerName::Unstructured(v) => v.to_string(),
        }
    }

    /// Decode the `reviewer_name` column. Text that is not valid JSON is
    /// taken verbatim.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str::<serde_json::Value>(raw)
            .map(ReviewerName::from)
            .unwrap_or_else(|_| ReviewerName::Text(raw.to_string()))
    }
}

/// A single tourist attraction review.
///
/// Field names on the wire match the original collection so existing
/// front-ends keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Tourist_Attraction_ThaiName", default = "placeholder")]
    pub thai_name: String,
    #[serde(rename = "Tourist_Attraction_Category", default = "placeholder")]
    pub category: String,
    #[serde(rename = "Tourist_Attraction", default = "placeholder")]
    pub attraction: String,
    #[serde(rename = "Name", default)]
    pub name: ReviewerName,
    #[serde(rename = "Review", default = "placeholder")]
    pub text: String,
    #[serde(rename = "Rating", default = "placeholder")]
    pub rating: String,
    #[serde(default = "placeholder")]
    pub label: String,
    #[serde(rename = "Emoji", default = "placeholder")]
    pub emoji: String,
    #[serde(
        rename = "Emoji_Label",
        default,
        serialize_with = "serialize_intensity",
        deserialize_with = "deserialize_intensity"
    )]
    pub emoji_label: f64,
    #[serde(rename = "Label_vaderSentiment", default = "placeholder")]
    pub vader_label: String,
    #[serde(rename = "Adjective", default = "placeholder")]
    pub adjective: String,
    #[serde(rename = "Aspect", default = "placeholder")]
    pub aspect: String,
    #[serde(rename = "CreateAt", alias = "CreatedAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Build an unclassified review from submitted fields.
    ///
    /// Blank optional fields fall back to the placeholder; every
    /// classifier-derived field starts out unset.
    pub fn draft(
        thai_name: Option<&str>,
        category: &str,
        attraction: Option<&str>,
        text: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            thai_name: or_placeholder(thai_name),
            category: category.to_string(),
            attraction: or_placeholder(attraction),
            name: ReviewerName::default(),
            text: text.to_string(),
            rating: placeholder(),
            label: placeholder(),
            emoji: placeholder(),
            emoji_label: 0.0,
            vader_label: placeholder(),
            adjective: placeholder(),
            aspect: placeholder(),
            // Stored timestamps carry microseconds; truncate so reads compare equal.
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// Use the value if it has content, otherwise the placeholder.
pub fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => placeholder(),
    }
}

/// Read an emoji intensity from arbitrary JSON; anything non-numeric is 0.
pub fn intensity_from_value(value: &serde_json::Value) -> f64 {
    value.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0)
}

fn serialize_intensity<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn deserialize_intensity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(intensity_from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_defaults() {
        let review = Review::draft(None, "Nature", Some(""), "Lovely waterfall");

        assert_eq!(review.thai_name, PLACEHOLDER);
        assert_eq!(review.attraction, PLACEHOLDER);
        assert_eq!(review.category, "Nature");
        assert_eq!(review.text, "Lovely waterfall");
        assert_eq!(review.label, PLACEHOLDER);
        assert_eq!(review.emoji, PLACEHOLDER);
        assert_eq!(review.aspect, PLACEHOLDER);
        assert_eq!(review.emoji_label, 0.0);
        assert_eq!(review.name, ReviewerName::Text("-".to_string()));
        assert!(Uuid::parse_str(&review.id).is_ok());
    }

    #[test]
    fn test_wire_field_names() {
        let mut review = Review::draft(Some("วัดพระแก้ว"), "Religious Place", Some("Wat Phra Kaew"), "Beautiful");
        review.emoji_label = 2.0;
        review.label = LABEL_POSITIVE.to_string();

        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["_id"], review.id.as_str());
        assert_eq!(json["Tourist_Attraction_ThaiName"], "วัดพระแก้ว");
        assert_eq!(json["Tourist_Attraction"], "Wat Phra Kaew");
        assert_eq!(json["Review"], "Beautiful");
        assert_eq!(json["label"], "Positive");
        assert_eq!(json["Emoji_Label"], json!(2));
        assert_eq!(json["Name"], "-");
        assert!(json["CreateAt"].is_string());
    }

    #[test]
    fn test_fractional_intensity_kept() {
        let mut review = Review::draft(None, "Zoos", None, "ok");
        review.emoji_label = 1.5;
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["Emoji_Label"], json!(1.5));
    }

    #[test]
    fn test_intensity_from_value() {
        assert_eq!(intensity_from_value(&json!(3)), 3.0);
        assert_eq!(intensity_from_value(&json!(0.25)), 0.25);
        assert_eq!(intensity_from_value(&json!("3")), 0.0);
        assert_eq!(intensity_from_value(&json!(null)), 0.0);
    }

    #[test]
    fn test_reviewer_name_shapes() {
        assert_eq!(
            ReviewerName::from(json!("Somchai")),
            ReviewerName::Text("Somchai".to_string())
        );
        assert_eq!(ReviewerName::from(json!(null)), ReviewerName::default());

        let structured = ReviewerName::from(json!({"first": "A", "last": "B"}));
        assert!(matches!(structured, ReviewerName::Unstructured(_)));
        assert_eq!(ReviewerName::from_json(&structured.to_json()), structured);

        let text = ReviewerName::Text("plain".to_string());
        assert_eq!(ReviewerName::from_json(&text.to_json()), text);
        assert_eq!(
            ReviewerName::from_json("not json"),
            ReviewerName::Text("not json".to_string())
        );
    }

    #[test]
    fn test_deserialize_accepts_created_at_alias() {
        let review: Review = serde_json::from_value(json!({
            "_id": "abc",
            "Tourist_Attraction_Category": "Parks",
            "Review": "Nice",
            "Name": 42,
            "Emoji_Label": "n/a",
            "CreatedAt": "2024-01-02T03:04:05Z"
        }))
        .unwrap();

        assert_eq!(review.id, "abc");
        assert_eq!(review.attraction, PLACEHOLDER);
        assert_eq!(review.emoji_label, 0.0);
        assert_eq!(review.name, ReviewerName::Unstructured(json!(42)));
        assert_eq!(review.created_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }
}
