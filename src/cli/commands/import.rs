//! Review import command.
//!
//! Accepts a JSON array or JSON Lines, including `mongoexport` output in
//! relaxed or canonical extended JSON.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use console::style;
use serde_json::{Map, Value};

use crate::config::Settings;
use crate::models::Review;

/// Fields stored as text even when an export holds numbers there.
const TEXT_FIELDS: &[&str] = &[
    "Tourist_Attraction_ThaiName",
    "Tourist_Attraction_Category",
    "Tourist_Attraction",
    "Review",
    "Rating",
    "label",
    "Emoji",
    "Label_vaderSentiment",
    "Adjective",
    "Aspect",
];

/// Import reviews from a file.
pub async fn cmd_import(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(file).await.map_err(|e| {
        anyhow::anyhow!("Failed to read {}: {}", file.display(), e)
    })?;

    let records = parse_records(&contents)?;
    println!(
        "{} Importing {} reviews from {}",
        style("→").cyan(),
        records.len(),
        file.display()
    );

    let ctx = settings.create_db_context()?;
    ctx.init_schema().await?;
    let repo = ctx.reviews();

    let mut imported = 0usize;
    let mut skipped = 0usize;
    for (index, record) in records.into_iter().enumerate() {
        let review = match review_from_value(record) {
            Ok(review) => review,
            Err(e) => {
                tracing::warn!("Skipping record {}: {}", index + 1, e);
                skipped += 1;
                continue;
            }
        };

        match repo.insert(&review).await {
            Ok(()) => imported += 1,
            Err(e) => {
                tracing::warn!("Skipping review {}: {}", review.id, e);
                skipped += 1;
            }
        }
    }

    println!("  {} Imported {} reviews", style("✓").green(), imported);
    if skipped > 0 {
        println!("  {} Skipped {} records", style("!").yellow(), skipped);
    }

    ctx.close();
    Ok(())
}

/// Split file contents into JSON records.
fn parse_records(contents: &str) -> anyhow::Result<Vec<Value>> {
    let trimmed = contents.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| anyhow::anyhow!("Invalid JSON on line {}: {}", i + 1, e))
        })
        .collect()
}

/// Build a review from one exported document.
fn review_from_value(value: Value) -> anyhow::Result<Review> {
    let Value::Object(fields) = unwrap_extended(value) else {
        anyhow::bail!("record is not a JSON object");
    };

    let mut fields: Map<String, Value> = fields
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .collect();

    for key in TEXT_FIELDS {
        if let Some(v) = fields.get_mut(*key) {
            if !v.is_string() {
                *v = Value::String(v.to_string());
            }
        }
    }

    if !fields.contains_key("_id") {
        fields.insert(
            "_id".to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
    }

    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Replace extended JSON wrappers (`$oid`, `$date`, `$numberInt`, ...)
/// with plain values.
fn unwrap_extended(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some((key, inner)) = map.iter().next() {
                    if let Some(plain) = unwrap_wrapper(key, inner) {
                        return plain;
                    }
                }
            }
            Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, unwrap_extended(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(unwrap_extended).collect()),
        other => other,
    }
}

fn unwrap_wrapper(key: &str, inner: &Value) -> Option<Value> {
    match key {
        "$oid" => inner.as_str().map(|s| Value::String(s.to_string())),
        "$date" => date_value(inner),
        "$numberInt" | "$numberLong" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from),
        "$numberDouble" | "$numberDecimal" => inner
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .map(Value::from),
        _ => None,
    }
}

/// `$date` holds an ISO string, epoch millis, or `{"$numberLong": "..."}`.
fn date_value(inner: &Value) -> Option<Value> {
    let parsed = match inner {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::Object(_) => unwrap_extended(inner.clone())
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }?;

    Some(Value::String(
        parsed.to_rfc3339_opts(SecondsFormat::Micros, true),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReviewerName, PLACEHOLDER};
    use serde_json::json;

    #[test]
    fn test_parse_array_and_lines() {
        let array = parse_records(r#" [{"Review": "a"}, {"Review": "b"}]"#).unwrap();
        assert_eq!(array.len(), 2);

        let lines = parse_records("{\"Review\": \"a\"}\n\n{\"Review\": \"b\"}\n").unwrap();
        assert_eq!(lines.len(), 2);

        let err = parse_records("{\"Review\": \"a\"}\n{oops").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_mongoexport_relaxed_record() {
        let review = review_from_value(json!({
            "_id": {"$oid": "65f1c2a9e4b0a1b2c3d4e5f6"},
            "Tourist_Attraction": "Wat Arun",
            "Tourist_Attraction_Category": "Religious Place",
            "Name": "Somchai",
            "Review": "Stunning at sunset",
            "Rating": 5,
            "label": "Positive",
            "Emoji": "😍",
            "Emoji_Label": 3,
            "Aspect": "Scenery",
            "CreateAt": {"$date": "2024-03-13T15:04:05.123Z"}
        }))
        .unwrap();

        assert_eq!(review.id, "65f1c2a9e4b0a1b2c3d4e5f6");
        assert_eq!(review.rating, "5");
        assert_eq!(review.emoji_label, 3.0);
        assert_eq!(review.name, ReviewerName::Text("Somchai".to_string()));
        assert_eq!(review.thai_name, PLACEHOLDER);
        assert_eq!(
            review.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "2024-03-13T15:04:05.123Z"
        );
    }

    #[test]
    fn test_mongoexport_canonical_record() {
        let review = review_from_value(json!({
            "_id": {"$oid": "abc"},
            "Review": "ok",
            "Emoji_Label": {"$numberInt": "2"},
            "CreatedAt": {"$date": {"$numberLong": "1700000000000"}},
            "Name": null
        }))
        .unwrap();

        assert_eq!(review.emoji_label, 2.0);
        assert_eq!(review.created_at.timestamp(), 1_700_000_000);
        assert_eq!(review.name, ReviewerName::default());
    }

    #[test]
    fn test_missing_id_generated() {
        let review = review_from_value(json!({"Review": "no id"})).unwrap();
        assert!(uuid::Uuid::parse_str(&review.id).is_ok());
        assert!(review_from_value(json!(["not", "an", "object"])).is_err());
    }
}
