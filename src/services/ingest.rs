//! Review ingestion.
//!
//! A submitted review is classified once and stored once. Nothing is
//! persisted unless the classifier produced a complete prediction.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classifier::{ClassifierError, SentimentClassifier};
use crate::models::Review;
use crate::repository::{DbError, ReviewRepository};

/// Fields accepted from a client when adding a review.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewSubmission {
    #[serde(rename = "Tourist_Attraction_ThaiName", default)]
    pub thai_name: Option<String>,
    #[serde(rename = "Tourist_Attraction_Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Tourist_Attraction", default)]
    pub attraction: Option<String>,
    #[serde(rename = "Review", default)]
    pub review: Option<String>,
}

/// Reasons an ingestion fails. None of them leave a record behind.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    ClassifierUnavailable(String),
    #[error("{0}")]
    InvalidClassifierResponse(String),
    #[error("Failed to save review: {0}")]
    Store(#[from] DbError),
}

/// Reply body for a stored review.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub success: bool,
    pub review: Review,
    pub sentiment: String,
    pub aspect_stripped: String,
    #[serde(rename = "CreateAt")]
    pub created_at: DateTime<Utc>,
}

impl IngestOutcome {
    fn saved(review: Review) -> Self {
        Self {
            success: true,
            sentiment: review.label.clone(),
            aspect_stripped: review.aspect.clone(),
            created_at: review.created_at,
            review,
        }
    }
}

/// Classifies and stores submitted reviews.
#[derive(Clone)]
pub struct IngestService {
    reviews: ReviewRepository,
    classifier: Arc<dyn SentimentClassifier>,
    timeout: Duration,
}

impl IngestService {
    pub fn new(
        reviews: ReviewRepository,
        classifier: Arc<dyn SentimentClassifier>,
        timeout: Duration,
    ) -> Self {
        Self {
            reviews,
            classifier,
            timeout,
        }
    }

    /// Validate, classify and store one review.
    pub async fn ingest(&self, submission: ReviewSubmission) -> Result<IngestOutcome, IngestError> {
        let text = required(submission.review.as_deref(), "Review")?;
        let category = required(submission.category.as_deref(), "Tourist_Attraction_Category")?;

        let mut review = Review::draft(
            submission.thai_name.as_deref(),
            category,
            submission.attraction.as_deref(),
            text,
        );
        info!(
            "Received review for {} ({})",
            review.attraction, review.category
        );

        let started = Instant::now();
        let raw = match tokio::time::timeout(self.timeout, self.classifier.classify(text, category))
            .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(ClassifierError::InvalidResponse(body))) => {
                return Err(invalid_response(&body));
            }
            Ok(Err(e)) => return Err(IngestError::ClassifierUnavailable(e.to_string())),
            Err(_) => {
                return Err(IngestError::ClassifierUnavailable(
                    ClassifierError::Timeout(self.timeout).to_string(),
                ));
            }
        };
        debug!("Classifier took {}ms", started.elapsed().as_millis());

        let Some(prediction) = raw.validate() else {
            warn!("Rejecting classifier reply: {}", raw.to_json());
            return Err(invalid_response(&raw.to_json()));
        };

        review.emoji = prediction.emoji_text();
        review.emoji_label = prediction.intensity();
        review.label = prediction.sentiment;
        review.aspect = prediction.aspect;
        review.created_at = Utc::now().trunc_subsecs(6);

        self.reviews.insert(&review).await?;
        info!("Saved review {} as {}/{}", review.id, review.label, review.aspect);

        Ok(IngestOutcome::saved(review))
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, IngestError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(IngestError::Validation(format!("{} is required", field))),
    }
}

fn invalid_response(body: &str) -> IngestError {
    IngestError::InvalidClassifierResponse(format!(
        "Incomplete or invalid response from classifier: {}",
        body
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RawPrediction;
    use crate::models::{ReviewerName, PLACEHOLDER};
    use crate::repository::DbContext;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Replies with a fixed JSON body and counts calls.
    struct StubClassifier {
        reply: Value,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SentimentClassifier for StubClassifier {
        async fn classify(&self, _: &str, _: &str) -> Result<RawPrediction, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(self.reply.clone()).unwrap())
        }
    }

    struct SlowClassifier;

    #[async_trait]
    impl SentimentClassifier for SlowClassifier {
        async fn classify(&self, _: &str, _: &str) -> Result<RawPrediction, ClassifierError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(RawPrediction::default())
        }
    }

    struct DownClassifier;

    #[async_trait]
    impl SentimentClassifier for DownClassifier {
        async fn classify(&self, _: &str, _: &str) -> Result<RawPrediction, ClassifierError> {
            Err(ClassifierError::Status {
                status: 503,
                body: "busy".to_string(),
            })
        }
    }

    fn canonical_reply() -> Value {
        json!({
            "review": "The staff were wonderful",
            "sentiment": "Positive",
            "emojis": ["😀", "👍"],
            "emoji_label": 2,
            "Aspect": "service",
            "score": 0.97
        })
    }

    async fn service(classifier: Arc<dyn SentimentClassifier>) -> (IngestService, DbContext, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DbContext::sqlite(&dir.path().join("reviews.db"));
        ctx.init_schema().await.unwrap();
        let service = IngestService::new(ctx.reviews(), classifier, Duration::from_millis(50));
        (service, ctx, dir)
    }

    fn submission(review: &str) -> ReviewSubmission {
        ReviewSubmission {
            thai_name: Some("สวนสัตว์ดุสิต".to_string()),
            category: Some("Zoos".to_string()),
            attraction: Some("Dusit Zoo".to_string()),
            review: Some(review.to_string()),
        }
    }

    #[tokio::test]
    async fn test_canonical_reply_stores_one_review() {
        let stub = Arc::new(StubClassifier {
            reply: canonical_reply(),
            calls: AtomicUsize::new(0),
        });
        let (service, ctx, _dir) = service(stub.clone()).await;

        let outcome = service
            .ingest(submission("The staff were wonderful"))
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.sentiment, "Positive");
        assert_eq!(outcome.aspect_stripped, "service");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);

        let stored = ctx.reviews().list(None).await.unwrap();
        assert_eq!(stored.len(), 1);
        let review = &stored[0];
        assert_eq!(review.label, "Positive");
        assert_eq!(review.emoji, "😀 👍");
        assert_eq!(review.emoji_label, 2.0);
        assert_eq!(review.aspect, "service");
        assert_eq!(review.attraction, "Dusit Zoo");
        assert_eq!(review.name, ReviewerName::default());
        assert_eq!(review.rating, PLACEHOLDER);
        assert_eq!(review, &outcome.review);

        let body = serde_json::to_value(&outcome).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["review"]["Emoji_Label"], json!(2));
        assert_eq!(body["CreateAt"], body["review"]["CreateAt"]);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_before_classifying() {
        let stub = Arc::new(StubClassifier {
            reply: canonical_reply(),
            calls: AtomicUsize::new(0),
        });
        let (service, ctx, _dir) = service(stub.clone()).await;

        let err = service.ingest(submission("   ")).await.unwrap_err();
        assert_eq!(err.to_string(), "Review is required");

        let mut no_category = submission("Nice");
        no_category.category = None;
        let err = service.ingest(no_category).await.unwrap_err();
        assert_eq!(err.to_string(), "Tourist_Attraction_Category is required");

        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ctx.reviews().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_timeout_stores_nothing() {
        let (service, ctx, _dir) = service(Arc::new(SlowClassifier)).await;

        let err = service.ingest(submission("Slow day")).await.unwrap_err();
        assert!(matches!(err, IngestError::ClassifierUnavailable(_)));
        assert_eq!(ctx.reviews().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_incomplete_reply_stores_nothing() {
        let stub = Arc::new(StubClassifier {
            reply: json!({"sentiment": "Positive", "emojis": "😀", "score": 0.5}),
            calls: AtomicUsize::new(0),
        });
        let (service, ctx, _dir) = service(stub).await;

        let err = service.ingest(submission("Hmm")).await.unwrap_err();
        assert!(matches!(err, IngestError::InvalidClassifierResponse(_)));
        assert!(err
            .to_string()
            .starts_with("Incomplete or invalid response from classifier: "));
        assert_eq!(ctx.reviews().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_classifier_error_stores_nothing() {
        let (service, ctx, _dir) = service(Arc::new(DownClassifier)).await;

        let err = service.ingest(submission("Closed")).await.unwrap_err();
        assert!(matches!(err, IngestError::ClassifierUnavailable(_)));
        assert!(err.to_string().contains("503"));
        assert_eq!(ctx.reviews().count().await.unwrap(), 0);
    }
}
