//! HTTP client for the prediction service.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{ClassifierConfig, ClassifierError, PredictRequest, RawPrediction, SentimentClassifier};

/// Classifier backed by the remote predict route.
pub struct HttpClassifier {
    config: ClassifierConfig,
    client: Client,
}

impl HttpClassifier {
    /// Create a client whose requests are bounded by the configured timeout.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClassifierError::Unavailable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { config, client })
    }

    fn transport_error(&self, e: reqwest::Error) -> ClassifierError {
        if e.is_timeout() {
            ClassifierError::Timeout(self.config.timeout())
        } else {
            ClassifierError::Unavailable(e.to_string())
        }
    }
}

#[async_trait]
impl SentimentClassifier for HttpClassifier {
    async fn classify(
        &self,
        review: &str,
        category: &str,
    ) -> Result<RawPrediction, ClassifierError> {
        let url = self.config.predict_url();
        debug!("Calling classifier at {}", url);

        let started = Instant::now();
        let resp = self
            .client
            .post(&url)
            .json(&PredictRequest { review, category })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        debug!(
            "Classifier replied HTTP {} in {}ms",
            status.as_u16(),
            started.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|_| ClassifierError::InvalidResponse(body))
    }
}
