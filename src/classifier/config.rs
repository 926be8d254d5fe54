//! Sentiment classifier connection settings.

use serde::{Deserialize, Serialize};

/// Configuration for the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, prefer::FromValue)]
pub struct ClassifierConfig {
    /// Base URL of the prediction service
    #[serde(default = "default_endpoint")]
    #[prefer(default = "http://localhost:9000")]
    pub endpoint: String,
    /// Path of the predict route, appended to the endpoint
    #[serde(default = "default_predict_path")]
    #[prefer(default = "/predict")]
    pub predict_path: String,
    /// Upper bound on one classification call, in seconds
    #[serde(default = "default_timeout_secs")]
    #[prefer(default = "20")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:9000".to_string()
}

fn default_predict_path() -> String {
    "/predict".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            predict_path: default_predict_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClassifierConfig {
    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `CLASSIFIER_URL`: base URL of the prediction service
    /// - `CLASSIFIER_PREDICT_PATH`: predict route path
    /// - `CLASSIFIER_TIMEOUT_SECS`: call timeout in seconds
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("CLASSIFIER_URL") {
            self.endpoint = val;
        }
        if let Ok(val) = std::env::var("CLASSIFIER_PREDICT_PATH") {
            self.predict_path = val;
        }
        if let Ok(val) = std::env::var("CLASSIFIER_TIMEOUT_SECS") {
            match val.parse() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid CLASSIFIER_TIMEOUT_SECS={}", val),
            }
        }
        self
    }

    /// Full URL of the predict route.
    pub fn predict_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.predict_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
