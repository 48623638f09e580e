//! HTTP client for the prediction service.
//!
//! The Rust counterpart of the form UI: serializes a [`PatientRecord`] into
//! the exact JSON shape the service expects, issues the POST, and turns every
//! transport or service failure into a typed, human-readable error instead of
//! a panic.

use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::error::ClientError;
use crate::record::{round2, PatientRecord, PredictionResult};

/// Client for the prediction service.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL of the service.
    base_url: String,
}

impl PredictionClient {
    /// Create a new client for the given base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::RequestFailed {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from application configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(&config.api_url, Duration::from_millis(config.http_timeout_ms))
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a record to `POST /predire` and decode the result.
    ///
    /// A non-success status surfaces as [`ClientError::Api`] carrying the raw
    /// body, so the service's `erreur` payload reaches the caller verbatim.
    pub async fn predict(&self, record: &PatientRecord) -> Result<PredictionResult, ClientError> {
        let url = format!("{}/predire", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ClientError::RequestFailed {
            url,
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Human-readable label for a class prediction.
pub fn label_text(prediction: i64) -> &'static str {
    if prediction == 1 {
        "Diabétique"
    } else {
        "Non diabétique"
    }
}

/// Probability rendered as a percentage, rounded to two decimals.
pub fn probability_percent(probability: f64) -> f64 {
    round2(probability * 100.0)
}
