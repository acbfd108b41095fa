//! Local toxicity classifier sidecar.
//!
//! The classifier (a toxic-bert style model served next to the gateway)
//! returns a confidence score in [0, 1] plus a label for the dominant
//! class.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[async_trait::async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<(f32, String)>;
}

#[derive(Clone)]
pub struct HttpTextClassifier {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    score: f32,
    label: String,
}

impl HttpTextClassifier {
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to build HTTP client, using default");
                reqwest::Client::default()
            });
        Self { url, client }
    }
}

#[async_trait::async_trait]
impl TextClassifier for HttpTextClassifier {
    async fn classify(&self, text: &str) -> Result<(f32, String)> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .context("Failed to send classification request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Classification failed: {} - {}", status, body));
        }

        let classified: ClassifyResponse = response
            .json()
            .await
            .context("Failed to parse classification response")?;
        Ok((classified.score.clamp(0.0, 1.0), classified.label))
    }
}
