//! Translation collaborator: inputs are translated to a canonical language
//! before scoring, since the scoring models expect consistent input.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[async_trait::async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, text: &str, target: &str) -> Result<String>;
}

/// LibreTranslate-compatible HTTP endpoint.
#[derive(Clone)]
pub struct LibreTranslateService {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl LibreTranslateService {
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
impl TranslationProvider for LibreTranslateService {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({
                "q": text,
                "source": "auto",
                "target": target,
                "format": "text",
            }))
            .send()
            .await
            .context("Failed to send translation request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Translation failed: {} - {}", status, body));
        }

        let translated: TranslateResponse = response
            .json()
            .await
            .context("Failed to parse translation response")?;
        Ok(translated.translated_text)
    }
}
