//! OpenAI-compatible judge: chat completions (text and vision) and Whisper
//! transcription.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use super::{ChatJudge, SpeechToText};

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Clone)]
pub struct OpenAiService {
    api_key: String,
    api_base: String,
    chat_model: String,
    transcribe_model: String,
    client: reqwest::Client,
}

// Chat Completions API request/response
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<serde_json::Value>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl OpenAiService {
    pub fn new(
        api_key: String,
        api_base: String,
        chat_model: String,
        transcribe_model: String,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to build HTTP client, using default");
                reqwest::Client::default()
            });
        Self {
            api_key,
            api_base,
            chat_model,
            transcribe_model,
            client,
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn transcriptions_url(&self) -> String {
        format!("{}/audio/transcriptions", self.api_base)
    }

    async fn send_chat(&self, request: ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(self.chat_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            // Surface the provider's own message when the body is parseable.
            if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&body) {
                if let Some(message) = error_json
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                {
                    return Err(anyhow!("Judge API error ({}): {}", status, message));
                }
            }
            return Err(anyhow!("Judge API request failed: {} - {}", status, body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        chat.choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .map(|content| content.trim().to_string())
            .context("Chat completion response contained no content")
    }
}

#[async_trait::async_trait]
impl ChatJudge for OpenAiService {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                json!({"role": "system", "content": system}),
                json!({"role": "user", "content": user}),
            ],
            max_tokens: 1000,
            temperature: 0.1,
        };
        self.send_chat(request).await
    }

    async fn complete_with_images(
        &self,
        system: &str,
        user: &str,
        images: &[Vec<u8>],
    ) -> Result<String> {
        let mut content = vec![json!({"type": "text", "text": user})];
        for image in images {
            let encoded = STANDARD.encode(image);
            content.push(json!({
                "type": "image_url",
                "image_url": {
                    "url": format!("data:image/jpeg;base64,{}", encoded)
                }
            }));
        }

        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                json!({"role": "system", "content": system}),
                json!({"role": "user", "content": content}),
            ],
            max_tokens: 1000,
            temperature: 0.1,
        };
        self.send_chat(request).await
    }
}

#[async_trait::async_trait]
impl SpeechToText for OpenAiService {
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String> {
        let file_part = reqwest::multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .context("Invalid audio MIME type")?;
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.transcribe_model.clone());

        let response = self
            .client
            .post(self.transcriptions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .context("Failed to send transcription request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Transcription failed: {} - {}", status, body));
        }

        let transcription: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;
        Ok(transcription.text)
    }
}
