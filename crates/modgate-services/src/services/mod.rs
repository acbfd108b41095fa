//! Remote collaborator contracts and their HTTP implementations.

pub mod classifier;
pub mod openai;
pub mod translate;

pub use classifier::{HttpTextClassifier, TextClassifier};
pub use openai::OpenAiService;
pub use translate::{LibreTranslateService, TranslationProvider};

use anyhow::Result;

/// A language-model judge reachable over chat completions. The first
/// choice's content is authoritative; empty or malformed responses surface
/// as errors for the caller to degrade on.
#[async_trait::async_trait]
pub trait ChatJudge: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Vision-capable completion: text instruction plus inline images.
    async fn complete_with_images(
        &self,
        system: &str,
        user: &str,
        images: &[Vec<u8>],
    ) -> Result<String>;
}

/// Speech-to-text collaborator. Callers are responsible for respecting the
/// upstream payload-size ceiling before sending.
#[async_trait::async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, wav: Vec<u8>) -> Result<String>;
}
