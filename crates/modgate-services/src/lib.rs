pub mod moderation;
pub mod services;
pub mod test_helpers;

pub use moderation::gate::ViolationGate;
pub use moderation::pipeline::ModalityPipeline;
pub use moderation::text::{TextScores, TextToxicityScorer};
pub use moderation::transcriber::Transcriber;
pub use moderation::visual::{VideoAnalyzer, VisualToxicityScorer};
pub use services::classifier::{HttpTextClassifier, TextClassifier};
pub use services::openai::OpenAiService;
pub use services::translate::{LibreTranslateService, TranslationProvider};
pub use services::{ChatJudge, SpeechToText};
