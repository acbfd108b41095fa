//! Normalized outputs of the scoring pipeline.

use serde::Serialize;

use super::score::ToxicityScore;

/// Best-effort textual summary of an input, produced by content extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub text: String,
    pub mime_type: String,
    pub byte_size: u64,
    pub truncated: bool,
}

/// The one shape every modality branch resolves to. The pipeline guarantees
/// a `ScoringResult` is always produced; failures become descriptive text
/// plus a sentinel score rather than errors.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringResult {
    pub description: String,
    pub toxicity_score: ToxicityScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_score: Option<ToxicityScore>,
    pub mime_type: String,
    pub byte_size: u64,
}

impl ScoringResult {
    pub fn new(
        description: impl Into<String>,
        toxicity_score: ToxicityScore,
        mime_type: impl Into<String>,
        byte_size: u64,
    ) -> Self {
        Self {
            description: description.into(),
            toxicity_score,
            secondary_score: None,
            mime_type: mime_type.into(),
            byte_size,
        }
    }

    pub fn with_secondary(mut self, secondary: ToxicityScore) -> Self {
        self.secondary_score = Some(secondary);
        self
    }
}
