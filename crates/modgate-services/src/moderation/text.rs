//! Text toxicity scoring: local classifier pass plus remote-judge pass.
//!
//! Both scores are surfaced to the caller; the combination policy lives in
//! [`super::combine_scores`] so every call site applies the same rule.

use std::sync::Arc;

use modgate_core::models::ToxicityScore;

use crate::services::{ChatJudge, TextClassifier, TranslationProvider};

const SCORE_SYSTEM_PROMPT: &str =
    "You are an AI that evaluates content for toxicity. You respond only with a number \
     between 0 and 1.";

fn score_prompt(text: &str) -> String {
    format!(
        "Rate the toxicity of the following text on a scale from 0 to 1, where 0 means \
         completely harmless and 1 means extremely toxic, harmful or inappropriate.\n\n\
         Return ONLY a single decimal number between 0 and 1.\n\nText:\n{}",
        text
    )
}

/// Both scoring passes over one piece of text, plus the translation they
/// were computed on.
#[derive(Debug, Clone)]
pub struct TextScores {
    pub translated: String,
    pub local: ToxicityScore,
    pub label: Option<String>,
    pub remote: ToxicityScore,
}

pub struct TextToxicityScorer {
    judge: Arc<dyn ChatJudge>,
    classifier: Option<Arc<dyn TextClassifier>>,
    translator: Option<Arc<dyn TranslationProvider>>,
    target_language: String,
}

impl TextToxicityScorer {
    pub fn new(
        judge: Arc<dyn ChatJudge>,
        classifier: Option<Arc<dyn TextClassifier>>,
        translator: Option<Arc<dyn TranslationProvider>>,
        target_language: String,
    ) -> Self {
        Self {
            judge,
            classifier,
            translator,
            target_language,
        }
    }

    /// Run both passes. This never fails: each pass degrades independently
    /// to `Unavailable` (service failure) or `ParseFailed` (judge answered
    /// non-numerically), and translation failure falls back to the
    /// original text.
    pub async fn score_text(&self, text: &str) -> TextScores {
        let translated = match &self.translator {
            Some(translator) => match translator.translate(text, &self.target_language).await {
                Ok(translated) => translated,
                Err(e) => {
                    tracing::warn!(error = %e, "Translation failed, scoring original text");
                    text.to_string()
                }
            },
            None => text.to_string(),
        };

        let (local, label) = match &self.classifier {
            Some(classifier) => match classifier.classify(&translated).await {
                Ok((score, label)) => (ToxicityScore::computed(score), Some(label)),
                Err(e) => {
                    tracing::warn!(error = %e, "Local classifier failed");
                    (ToxicityScore::Unavailable, None)
                }
            },
            None => (ToxicityScore::Unavailable, None),
        };

        let remote = match self
            .judge
            .complete(SCORE_SYSTEM_PROMPT, &score_prompt(&translated))
            .await
        {
            Ok(reply) => ToxicityScore::parse(&reply),
            Err(e) => {
                tracing::warn!(error = %e, "Remote judge failed");
                ToxicityScore::Unavailable
            }
        };

        tracing::debug!(
            local = ?local,
            remote = ?remote,
            label = ?label,
            "Text scored"
        );

        TextScores {
            translated,
            local,
            label,
            remote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockClassifier, MockJudge, MockTranslator};

    #[tokio::test]
    async fn both_passes_produce_scores() {
        let scorer = TextToxicityScorer::new(
            Arc::new(MockJudge::replying("0.4")),
            Some(Arc::new(MockClassifier::new(0.8, "toxic"))),
            None,
            "en".to_string(),
        );
        let scores = scorer.score_text("some text").await;
        assert_eq!(scores.local, ToxicityScore::Computed(0.8));
        assert_eq!(scores.remote, ToxicityScore::Computed(0.4));
        assert_eq!(scores.label.as_deref(), Some("toxic"));
    }

    #[tokio::test]
    async fn non_numeric_judge_reply_is_parse_failed() {
        let scorer = TextToxicityScorer::new(
            Arc::new(MockJudge::replying("abc")),
            Some(Arc::new(MockClassifier::new(0.1, "non-toxic"))),
            None,
            "en".to_string(),
        );
        let scores = scorer.score_text("hello").await;
        assert_eq!(scores.remote, ToxicityScore::ParseFailed);
        // Not conflated with a real zero or a moderate default.
        assert_ne!(scores.remote, ToxicityScore::Computed(0.0));
        assert_ne!(scores.remote, ToxicityScore::Unavailable);
    }

    #[tokio::test]
    async fn judge_outage_is_unavailable_not_parse_failed() {
        let scorer = TextToxicityScorer::new(
            Arc::new(MockJudge::failing()),
            None,
            None,
            "en".to_string(),
        );
        let scores = scorer.score_text("hello").await;
        assert_eq!(scores.remote, ToxicityScore::Unavailable);
        assert_eq!(scores.local, ToxicityScore::Unavailable);
    }

    #[tokio::test]
    async fn translation_feeds_the_scoring_passes() {
        let scorer = TextToxicityScorer::new(
            Arc::new(MockJudge::replying("0.0")),
            None,
            Some(Arc::new(MockTranslator::to("translated text"))),
            "en".to_string(),
        );
        let scores = scorer.score_text("texte original").await;
        assert_eq!(scores.translated, "translated text");
    }

    #[tokio::test]
    async fn translation_failure_falls_back_to_original() {
        let scorer = TextToxicityScorer::new(
            Arc::new(MockJudge::replying("0.0")),
            None,
            Some(Arc::new(MockTranslator::failing())),
            "en".to_string(),
        );
        let scores = scorer.score_text("texte original").await;
        assert_eq!(scores.translated, "texte original");
    }
}
