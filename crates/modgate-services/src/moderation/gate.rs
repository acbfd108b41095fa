//! Threshold gate in front of violation persistence.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use modgate_core::models::{ContentType, ToxicityScore, Violation};
use modgate_core::threshold::ThresholdStore;
use modgate_db::ViolationRepository;

/// Stored summaries stay short; full content never lands in the database.
const SUMMARY_MAX_CHARS: usize = 500;

/// Decides whether a scoring result becomes a stored violation.
///
/// The active threshold is read exactly once per decision, so a concurrent
/// admin update cannot produce a torn read within a single decision. Only
/// `Computed` scores can trip the gate; sentinel states never record.
pub struct ViolationGate {
    repo: Arc<dyn ViolationRepository>,
    threshold: Arc<ThresholdStore>,
}

impl ViolationGate {
    pub fn new(repo: Arc<dyn ViolationRepository>, threshold: Arc<ThresholdStore>) -> Self {
        Self { repo, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.get()
    }

    /// Record a violation if `score` is computed and strictly above the
    /// active threshold. Returns whether a violation was recorded.
    /// Persistence failures are logged and swallowed so moderation
    /// responses are never blocked by the database.
    #[tracing::instrument(skip(self, summary), fields(
        user_id = %user_id,
        content_type = %content_type.as_str(),
        score_state = %score.state()
    ))]
    pub async fn maybe_record(
        &self,
        user_id: &str,
        content_type: ContentType,
        summary: &str,
        score: ToxicityScore,
    ) -> bool {
        let threshold = self.threshold.get();

        let value = match score.value() {
            Some(value) if f64::from(value) > threshold => value,
            _ => return false,
        };

        let violation = Violation {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            content_type,
            content_summary: cap_summary(summary),
            score: value,
            recorded_at: Utc::now(),
        };

        match self.repo.record_violation(&violation).await {
            Ok(()) => {
                tracing::warn!(
                    violation_id = %violation.id,
                    score = value,
                    threshold,
                    "Violation recorded"
                );
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to record violation");
                false
            }
        }
    }
}

fn cap_summary(summary: &str) -> String {
    if summary.chars().count() <= SUMMARY_MAX_CHARS {
        return summary.to_string();
    }
    summary.chars().take(SUMMARY_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockViolationRepository;

    fn gate(threshold: f64) -> (ViolationGate, MockViolationRepository, Arc<ThresholdStore>) {
        let repo = MockViolationRepository::new();
        let store = Arc::new(ThresholdStore::new(threshold));
        let gate = ViolationGate::new(Arc::new(repo.clone()), store.clone());
        (gate, repo, store)
    }

    #[tokio::test]
    async fn records_only_above_threshold() {
        let (gate, repo, _) = gate(0.85);

        assert!(
            !gate
                .maybe_record("u1", ContentType::Text, "mild", ToxicityScore::computed(0.85))
                .await
        );
        assert!(
            gate.maybe_record("u1", ContentType::Text, "harsh", ToxicityScore::computed(0.9))
                .await
        );

        let recorded = repo.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].user_id, "u1");
        assert_eq!(recorded[0].content_summary, "harsh");
        assert_eq!(recorded[0].score, 0.9);
    }

    #[tokio::test]
    async fn sentinel_scores_never_record() {
        let (gate, repo, _) = gate(0.1);

        assert!(
            !gate
                .maybe_record("u1", ContentType::Audio, "x", ToxicityScore::Unavailable)
                .await
        );
        assert!(
            !gate
                .maybe_record("u1", ContentType::File, "x", ToxicityScore::ParseFailed)
                .await
        );
        assert!(repo.recorded().is_empty());
    }

    #[tokio::test]
    async fn threshold_update_applies_to_subsequent_decisions() {
        let (gate, repo, store) = gate(0.85);

        assert!(
            !gate
                .maybe_record("u1", ContentType::Text, "x", ToxicityScore::computed(0.5))
                .await
        );

        store.set(0.3);
        assert!(
            gate.maybe_record("u1", ContentType::Text, "x", ToxicityScore::computed(0.5))
                .await
        );
        assert_eq!(repo.recorded().len(), 1);
    }

    #[tokio::test]
    async fn long_summaries_are_capped() {
        let (gate, repo, _) = gate(0.0);
        let long = "a".repeat(2000);

        gate.maybe_record("u1", ContentType::Text, &long, ToxicityScore::computed(0.9))
            .await;

        assert_eq!(repo.recorded()[0].content_summary.len(), SUMMARY_MAX_CHARS);
    }
}
