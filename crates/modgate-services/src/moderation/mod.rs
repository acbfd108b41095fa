//! The moderation pipeline: scorers, modality dispatch and the violation
//! gate.

pub mod gate;
pub mod pipeline;
pub mod text;
pub mod transcriber;
pub mod visual;

use modgate_core::models::ToxicityScore;

/// The single score-combination policy, applied at every call site that
/// holds both a local-classifier and a remote-judge score: the unweighted
/// mean when both computed, the one computed value when only one is, and
/// `Unavailable` when neither is. Sentinels never contribute to the mean.
pub fn combine_scores(local: ToxicityScore, remote: ToxicityScore) -> ToxicityScore {
    match (local.value(), remote.value()) {
        (Some(a), Some(b)) => ToxicityScore::computed((a + b) / 2.0),
        (Some(a), None) => ToxicityScore::computed(a),
        (None, Some(b)) => ToxicityScore::computed(b),
        (None, None) => ToxicityScore::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_computed_yields_unweighted_mean() {
        let combined = combine_scores(ToxicityScore::computed(0.9), ToxicityScore::computed(0.2));
        assert_eq!(combined, ToxicityScore::Computed(0.55));
    }

    #[test]
    fn single_computed_score_is_used_alone() {
        assert_eq!(
            combine_scores(ToxicityScore::computed(0.7), ToxicityScore::Unavailable),
            ToxicityScore::Computed(0.7)
        );
        assert_eq!(
            combine_scores(ToxicityScore::ParseFailed, ToxicityScore::computed(0.3)),
            ToxicityScore::Computed(0.3)
        );
    }

    #[test]
    fn no_computed_scores_yields_unavailable() {
        assert_eq!(
            combine_scores(ToxicityScore::Unavailable, ToxicityScore::ParseFailed),
            ToxicityScore::Unavailable
        );
    }

    #[test]
    fn a_parse_failure_is_not_averaged_as_a_number() {
        // The -1 wire sentinel must never drag a real score down.
        let combined = combine_scores(ToxicityScore::computed(0.8), ToxicityScore::ParseFailed);
        assert_eq!(combined, ToxicityScore::Computed(0.8));
    }
}
