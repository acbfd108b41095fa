//! Tagged toxicity score.
//!
//! "Could not be computed" and "computation failed, assume moderate" are
//! different facts and must stay distinguishable internally, even though
//! both collapse to a numeric sentinel on the wire (-1.0 and 0.5
//! respectively). Call sites match exhaustively; nothing compares against
//! the magic numbers.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToxicityScore {
    /// Scored successfully; value is in [0.0, 1.0].
    Computed(f32),
    /// A pipeline stage failed (remote outage, oversized input, decode
    /// error); downstream consumers should treat the content as uncertain.
    Unavailable,
    /// The judge answered but its answer did not parse as a number.
    ParseFailed,
}

impl ToxicityScore {
    /// Build a computed score, clamping into [0.0, 1.0].
    pub fn computed(value: f32) -> Self {
        ToxicityScore::Computed(value.clamp(0.0, 1.0))
    }

    /// Parse a judge's free-text numeric reply. Anything that is not a
    /// float yields `ParseFailed`, never a default masquerading as real.
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f32>() {
            Ok(v) => ToxicityScore::computed(v),
            Err(_) => ToxicityScore::ParseFailed,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, ToxicityScore::Computed(_))
    }

    pub fn value(&self) -> Option<f32> {
        match self {
            ToxicityScore::Computed(v) => Some(*v),
            ToxicityScore::Unavailable | ToxicityScore::ParseFailed => None,
        }
    }

    /// Numeric representation for responses and legacy consumers.
    /// `Unavailable` maps to the moderate default 0.5, `ParseFailed` to the
    /// -1.0 "uncomputable" sentinel.
    pub fn wire_value(&self) -> f32 {
        match self {
            ToxicityScore::Computed(v) => *v,
            ToxicityScore::Unavailable => 0.5,
            ToxicityScore::ParseFailed => -1.0,
        }
    }

    /// Stable state label surfaced in responses for auditability.
    pub fn state(&self) -> &'static str {
        match self {
            ToxicityScore::Computed(_) => "computed",
            ToxicityScore::Unavailable => "unavailable",
            ToxicityScore::ParseFailed => "parse_failed",
        }
    }
}

impl Serialize for ToxicityScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.wire_value())
    }
}
