pub mod score;
pub mod scoring;
pub mod upload;
pub mod violation;

pub use score::ToxicityScore;
pub use scoring::{ExtractionResult, ScoringResult};
pub use upload::{DetectedModality, Upload};
pub use violation::{ContentType, Violation};
