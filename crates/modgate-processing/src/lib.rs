pub mod audio;
pub mod detect;
pub mod extract;
pub mod video;

pub use audio::{AudioNormalizer, NormalizedAudio};
pub use detect::detect_modality;
pub use extract::ContentExtractor;
pub use video::{select_representative, FrameSampler, VideoParts};
