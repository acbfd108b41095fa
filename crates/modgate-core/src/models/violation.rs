//! Recorded moderation violations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Content class stored alongside a violation. Audio covers both uploaded
/// files and streamed buffers; everything that went through file analysis
/// is recorded as `File`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Audio,
    File,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Audio => "audio",
            ContentType::File => "file",
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentType::Text),
            "audio" => Ok(ContentType::Audio),
            "file" => Ok(ContentType::File),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// An append-only record of a scoring result that exceeded the active
/// threshold. Never mutated or deleted by this service.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Violation {
    pub id: Uuid,
    pub user_id: String,
    pub content_type: ContentType,
    pub content_summary: String,
    pub score: f32,
    pub recorded_at: DateTime<Utc>,
}
