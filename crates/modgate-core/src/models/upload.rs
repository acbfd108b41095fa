//! Upload input and modality detection result.

use bytes::Bytes;

/// A raw upload as received from any transport (multipart, WebSocket
/// buffer, file read). Immutable for the lifetime of one pipeline
/// invocation; decoded artifacts derived from it are released when the
/// invocation ends.
#[derive(Debug, Clone)]
pub struct Upload {
    pub data: Bytes,
    pub filename: String,
    pub user_id: Option<String>,
}

impl Upload {
    pub fn new(data: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn byte_size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn extension(&self) -> String {
        self.filename
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.filename)
            .unwrap_or("")
            .to_lowercase()
    }
}

/// Media class of an upload, derived from sniffed content first and the
/// declared extension as a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedModality {
    Text,
    Audio,
    Image,
    Video,
    Document,
    Archive,
    Binary,
}

impl DetectedModality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedModality::Text => "text",
            DetectedModality::Audio => "audio",
            DetectedModality::Image => "image",
            DetectedModality::Video => "video",
            DetectedModality::Document => "document",
            DetectedModality::Archive => "archive",
            DetectedModality::Binary => "binary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_last_component() {
        let upload = Upload::new(Bytes::from_static(b"x"), "Report.Final.PDF");
        assert_eq!(upload.extension(), "pdf");
    }

    #[test]
    fn extension_empty_when_filename_has_no_dot() {
        let upload = Upload::new(Bytes::from_static(b"x"), "README");
        assert_eq!(upload.extension(), "");
    }
}
