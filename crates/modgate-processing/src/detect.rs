//! Modality detection: content sniffing first, extension fallback second.

use modgate_core::models::DetectedModality;

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv", "json", "xml", "html", "css", "js"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "flac", "aac"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "svg"];
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "webm", "wmv", "flv", "mpeg", "3gp",
];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "jar"];

/// Classify an upload. Sniffed magic bytes win; the declared extension is
/// only consulted when sniffing is inconclusive. Returns the modality and
/// the best-known MIME type.
pub fn detect_modality(data: &[u8], extension: &str) -> (DetectedModality, String) {
    if let Some(kind) = infer::get(data) {
        let mime = kind.mime_type().to_string();
        let modality = modality_from_mime(&mime);
        if modality != DetectedModality::Binary {
            return (modality, mime);
        }
        // Recognized magic but no modality mapping; let the extension refine
        // the class while keeping the sniffed MIME type.
        return (modality_from_extension(extension), mime);
    }

    let modality = modality_from_extension(extension);
    let mime = mime_from_extension(extension);
    (modality, mime)
}

fn modality_from_mime(mime: &str) -> DetectedModality {
    if mime.starts_with("text/") {
        return DetectedModality::Text;
    }
    if mime.starts_with("audio/") {
        return DetectedModality::Audio;
    }
    if mime.starts_with("image/") {
        return DetectedModality::Image;
    }
    if mime.starts_with("video/") {
        return DetectedModality::Video;
    }
    match mime {
        "application/pdf"
        | "application/msword"
        | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            DetectedModality::Document
        }
        "application/zip" | "application/jar" | "application/java-archive" => {
            DetectedModality::Archive
        }
        _ => DetectedModality::Binary,
    }
}

fn modality_from_extension(extension: &str) -> DetectedModality {
    if TEXT_EXTENSIONS.contains(&extension) {
        DetectedModality::Text
    } else if AUDIO_EXTENSIONS.contains(&extension) {
        DetectedModality::Audio
    } else if IMAGE_EXTENSIONS.contains(&extension) {
        DetectedModality::Image
    } else if VIDEO_EXTENSIONS.contains(&extension) {
        DetectedModality::Video
    } else if DOCUMENT_EXTENSIONS.contains(&extension) {
        DetectedModality::Document
    } else if ARCHIVE_EXTENSIONS.contains(&extension) {
        DetectedModality::Archive
    } else {
        DetectedModality::Binary
    }
}

fn mime_from_extension(extension: &str) -> String {
    match extension {
        "txt" | "md" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "html" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "zip" => "application/zip",
        "jar" => "application/java-archive",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal PNG header: sniffing must classify this as an image even when
    // the declared extension claims plain text.
    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn sniffed_content_wins_over_extension() {
        let (modality, mime) = detect_modality(PNG_MAGIC, "txt");
        assert_eq!(modality, DetectedModality::Image);
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn extension_is_the_fallback_for_plain_text() {
        let (modality, mime) = detect_modality(b"hello world", "txt");
        assert_eq!(modality, DetectedModality::Text);
        assert_eq!(mime, "text/plain");
    }

    #[test]
    fn pdf_magic_maps_to_document() {
        let (modality, mime) = detect_modality(b"%PDF-1.7\n...", "bin");
        assert_eq!(modality, DetectedModality::Document);
        assert_eq!(mime, "application/pdf");
    }

    #[test]
    fn unknown_bytes_and_extension_are_binary() {
        let (modality, mime) = detect_modality(&[0u8, 1, 2, 3], "dat");
        assert_eq!(modality, DetectedModality::Binary);
        assert_eq!(mime, "application/octet-stream");
    }

    #[test]
    fn audio_extension_fallback() {
        // Headerless PCM-ish bytes with an audio extension.
        let (modality, _) = detect_modality(&[0u8; 16], "mp3");
        assert_eq!(modality, DetectedModality::Audio);
    }
}
