//! Content extraction: raw bytes + declared filename to a bounded textual
//! summary.
//!
//! Every branch returns a result. Format-specific parse failures become
//! descriptive placeholder text; nothing here errors out to the caller.

mod archive;
mod document;
mod structured;

use modgate_core::models::ExtractionResult;

/// Length cap for extracted document text, in characters.
pub const DOCUMENT_TEXT_CAP: usize = 10_000;
/// Sample size used when probing unknown binaries for readable text.
pub const BINARY_SAMPLE_BYTES: usize = 8192;
pub const TRUNCATION_MARKER: &str = "... (content truncated)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Pdf,
    Docx,
    Csv,
    Json,
    Xml,
    Zip,
    Text,
    Binary,
}

pub struct ContentExtractor;

impl ContentExtractor {
    /// Extract a best-effort textual summary. Content sniffing decides the
    /// format; the declared extension is consulted only when sniffing is
    /// inconclusive.
    pub fn extract(data: &[u8], filename: &str) -> ExtractionResult {
        let extension = filename
            .rsplit('.')
            .next()
            .filter(|ext| *ext != filename)
            .unwrap_or("")
            .to_lowercase();

        let (format, mime_type) = match infer::get(data) {
            Some(kind) => (
                format_from_mime(kind.mime_type()),
                kind.mime_type().to_string(),
            ),
            None => (
                format_from_extension(&extension),
                super::detect::detect_modality(data, &extension).1,
            ),
        };

        tracing::debug!(
            filename = %filename,
            mime_type = %mime_type,
            format = ?format,
            byte_size = data.len(),
            "Extracting content"
        );

        let text = match format {
            Format::Pdf => document::extract_pdf(data),
            Format::Docx => document::extract_docx(data),
            Format::Csv => structured::extract_csv(data),
            Format::Json => structured::extract_json(data),
            Format::Xml => structured::extract_xml(data),
            Format::Zip => archive::extract_zip(data),
            Format::Text => String::from_utf8_lossy(data).into_owned(),
            Format::Binary => {
                return binary_fallback(data, &mime_type);
            }
        };

        let (text, truncated) = cap_text(text);
        ExtractionResult {
            text,
            mime_type,
            byte_size: data.len() as u64,
            truncated,
        }
    }
}

fn format_from_mime(mime: &str) -> Format {
    if mime.starts_with("text/") {
        if mime == "text/csv" {
            return Format::Csv;
        }
        return Format::Text;
    }
    match mime {
        "application/pdf" => Format::Pdf,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        | "application/msword" => Format::Docx,
        "application/json" => Format::Json,
        "application/xml" => Format::Xml,
        "application/zip" | "application/jar" | "application/java-archive" => Format::Zip,
        _ => Format::Binary,
    }
}

fn format_from_extension(extension: &str) -> Format {
    match extension {
        "pdf" => Format::Pdf,
        "doc" | "docx" => Format::Docx,
        "csv" => Format::Csv,
        "json" => Format::Json,
        "xml" => Format::Xml,
        "zip" | "jar" => Format::Zip,
        "txt" | "md" | "html" | "css" | "js" => Format::Text,
        _ => Format::Binary,
    }
}

/// Cap extracted text at [`DOCUMENT_TEXT_CAP`] characters, appending the
/// truncation marker when anything was dropped.
fn cap_text(text: String) -> (String, bool) {
    if text.chars().count() <= DOCUMENT_TEXT_CAP {
        return (text, false);
    }
    let mut capped: String = text.chars().take(DOCUMENT_TEXT_CAP).collect();
    capped.push_str(TRUNCATION_MARKER);
    (capped, true)
}

/// Unknown binaries: decode the first 8 KiB and keep it if it contains any
/// readable text, otherwise report an opaque blob with type and size.
fn binary_fallback(data: &[u8], mime_type: &str) -> ExtractionResult {
    let sample_len = data.len().min(BINARY_SAMPLE_BYTES);
    let sample = String::from_utf8_lossy(&data[..sample_len]);

    if sample.chars().any(|c| c.is_alphabetic()) {
        return ExtractionResult {
            text: format!("{}{}", sample, TRUNCATION_MARKER),
            mime_type: mime_type.to_string(),
            byte_size: data.len() as u64,
            truncated: true,
        };
    }

    ExtractionResult {
        text: format!(
            "Binary file of type {} with size {} bytes",
            mime_type,
            data.len()
        ),
        mime_type: mime_type.to_string(),
        byte_size: data.len() as u64,
        truncated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_pretty_printed_not_raw() {
        let result = ContentExtractor::extract(br#"{"a":1}"#, "payload.json");
        let expected = serde_json::to_string_pretty(
            &serde_json::from_str::<serde_json::Value>(r#"{"a":1}"#).unwrap(),
        )
        .unwrap();
        assert_eq!(result.text, expected);
        assert_eq!(result.mime_type, "application/json");
        assert_eq!(result.byte_size, 7);
    }

    #[test]
    fn invalid_json_falls_back_to_raw_text() {
        let result = ContentExtractor::extract(b"{not json", "broken.json");
        assert_eq!(result.text, "{not json");
    }

    #[test]
    fn plain_text_is_decoded_lossily() {
        let mut data = b"hello ".to_vec();
        data.push(0xFF);
        data.extend_from_slice(b" world");
        let result = ContentExtractor::extract(&data, "note.txt");
        assert!(result.text.starts_with("hello "));
        assert!(result.text.contains('\u{FFFD}'));
        assert!(result.text.ends_with(" world"));
    }

    #[test]
    fn long_document_text_is_capped_with_marker() {
        let body = "a".repeat(DOCUMENT_TEXT_CAP + 500);
        let result = ContentExtractor::extract(body.as_bytes(), "big.txt");
        assert!(result.truncated);
        assert!(result.text.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            result.text.chars().count(),
            DOCUMENT_TEXT_CAP + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn alphabetic_binary_sample_is_kept_as_truncated_text() {
        let mut data = vec![0u8; 16];
        data.extend_from_slice(b"readable words inside");
        data.resize(BINARY_SAMPLE_BYTES + 100, 0);
        let result = ContentExtractor::extract(&data, "mystery.dat");
        assert!(result.truncated);
        assert!(result.text.contains("readable words inside"));
        assert!(result.text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn opaque_binary_reports_type_and_size() {
        let data = vec![0u8, 1, 2, 3, 4, 5];
        let result = ContentExtractor::extract(&data, "blob.bin");
        assert_eq!(
            result.text,
            "Binary file of type application/octet-stream with size 6 bytes"
        );
        assert!(!result.truncated);
    }

    #[test]
    fn corrupt_pdf_never_panics() {
        let result = ContentExtractor::extract(b"%PDF-1.4 garbage", "broken.pdf");
        assert!(!result.text.is_empty());
        assert_eq!(result.mime_type, "application/pdf");
    }
}
