//! PDF and word-processor document extraction.

use std::io::{Cursor, Read};

use quick_xml::events::Event;

pub const SCANNED_PDF_SENTINEL: &str =
    "PDF document with no extractable text (possibly scanned document)";

/// Per-page PDF text, concatenated with newline separators. A document
/// whose pages all yield empty text is reported as a likely scanned image.
pub fn extract_pdf(data: &[u8]) -> String {
    let doc = match lopdf::Document::load_mem(data) {
        Ok(doc) => doc,
        Err(e) => return format!("PDF document that could not be parsed: {}", e),
    };

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        if let Ok(page_text) = doc.extract_text(&[*page_number]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }

    if text.trim().is_empty() {
        return SCANNED_PDF_SENTINEL.to_string();
    }
    text
}

/// DOCX paragraph text joined by newlines. DOCX is a ZIP container; the
/// body lives in `word/document.xml` with runs of text under `w:t` and
/// paragraph boundaries at `w:p`.
pub fn extract_docx(data: &[u8]) -> String {
    match read_docx_paragraphs(data) {
        Ok(paragraphs) => paragraphs.join("\n"),
        Err(e) => format!("Word document that could not be parsed: {}", e),
    }
}

fn read_docx_paragraphs(data: &[u8]) -> anyhow::Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(ref e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::End(ref e) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Event::Text(e) if in_text => {
                current.push_str(&e.unescape().unwrap_or_default());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }
    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with_body(body_xml: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::FileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            writer
                .write_all(
                    format!(
                        r#"<?xml version="1.0"?><w:document><w:body>{}</w:body></w:document>"#,
                        body_xml
                    )
                    .as_bytes(),
                )
                .unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn docx_paragraphs_join_with_newlines() {
        let data = docx_with_body(
            "<w:p><w:r><w:t>first paragraph</w:t></w:r></w:p>\
             <w:p><w:r><w:t>second </w:t></w:r><w:r><w:t>paragraph</w:t></w:r></w:p>",
        );
        assert_eq!(extract_docx(&data), "first paragraph\nsecond paragraph");
    }

    #[test]
    fn broken_docx_yields_placeholder() {
        let text = extract_docx(b"PK\x03\x04 not actually a zip");
        assert!(text.starts_with("Word document that could not be parsed"));
    }

    #[test]
    fn empty_pdf_bytes_yield_placeholder() {
        let text = extract_pdf(b"not a pdf at all");
        assert!(text.starts_with("PDF document that could not be parsed"));
    }
}
