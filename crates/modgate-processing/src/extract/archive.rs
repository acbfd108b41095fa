//! ZIP/JAR archive listing.

use std::io::Cursor;

/// Maximum number of archive entry names listed.
pub const MAX_ZIP_ENTRIES: usize = 100;

const ENTRIES_TRUNCATED_MARKER: &str = "... (additional entries not shown)";

/// List archive entry names, capped at [`MAX_ZIP_ENTRIES`].
pub fn extract_zip(data: &[u8]) -> String {
    let mut archive = match zip::ZipArchive::new(Cursor::new(data)) {
        Ok(archive) => archive,
        Err(e) => return format!("ZIP archive that could not be parsed: {}", e),
    };

    let total = archive.len();
    let mut names = Vec::with_capacity(total.min(MAX_ZIP_ENTRIES));
    for i in 0..total.min(MAX_ZIP_ENTRIES) {
        match archive.by_index(i) {
            Ok(entry) => names.push(entry.name().to_string()),
            Err(e) => names.push(format!("<unreadable entry: {}>", e)),
        }
    }
    if total > MAX_ZIP_ENTRIES {
        names.push(ENTRIES_TRUNCATED_MARKER.to_string());
    }

    format!("ZIP archive containing:\n{}", names.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn zip_with_entries(count: usize) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::FileOptions::default();
            for i in 0..count {
                writer.start_file(format!("entry_{:03}.txt", i), options).unwrap();
                writer.write_all(b"x").unwrap();
            }
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn small_archive_lists_all_entries() {
        let text = extract_zip(&zip_with_entries(3));
        assert!(text.starts_with("ZIP archive containing:"));
        assert!(text.contains("entry_000.txt"));
        assert!(text.contains("entry_002.txt"));
        assert!(!text.contains(ENTRIES_TRUNCATED_MARKER));
    }

    #[test]
    fn oversized_archive_is_capped_with_marker() {
        let text = extract_zip(&zip_with_entries(MAX_ZIP_ENTRIES + 5));
        let lines: Vec<&str> = text.lines().collect();
        // Header + 100 entries + marker.
        assert_eq!(lines.len(), 1 + MAX_ZIP_ENTRIES + 1);
        assert_eq!(*lines.last().unwrap(), ENTRIES_TRUNCATED_MARKER);
    }

    #[test]
    fn non_zip_bytes_yield_placeholder() {
        let text = extract_zip(b"definitely not a zip");
        assert!(text.starts_with("ZIP archive that could not be parsed"));
    }
}
