//! CSV, JSON and XML extraction.

use quick_xml::events::Event;

use super::TRUNCATION_MARKER;

/// Maximum number of CSV data rows rendered before truncation.
pub const MAX_CSV_ROWS: usize = 100;

/// First 100 rows, each rendered as comma-joined fields, with a truncation
/// marker when more rows exist.
pub fn extract_csv(data: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(data);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(decoded.as_bytes());

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        if i >= MAX_CSV_ROWS {
            rows.push(TRUNCATION_MARKER.to_string());
            break;
        }
        match record {
            Ok(record) => rows.push(record.iter().collect::<Vec<_>>().join(",")),
            Err(e) => return format!("CSV file that could not be parsed: {}", e),
        }
    }
    rows.join("\n")
}

/// Stable re-serialization for readability; raw decoded text when the
/// payload is not valid JSON.
pub fn extract_json(data: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(data);
    match serde_json::from_str::<serde_json::Value>(&decoded) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| decoded.into_owned()),
        Err(_) => decoded.into_owned(),
    }
}

/// Pretty-printed reconstruction of the element tree: tag, attributes, text
/// and children, indented two spaces per depth level. Falls back to raw
/// decoded text when the document does not parse.
pub fn extract_xml(data: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(data).into_owned();
    match render_xml_tree(&decoded) {
        Ok(rendered) => rendered,
        Err(_) => decoded,
    }
}

fn render_xml_tree(xml: &str) -> anyhow::Result<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                out.push_str(&" ".repeat(depth * 2));
                out.push('<');
                out.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                for attr in e.attributes().flatten() {
                    out.push(' ');
                    out.push_str(&String::from_utf8_lossy(attr.key.as_ref()));
                    out.push_str("=\"");
                    out.push_str(&attr.unescape_value().unwrap_or_default());
                    out.push('"');
                }
                out.push_str(">\n");
                depth += 1;
            }
            Event::Empty(e) => {
                out.push_str(&" ".repeat(depth * 2));
                out.push('<');
                out.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                for attr in e.attributes().flatten() {
                    out.push(' ');
                    out.push_str(&String::from_utf8_lossy(attr.key.as_ref()));
                    out.push_str("=\"");
                    out.push_str(&attr.unescape_value().unwrap_or_default());
                    out.push('"');
                }
                out.push_str("/>\n");
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                out.push_str(&" ".repeat(depth * 2));
                out.push_str("</");
                out.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                out.push_str(">\n");
            }
            Event::Text(e) => {
                let text = e.unescape().unwrap_or_default();
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push_str(&" ".repeat(depth * 2));
                    out.push_str(trimmed);
                    out.push('\n');
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_over_cap_renders_exactly_100_rows_then_marker() {
        let data: String = (0..150).map(|i| format!("row{},a,b\n", i)).collect();
        let text = extract_csv(data.as_bytes());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), MAX_CSV_ROWS + 1);
        assert_eq!(lines[0], "row0,a,b");
        assert_eq!(lines[MAX_CSV_ROWS - 1], "row99,a,b");
        assert_eq!(lines[MAX_CSV_ROWS], TRUNCATION_MARKER);
    }

    #[test]
    fn csv_under_cap_has_no_marker() {
        let text = extract_csv(b"a,b,c\nd,e,f\n");
        assert_eq!(text, "a,b,c\nd,e,f");
    }

    #[test]
    fn xml_indentation_is_proportional_to_depth() {
        let xml = r#"<root id="1"><child kind="x"><leaf>value</leaf></child></root>"#;
        let text = extract_xml(xml.as_bytes());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"<root id="1">"#);
        assert_eq!(lines[1], r#"  <child kind="x">"#);
        assert_eq!(lines[2], "    <leaf>");
        assert_eq!(lines[3], "      value");
        assert_eq!(lines[4], "    </leaf>");
        assert_eq!(lines[5], "  </child>");
        assert_eq!(lines[6], "</root>");
    }

    #[test]
    fn malformed_xml_falls_back_to_raw_text() {
        let text = extract_xml(b"<root><unclosed></root>");
        assert_eq!(text, "<root><unclosed></root>");
    }

    #[test]
    fn json_object_round_trips_pretty() {
        let text = extract_json(br#"{"a":1,"b":[2,3]}"#);
        assert!(text.contains("\"a\": 1"));
        assert!(text.contains("\"b\": ["));
    }
}
