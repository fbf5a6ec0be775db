//! Record sources: where record nodes come from.
//!
//! The [`RecordSource`] trait is the seam between the converter and whatever
//! parses the input. [`XmlRecordSource`] reads a MarRef XML export; any
//! `Vec<RecordNode>` is also a source, which is handy for tests.

use std::fs;
use std::path::PathBuf;

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::ConvertError;
use crate::record::{RecordField, RecordNode};

/// Tag name of the elements that hold one sample each.
pub const RECORD_TAG: &str = "record";

/// Attribute copied into `<name>_url` fields.
pub const URL_ATTRIBUTE: &str = "url";

/// Anything that can hand over the records of one input.
pub trait RecordSource {
    /// Produce all records, in document order.
    ///
    /// # Errors
    /// A failure here is fatal for the whole run.
    fn records(&self) -> Result<Vec<RecordNode>, ConvertError>;

    /// Label used in logs and error messages.
    fn describe(&self) -> String {
        "in-memory records".to_string()
    }
}

impl RecordSource for Vec<RecordNode> {
    fn records(&self) -> Result<Vec<RecordNode>, ConvertError> {
        Ok(self.clone())
    }
}

/// Reads records from a UTF-8 XML file.
#[derive(Debug, Clone)]
pub struct XmlRecordSource {
    path: PathBuf,
}

impl XmlRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for XmlRecordSource {
    fn records(&self) -> Result<Vec<RecordNode>, ConvertError> {
        let bytes = fs::read(&self.path).map_err(|e| ConvertError::Parse {
            path: self.path.clone(),
            reason: format!("failed to read input: {}", e),
        })?;

        let text = String::from_utf8(bytes).map_err(|e| ConvertError::Parse {
            path: self.path.clone(),
            reason: format!("input is not valid UTF-8: {}", e),
        })?;

        parse_records(&text).map_err(|reason| ConvertError::Parse {
            path: self.path.clone(),
            reason,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse XML text and collect every `record` element, however deeply nested.
///
/// Record tags are matched case-insensitively and child names are lowercased,
/// following the HTML-style markup of the MarRef export. Only element
/// children become fields; text, comments and whitespace between them are
/// ignored.
pub fn parse_records(text: &str) -> Result<Vec<RecordNode>, String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut options = ParsingOptions::default();
    options.allow_dtd = true;

    let doc = Document::parse_with_options(text, options).map_err(|e| e.to_string())?;

    let records = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name().eq_ignore_ascii_case(RECORD_TAG))
        .map(|n| record_node(&n))
        .collect();

    Ok(records)
}

fn record_node(node: &Node) -> RecordNode {
    node.children()
        .filter(|c| c.is_element())
        .map(|c| RecordField {
            name: c.tag_name().name().to_lowercase(),
            url: c.attribute(URL_ATTRIBUTE).map(|u| u.to_string()),
            text: direct_text(&c),
        })
        .collect()
}

/// Concatenated text of an element's own text children.
///
/// `None` when the element has no text children at all.
fn direct_text(node: &Node) -> Option<String> {
    let parts: Vec<&str> = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html>
  <body>
    <records>
      <record>
        <biosampleaccession>SAMN001</biosampleaccession>
        <mmpID url="http://example.org/1">MMP00001</mmpID>
        <comments></comments>
        <depthmissing>not provided</depthmissing>
      </record>
      <!-- second sample -->
      <record>
        <mmpid>MMP00002</mmpid>
      </record>
    </records>
  </body>
</html>"#;

    #[test]
    fn test_finds_nested_records() {
        let records = parse_records(SAMPLE).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields().len(), 4);
        assert_eq!(records[1].fields().len(), 1);
    }

    #[test]
    fn test_field_names_text_and_url() {
        let records = parse_records(SAMPLE).unwrap();
        let fields = records[0].fields();

        assert_eq!(fields[1].name, "mmpid");
        assert_eq!(fields[1].text.as_deref(), Some("MMP00001"));
        assert_eq!(fields[1].url.as_deref(), Some("http://example.org/1"));
        assert_eq!(fields[0].url, None);
        assert_eq!(fields[2].name, "comments");
        assert_eq!(fields[2].text, None);
    }

    #[test]
    fn test_byte_order_mark_is_tolerated() {
        let text = format!("\u{feff}{}", "<records><record><a>1</a></record></records>");
        let records = parse_records(&text).unwrap();

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert!(parse_records("<records><record></records>").is_err());
    }

    #[test]
    fn test_missing_file_is_a_parse_error() {
        let source = XmlRecordSource::new("/nonexistent/marref.xml");

        assert!(matches!(source.records(), Err(ConvertError::Parse { .. })));
    }
}
