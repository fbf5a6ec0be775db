//! Serialization of finished documents to the output directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ConvertError;

/// Extension of every written document.
pub const OUTPUT_EXTENSION: &str = "json";

/// Render a document as pretty JSON with 2-space indentation.
pub fn to_pretty_json(doc: &Value, identifier: &str) -> Result<String, ConvertError> {
    serde_json::to_string_pretty(doc).map_err(|source| ConvertError::Serialization {
        identifier: identifier.to_string(),
        source,
    })
}

/// Path a document with the given identifier is written to.
pub fn document_path(output_dir: &Path, identifier: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", identifier, OUTPUT_EXTENSION))
}

/// Serialize `doc` and write it to `<output_dir>/<identifier>.json`.
///
/// Returns the path written.
pub fn write_document(
    output_dir: &Path,
    identifier: &str,
    doc: &Value,
) -> Result<PathBuf, ConvertError> {
    let json = to_pretty_json(doc, identifier)?;
    let path = document_path(output_dir, identifier);

    if path.exists() {
        tracing::warn!("Overwriting existing {}", path.display());
    }

    fs::write(&path, json).map_err(|source| ConvertError::Write {
        identifier: identifier.to_string(),
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// Delete `dir` if it exists and recreate it empty.
///
/// This is destructive: everything under `dir` is removed.
pub fn reset_output_dir<P: AsRef<Path>>(dir: P) -> Result<(), ConvertError> {
    let dir = dir.as_ref();
    let wrap = |source: io::Error| ConvertError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };

    if dir.exists() {
        fs::remove_dir_all(dir).map_err(wrap)?;
    }
    fs::create_dir_all(dir).map_err(wrap)?;

    tracing::info!("Reset output directory {}", dir.display());
    Ok(())
}

/// True when `dir` exists and has at least one entry.
pub fn dir_has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let json = to_pretty_json(&json!({"identifier": ["MMP1"]}), "MMP1").unwrap();

        assert_eq!(json, "{\n  \"identifier\": [\n    \"MMP1\"\n  ]\n}");
    }

    #[test]
    fn test_write_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({"@context": "http://schema.org", "identifier": ["MMP1"]});

        let path = write_document(dir.path(), "MMP1", &doc).unwrap();

        assert_eq!(path, dir.path().join("MMP1.json"));
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, doc);
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");

        let err = write_document(&missing, "MMP1", &json!({})).unwrap_err();
        assert!(matches!(err, ConvertError::Write { ref identifier, .. } if identifier == "MMP1"));
    }

    #[test]
    fn test_reset_output_dir_clears_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("bioschemas");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("stale.json"), "{}").unwrap();
        assert!(dir_has_entries(&out));

        reset_output_dir(&out).unwrap();

        assert!(out.is_dir());
        assert!(!dir_has_entries(&out));
    }

    #[test]
    fn test_reset_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b");

        reset_output_dir(&out).unwrap();

        assert!(out.is_dir());
    }
}
