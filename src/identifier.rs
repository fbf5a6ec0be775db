//! Selection of the output file name from a document's identifiers.

use serde_json::Value;

use crate::error::ConvertError;

pub const DEFAULT_IDENTIFIER_FIELD: &str = "identifier";

pub const DEFAULT_IDENTIFIER_PREFIX: &str = "MMP";

/// Characters that would let an identifier point outside the output directory.
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// Find the first identifier starting with `prefix` and return it as a file stem.
///
/// The identifier field may hold an array of strings or a single string.
/// Trailing whitespace is trimmed; nothing else about the entry changes.
///
/// # Errors
/// [`ConvertError::IdentifierNotFound`] when no entry matches, and
/// [`ConvertError::InvalidIdentifier`] when the matching entry contains a
/// path separator. `record` is only used to label the error.
pub fn extract_identifier(
    doc: &Value,
    field: &str,
    prefix: &str,
    record: usize,
) -> Result<String, ConvertError> {
    let candidates: Vec<&str> = match doc.get(field) {
        Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_str()).collect(),
        Some(Value::String(s)) => vec![s.as_str()],
        _ => Vec::new(),
    };

    let identifier = candidates
        .iter()
        .find(|id| id.starts_with(prefix))
        .map(|id| id.trim_end())
        .ok_or_else(|| ConvertError::IdentifierNotFound {
            record,
            prefix: prefix.to_string(),
            found: candidates.iter().map(|s| s.to_string()).collect(),
        })?;

    if identifier.contains(PATH_SEPARATORS) {
        return Err(ConvertError::InvalidIdentifier {
            record,
            identifier: identifier.to_string(),
        });
    }

    Ok(identifier.to_string())
}
