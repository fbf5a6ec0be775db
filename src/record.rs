//! Record nodes and the flattener that reduces them to flat field maps.
//!
//! A [`RecordNode`] is one sample's subtree as handed over by a record
//! source. [`flatten`] turns it into a [`FlatRecord`], the name -> value
//! lookup table the JSON-LD builder resolves its mapping against.

use indexmap::IndexMap;

/// Suffix marking fields that are intentionally absent upstream.
pub const MISSING_SUFFIX: &str = "missing";

/// Suffix of the synthesized field holding a child's `url` attribute.
pub const URL_SUFFIX: &str = "_url";

/// One child element of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub name: String,
    pub url: Option<String>,
    pub text: Option<String>,
}

impl RecordField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A single sample record: its child elements in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordNode {
    fields: Vec<RecordField>,
}

impl RecordNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: RecordField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: RecordField) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }
}

impl FromIterator<RecordField> for RecordNode {
    fn from_iter<I: IntoIterator<Item = RecordField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Flat field-name -> value mapping derived from one record.
///
/// Values keep the raw text as given, including empty strings and elements
/// with no text at all. Lookups through [`FlatRecord::get`] treat both of
/// those as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRecord {
    values: IndexMap<String, Option<String>>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a field to a usable value.
    ///
    /// Returns `None` when the key is missing, when the element had no text,
    /// or when its text is the empty string.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .get(field)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }

    /// Raw stored value, distinguishing "key absent" from "no text".
    pub fn raw(&self, field: &str) -> Option<Option<&str>> {
        self.values.get(field).map(|v| v.as_deref())
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Insert a value. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        self.values.insert(field.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }
}

/// Reduce a record to its flat field map.
///
/// Children whose name ends in [`MISSING_SUFFIX`] are skipped. A child with a
/// `url` attribute also yields a `<name>_url` entry. When a name occurs more
/// than once the last occurrence in document order wins.
pub fn flatten(record: &RecordNode) -> FlatRecord {
    let mut flat = FlatRecord::new();

    for field in record.fields() {
        if field.name.ends_with(MISSING_SUFFIX) {
            continue;
        }

        flat.insert(field.name.clone(), field.text.clone());

        if let Some(url) = &field.url {
            flat.insert(format!("{}{}", field.name, URL_SUFFIX), Some(url.clone()));
        }
    }

    flat
}
