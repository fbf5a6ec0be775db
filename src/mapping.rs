//! Declarative field mapping from flat records to JSON-LD properties.
//!
//! A [`MappingSpec`] lists the output fields of a document in order. Each
//! field is one of three shapes:
//!
//! ```yaml
//! context: http://schema.org
//! type: [BioChemEntity, Sample]
//! fields:
//!   - kind: list
//!     key: identifier
//!     sources: [biosampleaccession, mmpid]
//!   - kind: scalar
//!     key: name
//!     source: fullscientificname
//!   - kind: additional_property
//!     key: additionalProperty
//!     properties:
//!       - name: Organism
//!         value: organism
//!         value_reference:
//!           - name: organism
//!             url: ncbitaxonidentifier_url
//! ```
//!
//! The built-in MarRef table is available as [`MappingSpec::marref`]; any
//! other table can be loaded from YAML to target a different vocabulary.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Key holding the JSON-LD context.
pub const CONTEXT_KEY: &str = "@context";

/// Key holding the JSON-LD type list.
pub const TYPE_KEY: &str = "@type";

pub const DEFAULT_CONTEXT: &str = "http://schema.org";

pub const DEFAULT_TYPES: [&str; 2] = ["BioChemEntity", "Sample"];

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

fn default_types() -> Vec<String> {
    DEFAULT_TYPES.iter().map(|t| t.to_string()).collect()
}

/// Complete mapping table for one output vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSpec {
    /// Value emitted as `@context`
    #[serde(default = "default_context")]
    pub context: String,

    /// Values emitted as `@type`
    #[serde(rename = "type", default = "default_types")]
    pub types: Vec<String>,

    /// Output fields, in emission order
    pub fields: Vec<FieldMapping>,
}

/// One output field and where its value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldMapping {
    /// Single value copied from one source field
    Scalar { key: String, source: String },

    /// Array built from several source fields; unresolved ones are skipped
    List { key: String, sources: Vec<String> },

    /// Array of PropertyValue objects
    AdditionalProperty {
        key: String,
        properties: Vec<PropertyDescriptor>,
    },
}

impl FieldMapping {
    pub fn key(&self) -> &str {
        match self {
            FieldMapping::Scalar { key, .. }
            | FieldMapping::List { key, .. }
            | FieldMapping::AdditionalProperty { key, .. } => key,
        }
    }

    /// Every source field name this entry reads.
    pub fn source_fields(&self) -> Vec<&str> {
        match self {
            FieldMapping::Scalar { source, .. } => vec![source.as_str()],
            FieldMapping::List { sources, .. } => sources.iter().map(|s| s.as_str()).collect(),
            FieldMapping::AdditionalProperty { properties, .. } => properties
                .iter()
                .flat_map(|p| {
                    std::iter::once(p.value.as_str()).chain(
                        p.value_reference
                            .iter()
                            .flat_map(|r| r.source_fields()),
                    )
                })
                .collect(),
        }
    }
}

/// Describes one PropertyValue: a display name and the field holding its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_reference: Vec<CategoryCodeDescriptor>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            value_reference: Vec::new(),
        }
    }

    pub fn with_reference(mut self, reference: CategoryCodeDescriptor) -> Self {
        self.value_reference.push(reference);
        self
    }
}

/// Source fields for the members of one CategoryCode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCodeDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CategoryCodeDescriptor {
    pub fn source_fields(&self) -> impl Iterator<Item = &str> {
        [&self.name, &self.code_value, &self.url]
            .into_iter()
            .filter_map(|f| f.as_deref())
    }
}

impl MappingSpec {
    /// Built-in table for the MarRef sample export.
    pub fn marref() -> Self {
        let list = |key: &str, sources: &[&str]| FieldMapping::List {
            key: key.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        };
        let scalar = |key: &str, source: &str| FieldMapping::Scalar {
            key: key.to_string(),
            source: source.to_string(),
        };

        Self {
            context: default_context(),
            types: default_types(),
            fields: vec![
                list("identifier", &["biosampleaccession", "mmpid"]),
                scalar("name", "fullscientificname"),
                scalar("url", "mmpid_url"),
                scalar("description", "comments"),
                list(
                    "dataset",
                    &[
                        "bioprojectaccession_url",
                        "genbankaccession_url",
                        "silvaaccessionssu_url",
                        "silvaaccessionlsu_url",
                        "uniprotaccession_url",
                        "assemblyaccession_url",
                        "ncbirefseqaccession_url",
                    ],
                ),
                FieldMapping::AdditionalProperty {
                    key: "additionalProperty".to_string(),
                    properties: vec![
                        PropertyDescriptor::new("Run Id", "runid"),
                        PropertyDescriptor::new("Collection Time", "collectiontime"),
                        PropertyDescriptor::new("Geographic Location (GAZ)", "geolocnamegaz")
                            .with_reference(CategoryCodeDescriptor {
                                name: Some("geolocnamegaz".to_string()),
                                code_value: Some("geolocnamegazenvo".to_string()),
                                url: Some("geolocnamegazenvo_url".to_string()),
                            }),
                        PropertyDescriptor::new("Organism", "organism").with_reference(
                            CategoryCodeDescriptor {
                                name: Some("organism".to_string()),
                                code_value: None,
                                url: Some("ncbitaxonidentifier_url".to_string()),
                            },
                        ),
                    ],
                },
            ],
        }
    }

    /// Parse a mapping table from YAML text and validate it.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConvertError> {
        let spec: MappingSpec = serde_yaml::from_str(contents)
            .map_err(|e| ConvertError::Mapping(format!("Failed to parse YAML: {}", e)))?;

        spec.validate()?;
        Ok(spec)
    }

    /// Load a mapping table from a YAML file.
    ///
    /// # Errors
    /// Returns [`ConvertError::Mapping`] if the file cannot be read, is not
    /// valid YAML, or fails [`MappingSpec::validate`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| {
            ConvertError::Mapping(format!(
                "Failed to read mapping file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml_str(&contents).map_err(|e| match e {
            ConvertError::Mapping(msg) => {
                ConvertError::Mapping(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn to_yaml(&self) -> Result<String, ConvertError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConvertError::Mapping(format!("Failed to render YAML: {}", e)))
    }

    /// Check the table for structural problems.
    ///
    /// Rejects an empty `@context` or `@type`, output keys that are empty,
    /// duplicated or collide with `@context`/`@type`, and empty source field
    /// names anywhere in the table.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.context.trim().is_empty() {
            return Err(ConvertError::Mapping("'context' must not be empty".to_string()));
        }

        if self.types.is_empty() || self.types.iter().any(|t| t.trim().is_empty()) {
            return Err(ConvertError::Mapping(
                "'type' must list at least one non-empty type".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            let key = field.key();

            if key.is_empty() {
                return Err(ConvertError::Mapping("Output key must not be empty".to_string()));
            }

            if key == CONTEXT_KEY || key == TYPE_KEY {
                return Err(ConvertError::Mapping(format!(
                    "Output key '{}' is reserved",
                    key
                )));
            }

            if !seen.insert(key) {
                return Err(ConvertError::Mapping(format!(
                    "Output key '{}' is mapped more than once",
                    key
                )));
            }

            if field.source_fields().iter().any(|s| s.is_empty()) {
                return Err(ConvertError::Mapping(format!(
                    "Output key '{}' references an empty source field",
                    key
                )));
            }

            if let FieldMapping::AdditionalProperty { properties, .. } = field {
                if let Some(p) = properties.iter().find(|p| p.name.trim().is_empty()) {
                    return Err(ConvertError::Mapping(format!(
                        "Property reading '{}' under '{}' has no name",
                        p.value, key
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.key() == key)
    }
}

impl Default for MappingSpec {
    fn default() -> Self {
        Self::marref()
    }
}
