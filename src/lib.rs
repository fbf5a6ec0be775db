//! # marref-jsonld: MarRef XML to bioschemas JSON-LD
//!
//! Converts marine sample records from the MarRef XML export into JSON-LD
//! documents using a bioschemas-style vocabulary, one file per sample.
//!
//! ## Pipeline
//!
//! - **Record source**: parse the XML export and collect every `record` element
//! - **Flattener**: reduce a record to a field -> value map, skipping `*missing`
//!   fields and adding `<field>_url` entries for `url` attributes
//! - **Builder**: apply a declarative [`MappingSpec`] (scalar, list and
//!   additionalProperty entries) to produce the JSON-LD document
//! - **Pruner**: strip null and empty values, keeping `@context` and `@type`
//! - **Writer**: name the file after the `MMP` identifier and write it as
//!   pretty JSON
//!
//! ## Example mapping
//!
//! ```yaml
//! fields:
//!   - kind: list
//!     key: identifier
//!     sources: [biosampleaccession, mmpid]
//!   - kind: scalar
//!     key: url
//!     source: mmpid_url
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use marref_jsonld::{reset_output_dir, Converter, ConverterConfig, MappingSpec, XmlRecordSource};
//!
//! let spec = MappingSpec::marref();
//! let config = ConverterConfig::default().with_output_dir("./bioschemas");
//!
//! reset_output_dir(&config.output_dir)?;
//! let report = Converter::new(&spec, config).run(&XmlRecordSource::new("MarRef.xml"))?;
//! println!("{} documents written", report.written.len());
//! # Ok::<(), marref_jsonld::ConvertError>(())
//! ```

pub mod builder;
pub mod config;
pub mod converter;
pub mod error;
pub mod identifier;
pub mod mapping;
pub mod prune;
pub mod record;
pub mod serialization;
pub mod source;

// Re-export key types
pub use builder::build;
pub use config::{ConverterConfig, FailurePolicy};
pub use converter::{ConvertedRecord, Converter, RecordFailure, RunReport};
pub use error::ConvertError;
pub use identifier::extract_identifier;
pub use mapping::{CategoryCodeDescriptor, FieldMapping, MappingSpec, PropertyDescriptor};
pub use prune::prune;
pub use record::{flatten, FlatRecord, RecordField, RecordNode};
pub use serialization::{reset_output_dir, write_document};
pub use source::{parse_records, RecordSource, XmlRecordSource};
