//! Per-record conversion pipeline and batch runner.
//!
//! Each record goes through flatten -> build -> prune -> identifier
//! extraction -> write, strictly one at a time. The output directory must
//! already exist; resetting it is the caller's job
//! ([`reset_output_dir`](crate::serialization::reset_output_dir)).

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use serde_json::Value;

use crate::builder::build;
use crate::config::{ConverterConfig, FailurePolicy};
use crate::error::ConvertError;
use crate::identifier::extract_identifier;
use crate::mapping::MappingSpec;
use crate::prune::prune;
use crate::record::{flatten, RecordNode};
use crate::serialization::write_document;
use crate::source::RecordSource;

/// A pruned document together with the identifier naming its file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedRecord {
    pub identifier: String,
    pub document: Value,
}

/// A record that could not be converted or written.
#[derive(Debug)]
pub struct RecordFailure {
    /// Position of the record in the source, starting at 0
    pub index: usize,
    pub error: ConvertError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub total: usize,
    pub written: Vec<PathBuf>,
    pub failures: Vec<RecordFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Converts records with one mapping table and one set of settings.
pub struct Converter<'a> {
    spec: &'a MappingSpec,
    config: ConverterConfig,
}

impl<'a> Converter<'a> {
    pub fn new(spec: &'a MappingSpec, config: ConverterConfig) -> Self {
        Self { spec, config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Flatten, build and prune one record.
    pub fn document(&self, record: &RecordNode) -> Value {
        let flat = flatten(record);
        prune(build(&flat, self.spec))
    }

    /// Produce the final document and its identifier without touching disk.
    pub fn convert_record(
        &self,
        index: usize,
        record: &RecordNode,
    ) -> Result<ConvertedRecord, ConvertError> {
        let document = self.document(record);
        let identifier = extract_identifier(
            &document,
            &self.config.identifier_field,
            &self.config.identifier_prefix,
            index,
        )?;

        Ok(ConvertedRecord {
            identifier,
            document,
        })
    }

    /// Write a record unless an earlier record of the run already used its identifier.
    fn write_unique(
        &self,
        index: usize,
        record: &RecordNode,
        written_by: &mut HashMap<String, usize>,
    ) -> Result<PathBuf, ConvertError> {
        let converted = self.convert_record(index, record)?;

        if let Some(&first_record) = written_by.get(&converted.identifier) {
            return Err(ConvertError::DuplicateIdentifier {
                record: index,
                identifier: converted.identifier,
                first_record,
            });
        }

        let path = write_document(
            &self.config.output_dir,
            &converted.identifier,
            &converted.document,
        )?;
        written_by.insert(converted.identifier, index);
        Ok(path)
    }

    /// Convert every record of `source`.
    ///
    /// A record whose identifier was already written earlier in the run is a
    /// [`ConvertError::DuplicateIdentifier`] failure; the first file is kept.
    ///
    /// # Errors
    /// Source failures and a missing output directory are returned
    /// immediately. Per-record failures are returned under
    /// [`FailurePolicy::Abort`] and collected in the report under
    /// [`FailurePolicy::Continue`].
    pub fn run(&self, source: &dyn RecordSource) -> Result<RunReport, ConvertError> {
        if !self.config.output_dir.is_dir() {
            return Err(ConvertError::OutputDir {
                path: self.config.output_dir.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "output directory does not exist"),
            });
        }

        let records = source.records()?;
        tracing::info!("Loaded {} records from {}", records.len(), source.describe());

        let mut report = RunReport {
            total: records.len(),
            ..RunReport::default()
        };

        let mut written_by = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            match self.write_unique(index, record, &mut written_by) {
                Ok(path) => {
                    tracing::debug!("Record {} written to {}", index, path.display());
                    report.written.push(path);
                }
                Err(error) if !error.is_per_record() => return Err(error),
                Err(error) => match self.config.on_error {
                    FailurePolicy::Abort => {
                        tracing::error!("Record {} failed, aborting: {}", index, error);
                        return Err(error);
                    }
                    FailurePolicy::Continue => {
                        tracing::warn!("Skipping record {}: {}", index, error);
                        report.failures.push(RecordFailure { index, error });
                    }
                },
            }
        }

        tracing::info!(
            "Converted {} of {} records ({} failed)",
            report.written.len(),
            report.total,
            report.failures.len()
        );

        Ok(report)
    }
}
