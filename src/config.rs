//! Converter settings and their resolution from CLI flags and environment.
//!
//! Each setting is resolved with the precedence CLI flag > environment
//! variable > built-in default. A `.env` file is honoured when the binary
//! loads it with `dotenv` before resolving.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::identifier::{DEFAULT_IDENTIFIER_FIELD, DEFAULT_IDENTIFIER_PREFIX};

pub const ENV_OUTPUT_DIR: &str = "MARREF_OUTPUT_DIR";
pub const ENV_MAPPING: &str = "MARREF_MAPPING";
pub const ENV_ID_PREFIX: &str = "MARREF_ID_PREFIX";
pub const ENV_ON_ERROR: &str = "MARREF_ON_ERROR";

pub const DEFAULT_OUTPUT_DIR: &str = "./bioschemas";

/// What to do when a single record fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing record and return its error
    #[default]
    Abort,
    /// Log the failure, keep it in the run report and carry on
    Continue,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "continue" | "skip" => Ok(FailurePolicy::Continue),
            other => Err(format!(
                "Unsupported failure policy: '{}'. Supported policies: abort, continue",
                other
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Continue => write!(f, "continue"),
        }
    }
}

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    pub output_dir: PathBuf,
    /// Document field scanned for the file name
    pub identifier_field: String,
    /// Prefix an identifier must carry to name the output file
    pub identifier_prefix: String,
    pub on_error: FailurePolicy,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            identifier_field: DEFAULT_IDENTIFIER_FIELD.to_string(),
            identifier_prefix: DEFAULT_IDENTIFIER_PREFIX.to_string(),
            on_error: FailurePolicy::default(),
        }
    }
}

impl ConverterConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_error = policy;
        self
    }

    pub fn with_identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.identifier_prefix = prefix.into();
        self
    }

    /// Resolve settings from CLI overrides and the process environment.
    pub fn resolve(
        output_dir: Option<PathBuf>,
        identifier_prefix: Option<String>,
        on_error: Option<FailurePolicy>,
    ) -> Result<Self, String> {
        Self::resolve_with(output_dir, identifier_prefix, on_error, |key| {
            std::env::var(key).ok()
        })
    }

    /// Same as [`ConverterConfig::resolve`] with an explicit variable lookup.
    pub fn resolve_with<F>(
        output_dir: Option<PathBuf>,
        identifier_prefix: Option<String>,
        on_error: Option<FailurePolicy>,
        env: F,
    ) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = output_dir.or_else(|| env(ENV_OUTPUT_DIR).map(PathBuf::from)) {
            config.output_dir = dir;
        }

        if let Some(prefix) = identifier_prefix.or_else(|| env(ENV_ID_PREFIX)) {
            if prefix.is_empty() {
                return Err("Identifier prefix must not be empty".to_string());
            }
            config.identifier_prefix = prefix;
        }

        config.on_error = match on_error {
            Some(policy) => policy,
            None => match env(ENV_ON_ERROR) {
                Some(value) => value.parse()?,
                None => FailurePolicy::default(),
            },
        };

        Ok(config)
    }
}

/// Mapping file location: CLI flag, else `MARREF_MAPPING`, else none (built-in table).
pub fn resolve_mapping_path(cli: Option<PathBuf>) -> Option<PathBuf> {
    cli.or_else(|| std::env::var(ENV_MAPPING).ok().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::resolve_with(None, None, None, env_of(&[])).unwrap();

        assert_eq!(config, ConverterConfig::default());
        assert_eq!(config.identifier_prefix, "MMP");
        assert_eq!(config.on_error, FailurePolicy::Abort);
    }

    #[test]
    fn test_env_overrides_default() {
        let env = env_of(&[
            (ENV_OUTPUT_DIR, "/tmp/out"),
            (ENV_ID_PREFIX, "SAMN"),
            (ENV_ON_ERROR, "continue"),
        ]);
        let config = ConverterConfig::resolve_with(None, None, None, env).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.identifier_prefix, "SAMN");
        assert_eq!(config.on_error, FailurePolicy::Continue);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = env_of(&[(ENV_OUTPUT_DIR, "/tmp/env"), (ENV_ON_ERROR, "continue")]);
        let config = ConverterConfig::resolve_with(
            Some(PathBuf::from("/tmp/cli")),
            None,
            Some(FailurePolicy::Abort),
            env,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/cli"));
        assert_eq!(config.on_error, FailurePolicy::Abort);
    }

    #[test]
    fn test_invalid_env_policy() {
        let env = env_of(&[(ENV_ON_ERROR, "retry")]);
        let err = ConverterConfig::resolve_with(None, None, None, env).unwrap_err();

        assert!(err.contains("Unsupported failure policy"));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("ABORT".parse::<FailurePolicy>(), Ok(FailurePolicy::Abort));
        assert_eq!("skip".parse::<FailurePolicy>(), Ok(FailurePolicy::Continue));
        assert_eq!(FailurePolicy::Continue.to_string(), "continue");
    }
}
