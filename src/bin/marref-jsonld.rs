//! marref-jsonld CLI - convert MarRef XML exports into bioschemas JSON-LD files
//!
//! `convert` DELETES the output directory and recreates it before writing.
//! When the directory already holds files the command refuses to run unless
//! `--force` is given.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use marref_jsonld::config::resolve_mapping_path;
use marref_jsonld::serialization::dir_has_entries;
use marref_jsonld::{
    reset_output_dir, Converter, ConverterConfig, FailurePolicy, MappingSpec, XmlRecordSource,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marref-jsonld")]
#[command(version, about = "Convert MarRef sample XML into bioschemas JSON-LD", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every record of an XML export into one JSON-LD file per sample
    ///
    /// The output directory is deleted and recreated before conversion.
    Convert {
        /// XML export to read
        input: PathBuf,

        /// Output directory (env: MARREF_OUTPUT_DIR, default: ./bioschemas)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Mapping YAML replacing the built-in MarRef table (env: MARREF_MAPPING)
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Identifier prefix used to name output files (env: MARREF_ID_PREFIX, default: MMP)
        #[arg(short, long)]
        prefix: Option<String>,

        /// What to do when a record fails: abort or continue (env: MARREF_ON_ERROR, default: abort)
        #[arg(short = 'e', long)]
        on_error: Option<FailurePolicy>,

        /// Delete a non-empty output directory without refusing
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a mapping YAML without converting anything
    Validate {
        /// Mapping YAML to check
        mapping: PathBuf,
    },

    /// Print a mapping table as YAML (the built-in one unless a file is given)
    ShowMapping {
        /// Mapping YAML to load and normalize
        #[arg(short, long)]
        mapping: Option<PathBuf>,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { input, output, mapping, prefix, on_error, force } => {
            convert(input, output, mapping, prefix, on_error, force)
        }
        Commands::Validate { mapping } => validate(mapping),
        Commands::ShowMapping { mapping } => show_mapping(mapping),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_mapping(path: Option<PathBuf>) -> Result<MappingSpec, String> {
    match resolve_mapping_path(path) {
        Some(path) => {
            let spec = MappingSpec::load_from_file(&path).map_err(|e| e.to_string())?;
            tracing::info!("Loaded mapping from {}", path.display());
            Ok(spec)
        }
        None => Ok(MappingSpec::marref()),
    }
}

fn convert(
    input: PathBuf,
    output: Option<PathBuf>,
    mapping: Option<PathBuf>,
    prefix: Option<String>,
    on_error: Option<FailurePolicy>,
    force: bool,
) -> Result<(), String> {
    let spec = load_mapping(mapping)?;
    let config = ConverterConfig::resolve(output, prefix, on_error)?;

    if dir_has_entries(&config.output_dir) && !force {
        return Err(format!(
            "Output directory {} is not empty and would be deleted; rerun with --force",
            config.output_dir.display()
        ));
    }

    reset_output_dir(&config.output_dir).map_err(|e| e.to_string())?;

    println!("🔧 Converting {}...", input.display());
    let converter = Converter::new(&spec, config);
    let report = converter
        .run(&XmlRecordSource::new(&input))
        .map_err(|e| e.to_string())?;

    println!(
        "  ✓ Wrote {} of {} documents to {}",
        report.written.len(),
        report.total,
        converter.config().output_dir.display()
    );

    if report.is_success() {
        return Ok(());
    }

    for failure in &report.failures {
        eprintln!("  ✗ record {}: {}", failure.index, failure.error);
    }
    Err(format!("{} records failed", report.failures.len()))
}

fn validate(mapping: PathBuf) -> Result<(), String> {
    let spec = MappingSpec::load_from_file(&mapping).map_err(|e| e.to_string())?;

    println!(
        "  ✓ {} is valid ({} output fields)",
        mapping.display(),
        spec.fields.len()
    );
    Ok(())
}

fn show_mapping(mapping: Option<PathBuf>) -> Result<(), String> {
    let spec = load_mapping(mapping)?;
    let yaml = spec.to_yaml().map_err(|e| e.to_string())?;

    print!("{}", yaml);
    Ok(())
}
