//! Tabular anonymization and profiling tool.
//!
//! This binary reads CSV files, flags and masks sensitive columns, and
//! emits a JSON analysis containing the data summary and privacy report.
//!
//! # Privacy Guarantees
//! - Cell values never appear in logs
//! - The hash salt is never printed or written to reports
//! - Input files are only read; masked data goes to an explicit output path

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tablemask_core::{
    AnalysisPipeline, ColumnClassification, ColumnClassifier, DataProfiler, Dataset,
    MaskingMethod, PipelineConfig, ProfileStage, clean_dataset, logging::init_logging,
    read_csv_path, write_csv,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "tablemask")]
#[command(about = "Tabular data anonymization and profiling tool")]
#[command(version)]
#[command(long_about = "
tablemask - Anonymize and profile tabular data

This tool inspects CSV files and:
- Flags sensitive columns by name, content pattern or cardinality
- Masks them with column-type specific transforms
- Estimates the information lost to masking
- Profiles every column and scans for anomalies

PRIVACY FEATURES:
- Cell values never appear in logs
- Salted SHA-256 for generic masking
- Pseudonym tables are wiped from memory after each run

EXAMPLES:
  tablemask analyze customers.csv --output report.json
  tablemask analyze customers.csv --masked-output masked.csv --profile-stage original
  tablemask classify customers.csv
  tablemask profile customers.csv --output summary.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Anonymize and profile a CSV file
    Analyze(AnalyzeArgs),
    /// Show how each column would be classified
    Classify(InputArgs),
    /// Profile a CSV file without anonymizing it
    Profile(ProfileArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input CSV file
    #[arg(help = "Path to the CSV file to read")]
    pub input: PathBuf,

    /// Pipeline configuration file
    #[arg(long, help = "JSON pipeline configuration file")]
    pub config: Option<PathBuf>,

    /// Skip the cleaning pass
    #[arg(long, help = "Do not drop empty rows, normalize names or convert types")]
    pub no_clean: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Disable anonymization
    #[arg(long, help = "Profile only; report no sensitive columns")]
    pub no_anonymize: bool,

    /// Frame handed to the profiler
    #[arg(long, value_enum, help = "Profile the original or the anonymized data")]
    pub profile_stage: Option<StageArg>,

    /// Report output path
    #[arg(short, long, help = "Write the JSON analysis here instead of stdout")]
    pub output: Option<PathBuf>,

    /// Masked CSV output path
    #[arg(long, help = "Write the anonymized dataset as CSV")]
    pub masked_output: Option<PathBuf>,

    /// Hash salt override
    #[arg(
        long,
        env = "TABLEMASK_HASH_SALT",
        hide_env_values = true,
        help = "Salt for generic hashing (never logged)"
    )]
    pub hash_salt: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Summary output path
    #[arg(short, long, help = "Write the JSON summary here instead of stdout")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    Original,
    Anonymized,
}

impl From<StageArg> for ProfileStage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Original => ProfileStage::Original,
            StageArg::Anonymized => ProfileStage::Anonymized,
        }
    }
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,

    /// Emit JSON logs
    #[arg(long, help = "Write logs as newline-delimited JSON")]
    pub json_logs: bool,
}

/// One row of `classify` output.
#[derive(Debug, Serialize)]
struct ClassifiedColumn {
    #[serde(flatten)]
    classification: ColumnClassification,
    masking_method: Option<MaskingMethod>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet, cli.global.json_logs)?;

    let result = match &cli.command {
        Command::Analyze(args) => analyze(args),
        Command::Classify(args) => classify(args),
        Command::Profile(args) => profile(args),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

/// Loads the pipeline configuration, or defaults when no file is given.
fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    PipelineConfig::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Reads and, unless disabled, cleans the input file.
fn load_dataset(args: &InputArgs, config: &PipelineConfig) -> Result<Dataset> {
    info!("Reading {}", args.input.display());
    let dataset = read_csv_path(&args.input, &config.ingest)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    if args.no_clean || !config.clean {
        return Ok(dataset);
    }
    Ok(clean_dataset(&dataset, &config.cleaning)?)
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Applies command-line overrides on top of the loaded configuration.
fn analyze_config(args: &AnalyzeArgs) -> Result<PipelineConfig> {
    let mut config = load_config(args.input.config.as_deref())?;
    if args.no_anonymize {
        config.anonymize = false;
    }
    if let Some(stage) = args.profile_stage {
        config.profile_stage = stage.into();
    }
    if let Some(salt) = &args.hash_salt {
        config.masking.hash_salt.clone_from(salt);
    }
    Ok(config)
}

fn analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = analyze_config(args)?;
    let dataset = load_dataset(&args.input, &config)?;
    let pipeline = AnalysisPipeline::new(config)?;

    let outcome = pipeline.run(&dataset)?;
    info!(
        "Analysis {} flagged {} of {} columns",
        outcome.analysis_id,
        outcome.privacy_report.sensitive_columns_detected.len(),
        outcome.privacy_report.total_columns
    );

    if let Some(path) = &args.masked_output {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(&outcome.dataset, BufWriter::new(file))?;
        info!("Wrote masked data to {}", path.display());
    }

    write_json(&outcome, args.output.as_deref())
}

fn classify(args: &InputArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    config.validate()?;
    let dataset = load_dataset(args, &config)?;

    let classifier = ColumnClassifier::new(config.classifier);
    let rows: Vec<ClassifiedColumn> = classifier
        .classify_dataset(&dataset)
        .into_iter()
        .map(|classification| ClassifiedColumn {
            masking_method: classification
                .is_sensitive
                .then(|| MaskingMethod::for_column(&classification.column_name)),
            classification,
        })
        .collect();

    write_json(&rows, None)
}

fn profile(args: &ProfileArgs) -> Result<()> {
    let config = load_config(args.input.config.as_deref())?;
    config.validate()?;
    let dataset = load_dataset(&args.input, &config)?;

    let summary = DataProfiler::new(config.profile).profile(&dataset);
    write_json(&summary, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "tablemask",
            "-vv",
            "analyze",
            "data.csv",
            "--no-anonymize",
            "--profile-stage",
            "anonymized",
            "--masked-output",
            "masked.csv",
        ])
        .unwrap();

        assert_eq!(cli.global.verbose, 2);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.input.input, PathBuf::from("data.csv"));
        assert!(args.no_anonymize);
        assert_eq!(args.profile_stage, Some(StageArg::Anonymized));
        assert_eq!(args.masked_output, Some(PathBuf::from("masked.csv")));
    }

    #[test]
    fn test_parse_rejects_unknown_stage() {
        let result = Cli::try_parse_from([
            "tablemask",
            "analyze",
            "data.csv",
            "--profile-stage",
            "later",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_apply_on_top_of_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"profile_stage": "original"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "tablemask",
            "analyze",
            "data.csv",
            "--config",
            config_path.to_str().unwrap(),
            "--no-anonymize",
            "--hash-salt",
            "pepper",
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };

        let config = analyze_config(&args).unwrap();
        assert!(!config.anonymize);
        assert_eq!(config.profile_stage, ProfileStage::Original);
        assert_eq!(config.masking.hash_salt, "pepper");
    }

    #[test]
    fn test_invalid_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "{not json").unwrap();

        let err = load_config(Some(&config_path)).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }
}
