//! Core data structures and pipelines for tablemask.
//!
//! This crate inspects arbitrary tabular data, flags sensitive columns,
//! masks them with column-type specific transforms and profiles the result
//! for downstream analysis.
//!
//! # Privacy Guarantees
//! - Processing is pure in-memory computation with no network access
//! - Logs, errors and reports carry column names and counts, never cell values
//! - Generic masking uses a salted SHA-256 digest and cannot be reversed
//! - Pseudonym tables are zeroized when dropped
//!
//! # Architecture
//! - [`ingest`] turns CSV bytes into a typed [`Dataset`] and back
//! - [`privacy`] classifies, masks and scores the loss of sensitive columns
//! - [`profile`] computes per-column statistics and anomaly scans
//! - [`pipeline`] ties the stages together into one analysis run

pub mod error;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod privacy;
pub mod profile;

// Re-export commonly used types
pub use error::{Result, TableMaskError};
pub use ingest::{CleaningConfig, IngestConfig, clean_dataset, read_csv_bytes, read_csv_path, write_csv};
pub use models::{CellValue, Column, DType, Dataset};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, PipelineConfig, ProfileStage};
pub use privacy::{
    AnonymizationReport, Anonymizer, ColumnClassification, ColumnClassifier, IdMapping,
    MaskingMethod, PrivacyPolicy, PrivacyReport, estimate_data_loss,
};
pub use profile::{DataProfiler, DataSummary, OutlierRecord, ProfileConfig};
