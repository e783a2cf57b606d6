//! Sensitive data detection and masking.
//!
//! This module provides:
//! - **Classification**: flag columns by name keyword, content pattern or cardinality
//! - **Masking**: per-category transforms selected from the column name
//! - **Loss estimation**: a weighted cardinality/length heuristic
//! - **Reporting**: the anonymization report and the privacy report built on it
//!
//! # Privacy Guarantees
//! - The caller's dataset is never mutated; masking works on a copy
//! - Reports and logs carry column names, counts and scores, never values
//! - A failing column aborts the whole run with no partial output

mod anonymizer;
mod classifier;
mod config;
mod loss;
mod masking;
mod models;
mod patterns;
mod report;

// Re-export public API
pub use anonymizer::Anonymizer;
pub use classifier::ColumnClassifier;
pub use config::{
    ClassifierConfig, ConfigValidationError, DEFAULT_HASH_SALT, DEFAULT_SENSITIVE_KEYWORDS,
    MaskingConfig,
};
pub use loss::estimate_data_loss;
pub use masking::{IdMapping, METHOD_TABLE, Masker};
pub use models::{
    AnonymizationReport, ColumnClassification, ColumnMasking, MaskingMethod, SensitivityReason,
};
pub use patterns::{ContentPattern, ContentPatterns};
pub use report::{PrivacyPolicy, PrivacyReport};
