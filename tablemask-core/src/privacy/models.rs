//! Privacy data models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::patterns::ContentPattern;

/// Why a column was flagged as sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensitivityReason {
    /// The column name contains a sensitive keyword
    NameKeyword { keyword: String },
    /// A sampled value matched a content pattern
    ContentPattern { pattern: ContentPattern },
    /// The unique/row ratio exceeded the threshold
    HighCardinality { ratio: f64 },
}

impl SensitivityReason {
    /// Returns the reason kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SensitivityReason::NameKeyword { .. } => "name_keyword",
            SensitivityReason::ContentPattern { .. } => "content_pattern",
            SensitivityReason::HighCardinality { .. } => "high_cardinality",
        }
    }
}

/// Outcome of classifying one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnClassification {
    /// Column name
    pub column_name: String,
    /// Whether any detection rule fired
    pub is_sensitive: bool,
    /// Present exactly when the column is sensitive
    pub matched_reason: Option<SensitivityReason>,
}

impl ColumnClassification {
    pub(crate) fn sensitive(column_name: &str, reason: SensitivityReason) -> Self {
        Self {
            column_name: column_name.to_string(),
            is_sensitive: true,
            matched_reason: Some(reason),
        }
    }

    pub(crate) fn clear(column_name: &str) -> Self {
        Self {
            column_name: column_name.to_string(),
            is_sensitive: false,
            matched_reason: None,
        }
    }
}

/// Masking transform applied to a sensitive column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskingMethod {
    /// Partial mask of username and first domain label
    EmailMasking,
    /// Keep the first two and last two digits
    PhoneMasking,
    /// Keep the first three and last three digits
    SsnMasking,
    /// Keep the first four and last four digits
    FinancialMasking,
    /// Keep only the last comma-separated part
    AddressMasking,
    /// Keep the first two IPv4 octets or MAC groups
    NetworkMasking,
    /// Replace with a run-local sequential token
    IdMapping,
    /// Replace with a salted hash; the fallback method
    HashAnonymization,
}

impl MaskingMethod {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskingMethod::EmailMasking => "email_masking",
            MaskingMethod::PhoneMasking => "phone_masking",
            MaskingMethod::SsnMasking => "ssn_masking",
            MaskingMethod::FinancialMasking => "financial_masking",
            MaskingMethod::AddressMasking => "address_masking",
            MaskingMethod::NetworkMasking => "network_masking",
            MaskingMethod::IdMapping => "id_mapping",
            MaskingMethod::HashAnonymization => "hash_anonymization",
        }
    }
}

impl std::fmt::Display for MaskingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one column was masked and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMasking {
    /// Transform applied
    pub method: MaskingMethod,
    /// Estimated information loss in [0, 1]
    pub data_loss: f64,
    /// Why the column was flagged
    pub reason: SensitivityReason,
}

/// Result of one anonymization run.
///
/// Carries column names, counts and scores only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationReport {
    /// Every column visited
    pub columns_processed: usize,
    /// Columns that were flagged and masked
    pub columns_anonymized: usize,
    /// Flagged column names in dataset order
    pub sensitive_columns_detected: Vec<String>,
    /// Masking details keyed by column name
    pub anonymization_methods: BTreeMap<String, ColumnMasking>,
    /// Sum of per-column data loss
    pub data_loss_estimate: f64,
    /// Wall-clock seconds
    pub processing_time: f64,
}
