//! Profiling data models.
//!
//! Everything here serializes to JSON-safe primitives so the summary can be
//! handed to downstream consumers as-is.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{CellValue, DType};

/// Profiling bucket of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or float column
    Numeric,
    /// Timestamp column
    DateTime,
    /// Everything that is neither numeric nor datetime
    Categorical,
}

impl From<DType> for ColumnKind {
    fn from(dtype: DType) -> Self {
        match dtype {
            DType::Int64 | DType::Float64 => ColumnKind::Numeric,
            DType::DateTime => ColumnKind::DateTime,
            DType::Bool | DType::Object => ColumnKind::Categorical,
        }
    }
}

/// Row and column counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
}

/// Per-column overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    /// Column name
    pub name: String,
    /// Storage type
    pub dtype: DType,
    /// Missing cells
    pub missing_count: usize,
    /// Percentage of rows (0-100)
    pub missing_percentage: f64,
    /// Distinct non-null values
    pub unique_count: usize,
    /// Type-specific statistics, also listed under `basic_stats`
    #[serde(skip)]
    pub stats: Option<BasicStats>,
}

/// Statistics for a numeric column. All fields are `None` when the column
/// has no values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    /// Smallest value
    pub min: Option<f64>,
    /// Largest value
    pub max: Option<f64>,
    /// Arithmetic mean
    pub mean: Option<f64>,
    /// Linear-interpolated median
    pub median: Option<f64>,
    /// Sample standard deviation
    pub std: Option<f64>,
}

/// Statistics for a datetime column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTimeStats {
    /// Earliest timestamp
    pub min: Option<NaiveDateTime>,
    /// Latest timestamp
    pub max: Option<NaiveDateTime>,
    /// Whole days between `min` and `max`
    pub range_days: Option<i64>,
}

/// A value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    /// Text form of the value
    pub value: String,
    /// Occurrences
    pub count: usize,
}

/// Statistics for a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalStats {
    /// Most frequent values, count descending then value ascending
    pub top_values: Vec<ValueCount>,
    /// First entry of `top_values`
    pub most_common: Option<String>,
}

/// Type-specific column statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BasicStats {
    /// Numeric column statistics
    Numeric(NumericStats),
    /// Datetime column statistics
    DateTime(DateTimeStats),
    /// Categorical column statistics
    Categorical(CategoricalStats),
}

/// Table-wide counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalStats {
    /// Missing cells across the table
    pub total_missing_values: usize,
    /// Percentage of all cells (0-100)
    pub missing_percentage: f64,
    /// Integer and float columns
    pub numeric_columns: usize,
    /// Columns that are neither numeric nor datetime
    pub categorical_columns: usize,
    /// Timestamp columns
    pub datetime_columns: usize,
}

/// Tukey fence outliers of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierRecord {
    /// Column name
    pub column: String,
    /// Number of outlying values
    pub count: usize,
    /// Percentage of rows (0-100)
    pub percentage: f64,
    /// Zero-based row positions
    pub indices: Vec<usize>,
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
    /// `q3 - q1`
    pub iqr: f64,
    /// Lower fence; smaller values are outliers
    pub lower_bound: f64,
    /// Upper fence; larger values are outliers
    pub upper_bound: f64,
}

/// One distinct row-level missing-value pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPattern {
    /// One flag per column, true where the value is missing
    pub missing: Vec<bool>,
    /// Rows sharing this pattern
    pub count: usize,
}

/// Distinct missing-value patterns across rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPatterns {
    /// Number of distinct patterns
    pub unique_patterns: usize,
    /// Patterns ordered by their missing flags
    pub patterns: Vec<MissingPattern>,
}

/// A column-level data quality problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataQualityIssue {
    /// Missing share above the configured threshold
    HighMissingValues {
        /// Column name
        column: String,
        /// Percentage of rows (0-100)
        missing_percentage: f64,
    },
    /// Likely an identifier column
    HighCardinality {
        /// Column name
        column: String,
        /// Distinct values as a percentage of rows (0-100)
        unique_percentage: f64,
    },
}

/// Result of the anomaly scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnomalyScan {
    /// Numeric columns with at least one outlier
    pub outliers: BTreeMap<String, OutlierRecord>,
    /// Present only when more than one distinct pattern exists
    pub missing_patterns: Option<MissingPatterns>,
    /// Column-level quality problems
    pub data_quality_issues: Vec<DataQualityIssue>,
    /// Rows identical to an earlier row
    pub duplicate_rows: usize,
}

/// Profile of a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    /// Table dimensions
    pub shape: Shape,
    /// Per-column overview keyed by name
    pub columns: BTreeMap<String, ColumnProfile>,
    /// Storage type per column
    pub data_types: BTreeMap<String, DType>,
    /// Missing cells per column
    pub missing_values: BTreeMap<String, usize>,
    /// Columns whose statistics failed are absent
    pub basic_stats: BTreeMap<String, BasicStats>,
    /// Leading values of each column, from the profiled frame
    pub sample_data: BTreeMap<String, Vec<CellValue>>,
    /// Table-wide counts
    pub global_stats: GlobalStats,
    /// Anomaly scan, when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomalies: Option<AnomalyScan>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_buckets() {
        assert_eq!(ColumnKind::from(DType::Int64), ColumnKind::Numeric);
        assert_eq!(ColumnKind::from(DType::DateTime), ColumnKind::DateTime);
        assert_eq!(ColumnKind::from(DType::Bool), ColumnKind::Categorical);
    }

    #[test]
    fn test_stats_serialize_untagged() {
        let stats = BasicStats::Numeric(NumericStats {
            min: Some(1.0),
            max: Some(2.0),
            mean: Some(1.5),
            median: Some(1.5),
            std: None,
        });
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"min": 1.0, "max": 2.0, "mean": 1.5, "median": 1.5, "std": null})
        );
    }

    #[test]
    fn test_issue_is_tagged() {
        let issue = DataQualityIssue::HighMissingValues {
            column: "notes".to_string(),
            missing_percentage: 75.0,
        };
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({"type": "high_missing_values", "column": "notes", "missing_percentage": 75.0})
        );
    }
}
