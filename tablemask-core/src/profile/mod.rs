//! Data profiling module.
//!
//! This module provides:
//! - **Column profiles**: dtype, missing values, cardinality and type-specific statistics
//! - **Outliers**: Tukey's IQR rule over numeric columns
//! - **Anomaly scan**: missing-value patterns, quality issues and duplicate rows
//!
//! Profiling runs on either the original or the anonymized dataset; it
//! never modifies its input.
//!
//! # Example
//! ```rust
//! use tablemask_core::{Column, Dataset};
//! use tablemask_core::profile::{DataProfiler, ProfileConfig};
//!
//! let dataset = Dataset::new(vec![Column::from_values("amount", [1_i64, 2, 3, 4, 5, 100])])?;
//! let profiler = DataProfiler::new(ProfileConfig::default());
//! let outliers = profiler.outliers(&dataset);
//! assert_eq!(outliers[0].indices, vec![5]);
//! # Ok::<(), tablemask_core::TableMaskError>(())
//! ```

mod anomaly;
mod config;
mod models;
mod outliers;
mod profiler;
mod stats;

// Re-export public API
pub use anomaly::scan_anomalies;
pub use config::{ProfileConfig, ProfileConfigError};
pub use models::{
    AnomalyScan, BasicStats, CategoricalStats, ColumnKind, ColumnProfile, DataQualityIssue,
    DataSummary, DateTimeStats, GlobalStats, MissingPattern, MissingPatterns, NumericStats,
    OutlierRecord, Shape, ValueCount,
};
pub use outliers::iqr_outliers;
pub use profiler::DataProfiler;
pub use stats::{mean, quantile, sample_std};
