//! Data profiler facade.
//!
//! Profiling never fails as a whole. A column whose statistics cannot be
//! computed loses its `basic_stats` entry and the rest of the summary is
//! still produced.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, warn};

use super::anomaly::scan_anomalies;
use super::config::ProfileConfig;
use super::models::{
    AnomalyScan, BasicStats, CategoricalStats, ColumnKind, ColumnProfile, DataSummary,
    DateTimeStats, GlobalStats, NumericStats, OutlierRecord, Shape, ValueCount,
};
use super::outliers::iqr_outliers;
use super::stats::{mean, quantile, sample_std, sorted};
use crate::{Column, Dataset};

/// Column-local statistics failure.
#[derive(Debug, Error)]
enum ColumnStatsError {
    #[error("{count} non-finite numeric values")]
    NonFinite { count: usize },
    #[error("{statistic} overflowed")]
    Overflow { statistic: &'static str },
}

/// Computes per-column statistics and table-wide summaries.
///
/// # Example
///
/// ```rust
/// use tablemask_core::{Column, DataProfiler, Dataset};
///
/// let dataset = Dataset::new(vec![Column::from_values("age", [30_i64, 42])])?;
/// let summary = DataProfiler::with_defaults().profile(&dataset);
/// assert_eq!(summary.shape.rows, 2);
/// assert_eq!(summary.global_stats.numeric_columns, 1);
/// # Ok::<(), tablemask_core::TableMaskError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataProfiler {
    config: ProfileConfig,
}

impl DataProfiler {
    /// Creates a new profiler with the given configuration.
    pub fn new(config: ProfileConfig) -> Self {
        Self { config }
    }

    /// Creates a new profiler with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ProfileConfig::default())
    }

    /// Returns a reference to the profiler configuration.
    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Profiles a dataset.
    pub fn profile(&self, dataset: &Dataset) -> DataSummary {
        let mut columns = BTreeMap::new();
        let mut data_types = BTreeMap::new();
        let mut missing_values = BTreeMap::new();
        let mut basic_stats = BTreeMap::new();
        let mut sample_data = BTreeMap::new();

        for column in dataset.columns() {
            let profile = self.profile_column(column);
            let name = column.name().to_string();

            data_types.insert(name.clone(), profile.dtype);
            missing_values.insert(name.clone(), profile.missing_count);
            if let Some(stats) = &profile.stats {
                basic_stats.insert(name.clone(), stats.clone());
            }
            sample_data.insert(
                name.clone(),
                column
                    .non_null()
                    .take(self.config.sample_values)
                    .cloned()
                    .collect(),
            );
            columns.insert(name, profile);
        }

        let anomalies = self
            .config
            .detect_anomalies
            .then(|| scan_anomalies(dataset, &self.config));

        let summary = DataSummary {
            shape: Shape {
                rows: dataset.row_count(),
                columns: dataset.column_count(),
            },
            global_stats: global_stats(dataset),
            columns,
            data_types,
            missing_values,
            basic_stats,
            sample_data,
            anomalies,
        };

        debug!(
            rows = summary.shape.rows,
            columns = summary.shape.columns,
            "profiled dataset"
        );
        summary
    }

    /// Profiles a single column.
    pub fn profile_column(&self, column: &Column) -> ColumnProfile {
        let dtype = column.dtype();
        let missing_count = column.null_count();
        let missing_percentage = percentage(missing_count, column.len());

        let stats = match ColumnKind::from(dtype) {
            ColumnKind::Numeric => numeric_stats(column).map(BasicStats::Numeric),
            ColumnKind::DateTime => Ok(BasicStats::DateTime(datetime_stats(column))),
            ColumnKind::Categorical => Ok(BasicStats::Categorical(categorical_stats(
                column,
                self.config.top_values,
            ))),
        };
        let stats = match stats {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(
                    column = column.name(),
                    error = %e,
                    "skipping statistics for column"
                );
                None
            }
        };

        ColumnProfile {
            name: column.name().to_string(),
            dtype,
            missing_count,
            missing_percentage,
            unique_count: column.unique_count(),
            stats,
        }
    }

    /// IQR outlier records for every numeric column, including columns
    /// without outliers.
    pub fn outliers(&self, dataset: &Dataset) -> Vec<OutlierRecord> {
        dataset
            .columns()
            .iter()
            .filter_map(|column| iqr_outliers(column, self.config.iqr_multiplier))
            .collect()
    }

    /// Runs the anomaly scan regardless of `detect_anomalies`.
    pub fn scan_anomalies(&self, dataset: &Dataset) -> AnomalyScan {
        scan_anomalies(dataset, &self.config)
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn numeric_stats(column: &Column) -> Result<NumericStats, ColumnStatsError> {
    let values: Vec<f64> = column.non_null().filter_map(|v| v.as_f64()).collect();

    let non_finite = values.iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        return Err(ColumnStatsError::NonFinite { count: non_finite });
    }

    let ordered = sorted(&values);
    let stats = NumericStats {
        min: ordered.first().copied(),
        max: ordered.last().copied(),
        mean: mean(&ordered),
        median: quantile(&ordered, 0.5),
        std: sample_std(&ordered),
    };

    let derived = [
        ("mean", stats.mean),
        ("median", stats.median),
        ("std", stats.std),
    ];
    for (statistic, value) in derived {
        if value.is_some_and(|v| !v.is_finite()) {
            return Err(ColumnStatsError::Overflow { statistic });
        }
    }
    Ok(stats)
}

fn datetime_stats(column: &Column) -> DateTimeStats {
    let values: Vec<_> = column.non_null().filter_map(|v| v.as_datetime()).collect();
    let min = values.iter().min().copied();
    let max = values.iter().max().copied();
    let range_days = min
        .zip(max)
        .map(|(min, max)| max.signed_duration_since(min).num_days());

    DateTimeStats {
        min,
        max,
        range_days,
    }
}

fn categorical_stats(column: &Column, top: usize) -> CategoricalStats {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in column.non_null().filter_map(|v| v.to_text()) {
        *counts.entry(text).or_insert(0) += 1;
    }

    let mut ranked: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

    let most_common = ranked.first().map(|vc| vc.value.clone());
    ranked.truncate(top);

    CategoricalStats {
        top_values: ranked,
        most_common,
    }
}

fn global_stats(dataset: &Dataset) -> GlobalStats {
    let total_missing_values: usize = dataset.columns().iter().map(Column::null_count).sum();
    let mut stats = GlobalStats {
        total_missing_values,
        missing_percentage: percentage(total_missing_values, dataset.cell_count()),
        numeric_columns: 0,
        categorical_columns: 0,
        datetime_columns: 0,
    };

    for column in dataset.columns() {
        match ColumnKind::from(column.dtype()) {
            ColumnKind::Numeric => stats.numeric_columns += 1,
            ColumnKind::DateTime => stats.datetime_columns += 1,
            ColumnKind::Categorical => stats.categorical_columns += 1,
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellValue;
    use chrono::NaiveDate;

    fn create_dataset() -> Dataset {
        Dataset::new(vec![
            Column::from_values("age", [Some(30_i64), Some(42), None, Some(30)]),
            Column::from_values("city", [Some("Paris"), Some("Lyon"), Some("Paris"), None]),
            Column::new(
                "joined",
                vec![
                    CellValue::DateTime(
                        NaiveDate::from_ymd_opt(2024, 1, 1)
                            .unwrap()
                            .and_hms_opt(0, 0, 0)
                            .unwrap(),
                    ),
                    CellValue::Null,
                    CellValue::DateTime(
                        NaiveDate::from_ymd_opt(2024, 3, 1)
                            .unwrap()
                            .and_hms_opt(0, 0, 0)
                            .unwrap(),
                    ),
                    CellValue::Null,
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_and_maps() {
        let summary = DataProfiler::with_defaults().profile(&create_dataset());

        assert_eq!(summary.shape, Shape { rows: 4, columns: 3 });
        assert_eq!(summary.data_types["age"], crate::DType::Int64);
        assert_eq!(summary.missing_values["joined"], 2);
        assert_eq!(summary.columns["city"].unique_count, 2);
        assert_eq!(summary.columns["age"].missing_percentage, 25.0);
    }

    #[test]
    fn test_numeric_stats() {
        let summary = DataProfiler::with_defaults().profile(&create_dataset());
        let BasicStats::Numeric(stats) = &summary.basic_stats["age"] else {
            panic!("expected numeric stats");
        };
        assert_eq!(stats.min, Some(30.0));
        assert_eq!(stats.max, Some(42.0));
        assert_eq!(stats.mean, Some(34.0));
        assert_eq!(stats.median, Some(30.0));
        // deviations -4, 8, -4 -> 96 / 2
        assert!((stats.std.unwrap() - 48.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_datetime_stats() {
        let summary = DataProfiler::with_defaults().profile(&create_dataset());
        let BasicStats::DateTime(stats) = &summary.basic_stats["joined"] else {
            panic!("expected datetime stats");
        };
        assert_eq!(stats.range_days, Some(60));
    }

    #[test]
    fn test_categorical_stats() {
        let summary = DataProfiler::with_defaults().profile(&create_dataset());
        let BasicStats::Categorical(stats) = &summary.basic_stats["city"] else {
            panic!("expected categorical stats");
        };
        assert_eq!(stats.most_common.as_deref(), Some("Paris"));
        assert_eq!(
            stats.top_values,
            vec![
                ValueCount {
                    value: "Paris".to_string(),
                    count: 2
                },
                ValueCount {
                    value: "Lyon".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_mode_tie_breaks_on_smallest_value() {
        let column = Column::from_values("c", ["b", "a", "b", "a"]);
        let stats = categorical_stats(&column, 10);
        assert_eq!(stats.most_common.as_deref(), Some("a"));
    }

    #[test]
    fn test_sample_data_and_global_stats() {
        let summary = DataProfiler::with_defaults().profile(&create_dataset());
        assert_eq!(
            summary.sample_data["age"],
            vec![CellValue::Int(30), CellValue::Int(42), CellValue::Int(30)]
        );
        assert_eq!(summary.global_stats.total_missing_values, 4);
        assert_eq!(summary.global_stats.missing_percentage, 4.0 / 12.0 * 100.0);
        assert_eq!(summary.global_stats.numeric_columns, 1);
        assert_eq!(summary.global_stats.categorical_columns, 1);
        assert_eq!(summary.global_stats.datetime_columns, 1);
    }

    #[test]
    fn test_non_finite_column_loses_stats_only() {
        let dataset = Dataset::new(vec![
            Column::from_values("ratio", [1.0, f64::INFINITY]),
            Column::from_values("ok", [1.0, 2.0]),
        ])
        .unwrap();
        let summary = DataProfiler::with_defaults().profile(&dataset);

        assert!(!summary.basic_stats.contains_key("ratio"));
        assert!(summary.basic_stats.contains_key("ok"));
        assert!(summary.columns.contains_key("ratio"));
    }

    #[test]
    fn test_overflowing_mean_drops_stats() {
        let column = Column::from_values("huge", [f64::MAX, f64::MAX]);
        assert!(matches!(
            numeric_stats(&column),
            Err(ColumnStatsError::Overflow { statistic: "mean" })
        ));
    }

    #[test]
    fn test_all_null_numeric_stats_are_empty() {
        let stats = numeric_stats(&Column::new("x", vec![CellValue::Null])).unwrap();
        assert_eq!(stats.min, None);
        assert_eq!(stats.std, None);
    }

    #[test]
    fn test_anomaly_scan_toggle() {
        let off = DataProfiler::new(ProfileConfig::new().with_detect_anomalies(false));
        assert!(off.profile(&create_dataset()).anomalies.is_none());
        assert!(DataProfiler::with_defaults()
            .profile(&create_dataset())
            .anomalies
            .is_some());
    }

    #[test]
    fn test_summary_serializes() {
        let summary = DataProfiler::with_defaults().profile(&create_dataset());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["basic_stats"]["joined"]["min"], "2024-01-01T00:00:00");
        assert_eq!(json["data_types"]["age"], "int64");
        assert!(json["columns"]["age"].get("stats").is_none());
    }
}
