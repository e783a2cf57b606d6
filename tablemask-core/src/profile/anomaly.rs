//! Table-wide anomaly scan.
//!
//! Combines IQR outliers, row-level missing-value patterns, column quality
//! issues and duplicate rows. Like the rest of the profile, the scan
//! reports row positions and counts only.

use std::collections::{BTreeMap, HashSet};

use super::config::ProfileConfig;
use super::models::{AnomalyScan, DataQualityIssue, MissingPattern, MissingPatterns};
use super::outliers::iqr_outliers;
use crate::Dataset;

/// Scans a dataset for anomalies.
pub fn scan_anomalies(dataset: &Dataset, config: &ProfileConfig) -> AnomalyScan {
    let rows = dataset.row_count();
    if rows == 0 {
        return AnomalyScan::default();
    }

    let outliers = dataset
        .columns()
        .iter()
        .filter_map(|column| iqr_outliers(column, config.iqr_multiplier))
        .filter(|record| record.count > 0)
        .map(|record| (record.column.clone(), record))
        .collect();

    AnomalyScan {
        outliers,
        missing_patterns: missing_patterns(dataset),
        data_quality_issues: quality_issues(dataset, config),
        duplicate_rows: duplicate_rows(dataset),
    }
}

/// Groups rows by which columns are missing. Reported only when rows
/// disagree on the pattern.
fn missing_patterns(dataset: &Dataset) -> Option<MissingPatterns> {
    let mut counts: BTreeMap<Vec<bool>, usize> = BTreeMap::new();
    for index in 0..dataset.row_count() {
        let pattern: Vec<bool> = dataset
            .columns()
            .iter()
            .map(|c| c.values()[index].is_null())
            .collect();
        *counts.entry(pattern).or_insert(0) += 1;
    }

    if counts.len() <= 1 {
        return None;
    }

    Some(MissingPatterns {
        unique_patterns: counts.len(),
        patterns: counts
            .into_iter()
            .map(|(missing, count)| MissingPattern { missing, count })
            .collect(),
    })
}

fn quality_issues(dataset: &Dataset, config: &ProfileConfig) -> Vec<DataQualityIssue> {
    let rows = dataset.row_count() as f64;
    let mut issues = Vec::new();

    for column in dataset.columns() {
        let missing_ratio = column.null_count() as f64 / rows;
        if missing_ratio > config.high_missing_threshold {
            issues.push(DataQualityIssue::HighMissingValues {
                column: column.name().to_string(),
                missing_percentage: missing_ratio * 100.0,
            });
        }

        let unique_ratio = column.unique_count() as f64 / rows;
        if unique_ratio > config.high_cardinality_threshold {
            issues.push(DataQualityIssue::HighCardinality {
                column: column.name().to_string(),
                unique_percentage: unique_ratio * 100.0,
            });
        }
    }

    issues
}

/// Counts rows equal to an earlier row, comparing cells by text form.
fn duplicate_rows(dataset: &Dataset) -> usize {
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(dataset.row_count());
    (0..dataset.row_count())
        .filter_map(|index| dataset.row(index))
        .filter(|row| {
            let key: Vec<Option<String>> = row.iter().map(|cell| cell.to_text()).collect();
            !seen.insert(key)
        })
        .count()
}
