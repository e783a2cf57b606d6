//! Standard dataset cleaning pass applied before analysis.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{CellValue, Column, Dataset, Result};

/// Date layouts tried, in order, when detecting date columns.
pub const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%Y-%m-%d %H:%M:%S",
];

/// Characters stripped before a text cell is re-parsed as a number.
const NUMERIC_NOISE: [char; 6] = ['%', '€', '$', '£', '¥', '\u{a0}'];

/// Cleaning pass settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Drop rows in which every cell is missing
    pub drop_empty_rows: bool,
    /// Trim, lowercase and underscore column names
    pub normalize_column_names: bool,
    /// Convert text columns that look like dates
    pub parse_dates: bool,
    /// Number of leading non-null values that must parse as dates
    pub date_sample_size: usize,
    /// Convert text columns that are mostly numbers
    pub parse_numeric: bool,
    /// Fraction of rows (0.0-1.0) that must parse for numeric conversion
    pub numeric_threshold: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            drop_empty_rows: true,
            normalize_column_names: true,
            parse_dates: true,
            date_sample_size: 10,
            parse_numeric: true,
            numeric_threshold: 0.5,
        }
    }
}

impl CleaningConfig {
    /// Creates a new cleaning config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to enable/disable date detection.
    pub fn with_parse_dates(mut self, enabled: bool) -> Self {
        self.parse_dates = enabled;
        self
    }

    /// Builder method to enable/disable numeric conversion.
    pub fn with_parse_numeric(mut self, enabled: bool) -> Self {
        self.parse_numeric = enabled;
        self
    }

    /// Builder method to set the date sample size (at least 1).
    pub fn with_date_sample_size(mut self, size: usize) -> Self {
        if size == 0 {
            tracing::warn!("date_sample_size 0 raised to 1");
        }
        self.date_sample_size = size.max(1);
        self
    }

    /// Builder method to set the numeric conversion threshold.
    pub fn with_numeric_threshold(mut self, threshold: f64) -> Self {
        if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(
                "numeric_threshold {} clamped to valid range [0.0, 1.0]",
                threshold
            );
        }
        self.numeric_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

/// Returns a cleaned copy of `dataset`.
///
/// Steps, in order: drop fully-empty rows, normalize column names, convert
/// date-like text columns, convert mostly-numeric text columns. Fails with
/// `MalformedInput` when normalization makes two column names collide.
pub fn clean_dataset(dataset: &Dataset, config: &CleaningConfig) -> Result<Dataset> {
    let keep: Vec<bool> = (0..dataset.row_count())
        .map(|row| {
            !config.drop_empty_rows
                || dataset
                    .columns()
                    .iter()
                    .any(|c| !c.values()[row].is_null())
        })
        .collect();
    let dropped = keep.iter().filter(|k| !**k).count();

    let mut converted_dates = 0usize;
    let mut converted_numbers = 0usize;

    let columns = dataset
        .columns()
        .iter()
        .map(|column| {
            let name = if config.normalize_column_names {
                normalize_name(column.name())
            } else {
                column.name().to_string()
            };

            let mut values: Vec<CellValue> = column
                .values()
                .iter()
                .zip(&keep)
                .filter(|(_, keep)| **keep)
                .map(|(value, _)| value.clone())
                .collect();

            if is_text_column(&values) {
                if config.parse_dates
                    && let Some(dates) = convert_dates(&values, config.date_sample_size)
                {
                    values = dates;
                    converted_dates += 1;
                } else if config.parse_numeric
                    && let Some(numbers) = convert_numeric(&values, config.numeric_threshold)
                {
                    values = numbers;
                    converted_numbers += 1;
                }
            }

            Column::new(name, values)
        })
        .collect();

    let cleaned = Dataset::new(columns)?;
    tracing::debug!(
        dropped_rows = dropped,
        date_columns = converted_dates,
        numeric_columns = converted_numbers,
        "cleaned dataset"
    );
    Ok(cleaned)
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// True when every non-null cell is text and at least one exists.
fn is_text_column(values: &[CellValue]) -> bool {
    let mut present = values.iter().filter(|v| !v.is_null()).peekable();
    present.peek().is_some() && present.all(|v| matches!(v, CellValue::Text(_)))
}

fn parse_with_format(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Converts a text column to datetimes when its leading sample parses
/// under a single layout. Cells that do not parse become null.
fn convert_dates(values: &[CellValue], sample_size: usize) -> Option<Vec<CellValue>> {
    let sample: Vec<&str> = values
        .iter()
        .filter_map(|v| match v {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        })
        .take(sample_size)
        .collect();

    let format = DATE_FORMATS
        .iter()
        .find(|format| sample.iter().all(|s| parse_with_format(s, format).is_some()))?;

    Some(
        values
            .iter()
            .map(|v| match v {
                CellValue::Text(s) => parse_with_format(s, format)
                    .map_or(CellValue::Null, CellValue::DateTime),
                _ => CellValue::Null,
            })
            .collect(),
    )
}

fn parse_loose_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !NUMERIC_NOISE.contains(c))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Converts a text column to floats when strictly more than `threshold`
/// of all rows parse as numbers. Cells that do not parse become null.
fn convert_numeric(values: &[CellValue], threshold: f64) -> Option<Vec<CellValue>> {
    let parsed: Vec<Option<f64>> = values
        .iter()
        .map(|v| match v {
            CellValue::Text(s) => parse_loose_number(s),
            _ => None,
        })
        .collect();

    let hits = parsed.iter().filter(|p| p.is_some()).count();
    if values.is_empty() || hits as f64 / values.len() as f64 <= threshold {
        return None;
    }

    Some(
        parsed
            .into_iter()
            .map(|p| p.map_or(CellValue::Null, CellValue::Float))
            .collect(),
    )
}
