//! IQR outlier detection.

use super::models::OutlierRecord;
use super::stats::{quantile, sorted};
use crate::Column;

/// Applies Tukey's rule to a numeric column.
///
/// Quartiles are taken over the finite non-null values; any non-null value
/// outside `[Q1 - k·IQR, Q3 + k·IQR]` is an outlier. Returns `None` for
/// non-numeric columns and columns without finite values.
pub fn iqr_outliers(column: &Column, multiplier: f64) -> Option<OutlierRecord> {
    if !column.dtype().is_numeric() {
        return None;
    }

    let finite: Vec<f64> = column
        .values()
        .iter()
        .filter_map(crate::CellValue::as_f64)
        .filter(|v| v.is_finite())
        .collect();
    let ordered = sorted(&finite);
    let q1 = quantile(&ordered, 0.25)?;
    let q3 = quantile(&ordered, 0.75)?;
    let iqr = q3 - q1;
    let lower_bound = q1 - multiplier * iqr;
    let upper_bound = q3 + multiplier * iqr;

    let indices: Vec<usize> = column
        .values()
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            value
                .as_f64()
                .filter(|v| *v < lower_bound || *v > upper_bound)
                .map(|_| index)
        })
        .collect();

    let count = indices.len();
    let percentage = if column.is_empty() {
        0.0
    } else {
        count as f64 / column.len() as f64 * 100.0
    };

    Some(OutlierRecord {
        column: column.name().to_string(),
        count,
        percentage,
        indices,
        q1,
        q3,
        iqr,
        lower_bound,
        upper_bound,
    })
}
