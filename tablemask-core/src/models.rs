//! Core data models for in-memory tabular data.
//!
//! A [`Dataset`] is an ordered collection of named [`Column`]s of equal
//! length. Cells are [`CellValue`]s, which serialize to JSON-safe
//! primitives only: datetimes become ISO-8601 strings and non-finite floats
//! become `null`.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{Result, error::TableMaskError};

/// Format used when a datetime cell is stringified.
const DATETIME_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell of a tabular dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Free text
    Text(String),
    /// Timezone-naive timestamp
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns true for missing values.
    ///
    /// A NaN float counts as missing, matching how the loaders treat the
    /// `NaN` marker.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Stringifies a non-null cell. Missing values never stringify.
    pub fn to_text(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(format_float(*f)),
            Self::Text(s) => Some(s.clone()),
            Self::DateTime(dt) => Some(dt.format(DATETIME_TEXT_FORMAT).to_string()),
        }
    }

    /// Returns the numeric value of an integer or float cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Returns the datetime of a datetime cell.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Renders whole floats with a trailing `.0` so `30.0` and `30` stay
/// distinguishable once stringified.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Storage type of a column, named the way downstream consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DType {
    /// Integers only
    #[serde(rename = "int64")]
    Int64,
    /// Floats, or integers mixed with floats
    #[serde(rename = "float64")]
    Float64,
    /// Booleans only
    #[serde(rename = "bool")]
    Bool,
    /// Timestamps only
    #[serde(rename = "datetime64[ns]")]
    DateTime,
    /// Text, mixed, or all-null
    #[serde(rename = "object")]
    Object,
}

impl DType {
    /// Returns the dtype name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::DateTime => "datetime64[ns]",
            DType::Object => "object",
        }
    }

    /// Returns true for integer and float columns.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }

    /// Infers the dtype from the non-null values of a column.
    ///
    /// Columns without any non-null value are `object`.
    pub fn infer(values: &[CellValue]) -> Self {
        let mut seen_int = false;
        let mut seen_float = false;
        let mut seen_bool = false;
        let mut seen_datetime = false;
        let mut seen_other = false;

        for value in values.iter().filter(|v| !v.is_null()) {
            match value {
                CellValue::Int(_) => seen_int = true,
                CellValue::Float(_) => seen_float = true,
                CellValue::Bool(_) => seen_bool = true,
                CellValue::DateTime(_) => seen_datetime = true,
                CellValue::Text(_) | CellValue::Null => seen_other = true,
            }
        }

        let numeric = seen_int || seen_float;
        match (numeric, seen_bool, seen_datetime, seen_other) {
            (true, false, false, false) if seen_float => DType::Float64,
            (true, false, false, false) => DType::Int64,
            (false, true, false, false) => DType::Bool,
            (false, false, true, false) => DType::DateTime,
            _ => DType::Object,
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    values: Vec<CellValue>,
}

impl Column {
    /// Creates a new column.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Creates a column from anything convertible into cells.
    pub fn from_values<T: Into<CellValue>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cells in row order.
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Number of rows, missing cells included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the non-null cells in row order.
    pub fn non_null(&self) -> impl Iterator<Item = &CellValue> {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Number of distinct non-null values, compared by their text form.
    pub fn unique_count(&self) -> usize {
        distinct_count(&self.values)
    }

    /// Storage type inferred from the cells.
    pub fn dtype(&self) -> DType {
        DType::infer(&self.values)
    }
}

/// Counts distinct non-null cells by their text form.
pub(crate) fn distinct_count(values: &[CellValue]) -> usize {
    values
        .iter()
        .filter_map(CellValue::to_text)
        .collect::<HashSet<_>>()
        .len()
}

/// An ordered collection of equally sized, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Creates a dataset, validating column-name uniqueness and that all
    /// columns have the same number of rows.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut names = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(TableMaskError::malformed(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(ragged) = columns.iter().find(|c| c.len() != expected) {
                return Err(TableMaskError::malformed(format!(
                    "column '{}' has {} values, expected {}",
                    ragged.name(),
                    ragged.len(),
                    expected
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Builds a dataset from a header row and row-major cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let width = headers.len();
        let mut columns: Vec<Vec<CellValue>> = (0..width)
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(TableMaskError::malformed(format!(
                    "row {} has {} fields, expected {}",
                    index + 1,
                    row.len(),
                    width
                )));
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Self::new(
            headers
                .into_iter()
                .zip(columns)
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
    }

    /// Columns in header order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows; zero for a dataset without columns.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.column_count()
    }

    /// Returns the cells of one row, or `None` when out of range.
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// Replaces the cells of the column at `index`, keeping the row count.
    pub(crate) fn replace_values(&mut self, index: usize, values: Vec<CellValue>) -> Result<()> {
        let rows = self.row_count();
        let column = self.columns.get_mut(index).ok_or_else(|| {
            TableMaskError::malformed(format!("column index {} out of range", index))
        })?;
        if values.len() != rows {
            return Err(TableMaskError::anonymization(
                column.name.clone(),
                format!("rewrite produced {} values for {} rows", values.len(), rows),
            ));
        }
        column.values = values;
        Ok(())
    }
}
