//! CSV decoding, parsing and column type inference.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::{CellValue, Column, Dataset, Result, TableMaskError};

/// Default upper bound on accepted input size.
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;

/// Field contents treated as missing values.
pub const MISSING_MARKERS: [&str; 5] = ["", "nan", "NaN", "NULL", "null"];

const BOOL_TRUE: [&str; 3] = ["true", "True", "TRUE"];
const BOOL_FALSE: [&str; 3] = ["false", "False", "FALSE"];

/// CSV ingestion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Inputs larger than this are rejected
    pub max_file_size_mb: u64,
    /// Trim surrounding whitespace from every field
    pub trim: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            trim: false,
        }
    }
}

impl IngestConfig {
    /// Creates a new ingest config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder method to set the size limit. Zero is raised to one megabyte.
    pub fn with_max_file_size_mb(mut self, max_file_size_mb: u64) -> Self {
        if max_file_size_mb == 0 {
            tracing::warn!("max_file_size_mb 0 raised to 1");
        }
        self.max_file_size_mb = max_file_size_mb.max(1);
        self
    }

    /// Builder method to enable field trimming.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    fn max_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_bytes() {
            return Err(TableMaskError::malformed(format!(
                "input is {} bytes, limit is {} MB",
                size, self.max_file_size_mb
            )));
        }
        Ok(())
    }
}

/// Reads a CSV file from disk.
///
/// The size limit is checked against file metadata before anything is read.
pub fn read_csv_path(path: &Path, config: &IngestConfig) -> Result<Dataset> {
    let context = || format!("Failed to read {}", path.display());
    let metadata = std::fs::metadata(path).map_err(|e| TableMaskError::io(context(), e))?;
    config.check_size(metadata.len())?;

    let bytes = std::fs::read(path).map_err(|e| TableMaskError::io(context(), e))?;
    read_csv_bytes(&bytes, config)
}

/// Parses CSV bytes into a typed dataset.
///
/// The first record is the header row. Rows with a field count different
/// from the header are rejected. Duplicate header names get a `.N` suffix.
pub fn read_csv_bytes(bytes: &[u8], config: &IngestConfig) -> Result<Dataset> {
    config.check_size(bytes.len() as u64)?;
    let text = decode(bytes);

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .trim(if config.trim { Trim::All } else { Trim::None })
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TableMaskError::csv("Failed to read CSV headers", e))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(TableMaskError::malformed("input has no header row"));
    }
    let headers = dedupe_headers(headers);

    let width = headers.len();
    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for (index, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| TableMaskError::csv(format!("Failed to parse CSV row {}", index + 1), e))?;
        if record.len() != width {
            return Err(TableMaskError::malformed(format!(
                "row {} has {} fields, expected {}",
                index + 1,
                record.len(),
                width
            )));
        }
        for (column, field) in raw.iter_mut().zip(record.iter()) {
            column.push((!MISSING_MARKERS.contains(&field)).then(|| field.to_string()));
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, values)| Column::new(name, infer_cells(values)))
        .collect();

    let dataset = Dataset::new(columns)?;
    tracing::debug!(
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "parsed CSV input"
    );
    Ok(dataset)
}

/// Decodes as strict UTF-8, falling back to windows-1252.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(_) => {
            tracing::debug!("input is not valid UTF-8, decoding as windows-1252");
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text
        }
    }
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            let result = if *count == 0 {
                name
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            result
        })
        .collect()
}

/// Infers one cell type for the whole column from its non-missing fields.
fn infer_cells(values: Vec<Option<String>>) -> Vec<CellValue> {
    let present = || values.iter().flatten();

    if present().next().is_none() {
        return vec![CellValue::Null; values.len()];
    }

    if present().all(|v| v.parse::<i64>().is_ok()) {
        return values
            .iter()
            .map(|v| {
                v.as_deref()
                    .and_then(|s| s.parse::<i64>().ok())
                    .map_or(CellValue::Null, CellValue::Int)
            })
            .collect();
    }

    if present().all(|v| v.parse::<f64>().is_ok()) {
        return values
            .iter()
            .map(|v| {
                v.as_deref()
                    .and_then(|s| s.parse::<f64>().ok())
                    .map_or(CellValue::Null, CellValue::Float)
            })
            .collect();
    }

    if present().all(|v| BOOL_TRUE.contains(&v.as_str()) || BOOL_FALSE.contains(&v.as_str())) {
        return values
            .iter()
            .map(|v| match v {
                Some(s) => CellValue::Bool(BOOL_TRUE.contains(&s.as_str())),
                None => CellValue::Null,
            })
            .collect();
    }

    values.into_iter().map(CellValue::from).collect()
}
