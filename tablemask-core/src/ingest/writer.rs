//! CSV export.

use std::io::Write;

use crate::{Dataset, Result, TableMaskError};

/// Writes `dataset` as CSV with a header row. Missing values become empty
/// fields.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(dataset.column_names())
        .map_err(|e| TableMaskError::csv("Failed to write CSV header", e))?;

    for index in 0..dataset.row_count() {
        let Some(row) = dataset.row(index) else {
            break;
        };
        let record: Vec<String> = row
            .into_iter()
            .map(|cell| cell.to_text().unwrap_or_default())
            .collect();
        csv_writer
            .write_record(&record)
            .map_err(|e| TableMaskError::csv(format!("Failed to write CSV row {}", index + 1), e))?;
    }

    csv_writer
        .flush()
        .map_err(|e| TableMaskError::io("Failed to flush CSV output", e))
}
