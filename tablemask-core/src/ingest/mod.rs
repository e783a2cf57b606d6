//! Tabular ingestion and export.
//!
//! Turns raw CSV bytes into a typed [`Dataset`](crate::Dataset), applies the
//! standard cleaning pass, and writes datasets back out as CSV.
//!
//! Decoding tries strict UTF-8 first and falls back to windows-1252, which
//! is a superset of Latin-1 for every printable byte, so decoding itself
//! never fails.

mod cleaning;
mod reader;
mod writer;

pub use cleaning::{CleaningConfig, DATE_FORMATS, clean_dataset};
pub use reader::{
    DEFAULT_MAX_FILE_SIZE_MB, IngestConfig, MISSING_MARKERS, read_csv_bytes, read_csv_path,
};
pub use writer::write_csv;
