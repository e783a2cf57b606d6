//! Error types for tablemask operations.
//!
//! Error messages carry column names, row numbers and counts, never cell
//! values. A failed anonymization must not leak the data it was protecting
//! through its own diagnostics.

use thiserror::Error;

/// Main error type for tablemask operations.
#[derive(Debug, Error)]
pub enum TableMaskError {
    /// Input is not a well-formed table (ragged rows, duplicate headers, ...)
    #[error("Malformed input: {message}")]
    MalformedInput {
        /// What is wrong, with row or column position
        message: String,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Which setting is invalid and why
        message: String,
    },

    /// Anonymization of a column failed; the whole run is aborted
    #[error("Anonymization failed for column '{column}': {reason}")]
    Anonymization {
        /// Column being masked
        column: String,
        /// Why masking failed
        reason: String,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// Operation that failed
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing or writing failed
    #[error("CSV processing failed: {context}")]
    Csv {
        /// Operation that failed
        context: String,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        /// Operation that failed
        context: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with TableMaskError
pub type Result<T> = std::result::Result<T, TableMaskError>;

impl TableMaskError {
    /// Creates a malformed input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an anonymization error for the given column
    pub fn anonymization(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Anonymization {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a CSV error with context
    pub fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }
}
