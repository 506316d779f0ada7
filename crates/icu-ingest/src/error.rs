//! Error types for segment data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading raw tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Table file not found.
    #[error("table file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// File extension does not name a supported table format.
    #[error("unsupported table format for {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Failed to parse the table with Polars.
    #[error("failed to parse {format} table {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    /// Table has a column with an empty name.
    #[error("table has an empty column name: {path}")]
    EmptyColumnName { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/sta.parquet"),
        };
        assert_eq!(err.to_string(), "table file not found: /data/sta.parquet");
    }

    #[test]
    fn test_parse_error_names_format_and_path() {
        let err = IngestError::Parse {
            path: PathBuf::from("/data/dyn.csv"),
            format: "csv",
            message: "could not parse `x` as i64".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse csv table /data/dyn.csv: could not parse `x` as i64"
        );
    }
}
