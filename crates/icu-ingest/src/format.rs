//! Table format detection.

use std::path::Path;

/// On-disk format of a raw table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Apache Parquet (columnar).
    Parquet,
    /// Comma separated values.
    Csv,
    /// Tab separated values.
    Tsv,
}

impl TableFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "parquet" | "pq" => Some(TableFormat::Parquet),
            "csv" => Some(TableFormat::Csv),
            "tsv" | "txt" => Some(TableFormat::Tsv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::Parquet => "parquet",
            TableFormat::Csv => "csv",
            TableFormat::Tsv => "tsv",
        }
    }

    /// Field separator for the row-oriented formats.
    pub fn separator(&self) -> Option<u8> {
        match self {
            TableFormat::Parquet => None,
            TableFormat::Csv => Some(b','),
            TableFormat::Tsv => Some(b'\t'),
        }
    }
}
