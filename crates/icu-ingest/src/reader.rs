//! Table reading for the supported formats.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};
use crate::format::TableFormat;

/// Reads a raw table into a Polars DataFrame.
///
/// The format is chosen from the file extension: parquet files are read
/// column-wise, CSV and TSV files row-wise with a single header row.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    let format = TableFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let parse_error = |e: PolarsError| IngestError::Parse {
        path: path.to_path_buf(),
        format: format.as_str(),
        message: e.to_string(),
    };

    let df = match format.separator() {
        None => ParquetReader::new(file).finish().map_err(parse_error)?,
        Some(separator) => CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .map_parse_options(|options| options.with_separator(separator))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(parse_error)?,
    };

    validate_dataframe_shape(&df, path)?;

    tracing::debug!(
        path = %path.display(),
        format = format.as_str(),
        rows = df.height(),
        columns = df.width(),
        "Loaded table"
    );

    Ok(df)
}

/// Validate DataFrame shape after loading.
///
/// Rejects empty column names and warns about empty tables.
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.height() == 0 {
        tracing::warn!(path = %path.display(), "Table has no rows");
    }

    for name in df.get_column_names() {
        if name.trim().is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}
