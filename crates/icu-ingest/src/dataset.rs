//! Dataset loading from a file-name map.

use std::path::Path;

use icu_model::{Dataset, FileNames};

use crate::error::Result;
use crate::reader::load_table;

/// Load every segment named in `file_names` from `data_dir`.
pub fn load_dataset(data_dir: &Path, file_names: &FileNames) -> Result<Dataset> {
    let mut dataset = Dataset::new();

    for (segment, path) in file_names.resolve(data_dir) {
        let df = load_table(&path)?;
        tracing::debug!(
            segment = %segment,
            rows = df.height(),
            columns = df.width(),
            "Loaded segment"
        );
        dataset.insert(segment, df);
    }

    Ok(dataset)
}
