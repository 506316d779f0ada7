//! Orchestrator errors.

use std::path::PathBuf;

use icu_cache::CacheError;
use icu_ingest::IngestError;
use icu_model::ConfigError;
use icu_split::SplitError;
use thiserror::Error;

/// Errors surfaced by [`preprocess_data`](crate::preprocess_data).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration, raised before any data is loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The preprocessor failed on the split data.
    #[error("preprocessor '{name}' failed: {message}")]
    Preprocessor { name: String, message: String },

    /// The preprocessor changed the split/segment layout of its input.
    #[error("preprocessor '{name}' returned {found}, expected {expected}")]
    ShapeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl PipelineError {
    /// Whether this is a configuration error (fatal, raised before I/O).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PipelineError::Config(_) | PipelineError::Split(SplitError::Config(_))
        )
    }

    /// Whether the input data is inconsistent with itself.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            PipelineError::Split(
                SplitError::DataIntegrity { .. }
                    | SplitError::MissingLabel { .. }
                    | SplitError::MissingColumn { .. }
            )
        )
    }
}

impl From<polars::prelude::PolarsError> for PipelineError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
