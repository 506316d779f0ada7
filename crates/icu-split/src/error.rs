//! Splitting and reconciliation errors.

use icu_model::{ConfigError, Segment, Split};
use thiserror::Error;

/// Errors raised while partitioning subjects or reconciling segments.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Invalid fold coordinates or split counts.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fewer subjects than requested folds.
    #[error("cannot split {n_samples} subjects into {n_splits} folds")]
    TooFewSamples { n_samples: usize, n_splits: usize },

    /// Label series does not line up with the subject ids.
    #[error("label series has {labels} values for {ids} subject ids")]
    LabelLength { ids: usize, labels: usize },

    /// Stratification requested but some subjects have no label.
    #[error("{count} subjects have no label; stratified splitting needs every label")]
    MissingLabel { count: usize },

    /// A segment table lacks the subject identifier column.
    #[error("segment {segment} has no '{column}' column")]
    MissingColumn { segment: Segment, column: String },

    /// Subjects assigned to a split are absent from an authoritative segment.
    #[error("segment {segment} is missing {missing} of the subjects assigned to {split}")]
    DataIntegrity {
        segment: Segment,
        split: Split,
        missing: usize,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for SplitError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for splitting operations.
pub type Result<T> = std::result::Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SplitError::DataIntegrity {
            segment: Segment::Outcome,
            split: Split::Val,
            missing: 3,
        };
        assert_eq!(
            err.to_string(),
            "segment OUTCOME is missing 3 of the subjects assigned to val"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: SplitError = ConfigError::NoSubjectSource.into();
        assert_eq!(err.to_string(), ConfigError::NoSubjectSource.to_string());
    }
}
