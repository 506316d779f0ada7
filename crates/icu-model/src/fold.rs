//! Cross-validation fold coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Selects one outer and one inner fold of a nested cross-validation.
///
/// `repetition_index` picks the outer (test) fold out of `cv_repetitions`;
/// `fold_index` picks the inner (validation) fold out of `cv_folds`, drawn
/// from the outer fold's remaining subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoldCoordinates {
    pub cv_repetitions: usize,
    pub repetition_index: usize,
    pub cv_folds: usize,
    pub fold_index: usize,
    pub seed: u64,
}

impl FoldCoordinates {
    /// Create validated fold coordinates.
    ///
    /// Both split counts must be at least two; a single split has no
    /// held-out fold and is rejected as a configuration error.
    pub fn new(
        cv_repetitions: usize,
        repetition_index: usize,
        cv_folds: usize,
        fold_index: usize,
        seed: u64,
    ) -> Result<Self> {
        let coords = Self {
            cv_repetitions,
            repetition_index,
            cv_folds,
            fold_index,
            seed,
        };
        coords.validate()?;
        Ok(coords)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cv_repetitions < 2 {
            return Err(ConfigError::InvalidSplitCount {
                name: "cv_repetitions",
                value: self.cv_repetitions,
            });
        }
        if self.cv_folds < 2 {
            return Err(ConfigError::InvalidSplitCount {
                name: "cv_folds",
                value: self.cv_folds,
            });
        }
        if self.repetition_index >= self.cv_repetitions {
            return Err(ConfigError::IndexOutOfRange {
                name: "repetition_index",
                index: self.repetition_index,
                count: self.cv_repetitions,
            });
        }
        if self.fold_index >= self.cv_folds {
            return Err(ConfigError::IndexOutOfRange {
                name: "fold_index",
                index: self.fold_index,
                count: self.cv_folds,
            });
        }
        Ok(())
    }
}
