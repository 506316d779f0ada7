//! Nested cross-validation splitting for ICU cohorts.
//!
//! Subjects are partitioned in two levels: an outer k-fold over the whole
//! cohort selects the test fold, and an inner k-fold over the remaining
//! (development) subjects selects the validation fold. Both levels are
//! seeded, so every `(seed, repetition_index, fold_index)` addresses one
//! reproducible split.
//!
//! # Overview
//!
//! - **Fold generators**: [`KFold`] and label-balanced [`StratifiedKFold`]
//! - **Debug subsampling**: [`debug_subsample`] draws a seeded 1% sample
//! - **Nested splitting**: [`NestedSplitter`] produces a [`SplitAssignment`]
//! - **Reconciliation**: [`reconcile`] restricts every segment table to each
//!   split's subjects in ascending subject order
//!
//! # Example
//!
//! ```ignore
//! use icu_model::{FoldCoordinates, RunMode};
//! use icu_split::{NestedSplitter, reconcile};
//!
//! let coords = FoldCoordinates::new(5, 0, 5, 0, 42)?;
//! let splitter = NestedSplitter::new(coords, RunMode::Classification);
//! let assignment = splitter.split(&stay_ids, Some(&labels))?;
//! let split_data = reconcile(&dataset, &assignment, "stay_id")?;
//! ```
//!
//! [`SplitAssignment`]: icu_model::SplitAssignment

mod error;
mod kfold;
mod nested;
mod reconcile;
mod subsample;

pub use error::{Result, SplitError};
pub use kfold::{Fold, KFold, StratifiedKFold};
pub use nested::{NestedSplitter, SplitPositions, SplitStrategy};
pub use reconcile::{reconcile, reconcile_segment};
pub use subsample::{DEBUG_FRACTION, debug_sample_size, debug_subsample};
