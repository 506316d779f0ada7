//! Preprocessing orchestrator for ICU cohort data.
//!
//! [`preprocess_data`] turns a directory of raw segment tables into
//! train/val/test data for one cross-validation fold:
//!
//! 1. Derive the effective configuration and reject invalid combinations
//!    before touching the disk
//! 2. Return the cached result if one exists and caching is enabled
//! 3. Load the raw segments, split the subjects and reconcile every segment
//!    against each split
//! 4. Hand the split data to a [`Preprocessor`] and optionally cache the output
//!
//! # Example
//!
//! ```ignore
//! use icu_preprocess::{PassthroughPreprocessor, PreprocessConfig, preprocess_data};
//!
//! let config = PreprocessConfig::from_toml_file(Path::new("preprocess.toml"))?;
//! let mut preprocessor = PassthroughPreprocessor::new(config.use_static);
//! let data = preprocess_data(data_dir, &config, &mut preprocessor, None)?;
//! let train_static = &data[&Split::Train][&Segment::Static];
//! ```

mod config;
mod error;
mod pipeline;
mod preprocessor;

pub use config::PreprocessConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{preprocess_data, subject_labels};
pub use preprocessor::{
    ImputationBinding, ImputationModel, PassthroughPreprocessor, Preprocessor,
};
