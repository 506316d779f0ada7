//! Run configuration.

use std::fs;
use std::path::Path;

use icu_model::{ConfigError, FileNames, FoldCoordinates, RunMode, Segment, VariableMap};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Everything that selects and shapes one preprocessing run.
///
/// Missing TOML keys take the defaults below. `file_names` defaults to the
/// conventional `sta.parquet`, `dyn.parquet` and `outc.parquet`; `vars` has
/// no default and must name at least the `GROUP` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub seed: u64,
    /// Work on a 1% subsample of the subjects.
    pub debug: bool,
    pub cv_repetitions: usize,
    pub repetition_index: usize,
    pub cv_folds: usize,
    pub fold_index: usize,
    /// Keep the STATIC segment. When false it is dropped from both maps.
    pub use_static: bool,
    pub load_cache: bool,
    pub generate_cache: bool,
    /// Replace an existing cache artifact when generating.
    pub overwrite_cache: bool,
    pub run_mode: RunMode,
    pub file_names: FileNames,
    pub vars: VariableMap,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            debug: false,
            cv_repetitions: 5,
            repetition_index: 0,
            cv_folds: 5,
            fold_index: 0,
            use_static: true,
            load_cache: false,
            generate_cache: false,
            overwrite_cache: true,
            run_mode: RunMode::default(),
            file_names: FileNames::new()
                .with(Segment::Static, "sta.parquet")
                .with(Segment::Dynamic, "dyn.parquet")
                .with(Segment::Outcome, "outc.parquet"),
            vars: VariableMap::new(),
        }
    }
}

impl PreprocessConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            PipelineError::Config(ConfigError::Parse {
                message: e.to_string(),
            })
        })
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded preprocessing config from {}", path.display());
        Ok(config)
    }

    pub fn coordinates(&self) -> FoldCoordinates {
        FoldCoordinates {
            cv_repetitions: self.cv_repetitions,
            repetition_index: self.repetition_index,
            cv_folds: self.cv_folds,
            fold_index: self.fold_index,
            seed: self.seed,
        }
    }

    /// The configuration actually used for a run.
    ///
    /// With `use_static` disabled the STATIC segment is removed from the
    /// file-name and variable maps. `self` is left untouched.
    #[must_use]
    pub fn derive(&self) -> Self {
        if self.use_static {
            return self.clone();
        }
        let static_role = Segment::Static.as_str();
        Self {
            file_names: self.file_names.without(Segment::Static),
            vars: self.vars.without(static_role),
            ..self.clone()
        }
    }

    /// Check the configuration without touching the disk.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.debug && (self.load_cache || self.generate_cache) {
            return Err(ConfigError::DebugWithCache);
        }

        self.vars.group()?;
        // shape checks for the optional single-column roles
        let label = self.vars.label()?;
        self.vars.sequence()?;

        self.file_names.subject_source()?;
        self.coordinates().validate()?;

        if label.is_some()
            && self.run_mode.allows_stratification()
            && !self.file_names.contains(Segment::Outcome)
        {
            return Err(ConfigError::MissingSegment {
                segment: Segment::Outcome,
            });
        }

        Ok(())
    }
}
