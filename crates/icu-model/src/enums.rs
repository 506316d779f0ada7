//! Type-safe enumerations for segments, splits and run modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A named category of tabular data within a dataset.
///
/// - **Static**: one row per subject (demographics, admission features)
/// - **Dynamic**: many rows per subject, ordered by a time index
/// - **Outcome**: one or more rows per subject carrying labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Segment {
    Outcome,
    Static,
    Dynamic,
}

impl Segment {
    /// All segments in canonical order.
    pub const ALL: [Segment; 3] = [Segment::Outcome, Segment::Static, Segment::Dynamic];

    /// Returns the canonical name, as used in file-name and variable maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Outcome => "OUTCOME",
            Segment::Static => "STATIC",
            Segment::Dynamic => "DYNAMIC",
        }
    }

    /// Whether the segment is expected to hold every subject of the cohort.
    ///
    /// A subject missing from one of these segments is a data integrity
    /// failure rather than an absence of measurements.
    pub fn is_authoritative(&self) -> bool {
        matches!(self, Segment::Static | Segment::Outcome)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OUTCOME" => Ok(Segment::Outcome),
            "STATIC" => Ok(Segment::Static),
            "DYNAMIC" => Ok(Segment::Dynamic),
            _ => Err(ConfigError::UnknownName {
                kind: "segment",
                value: s.to_string(),
            }),
        }
    }
}

/// One of the three disjoint partitions of the cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    /// All splits in canonical order.
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            _ => Err(ConfigError::UnknownName {
                kind: "split",
                value: s.to_string(),
            }),
        }
    }
}

/// Task mode of the run.
///
/// Only classification admits label-stratified splitting; regression always
/// uses plain k-fold even when a label column exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Classification,
    Regression,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Classification => "classification",
            RunMode::Regression => "regression",
        }
    }

    /// Whether label-stratified folds may be used in this mode.
    pub fn allows_stratification(&self) -> bool {
        matches!(self, RunMode::Classification)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
