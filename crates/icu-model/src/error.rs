//! Configuration error types.
//!
//! Every variant is raised before any table is read.

use thiserror::Error;

use crate::enums::Segment;

/// Invalid run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Debug subsampling and the cache were requested together.
    #[error("caching is not supported in debug mode")]
    DebugWithCache,

    /// A required role is missing from the variable map.
    #[error("variable map has no '{role}' entry")]
    MissingVariable { role: String },

    /// A role holds a column list where a single column was expected, or vice versa.
    #[error("variable map entry '{role}' has the wrong shape: expected {expected}")]
    VariableShape { role: String, expected: &'static str },

    /// A segment needed by the run has no file name.
    #[error("no file name configured for segment {segment}")]
    MissingSegment { segment: Segment },

    /// Neither a Static nor an Outcome segment is available to enumerate subjects.
    #[error("at least one of the STATIC or OUTCOME segments is required to enumerate subjects")]
    NoSubjectSource,

    /// A cross-validation split count below two.
    #[error("{name} must be at least 2, got {value}")]
    InvalidSplitCount { name: &'static str, value: usize },

    /// A fold index outside of `0..count`.
    #[error("{name} {index} is out of range for {count} splits")]
    IndexOutOfRange {
        name: &'static str,
        index: usize,
        count: usize,
    },

    /// A segment or split name that is not recognised.
    #[error("unknown {kind} name '{value}'")]
    UnknownName { kind: &'static str, value: String },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {message}")]
    Parse { message: String },
}

/// Result type for configuration checks.
pub type Result<T> = std::result::Result<T, ConfigError>;
