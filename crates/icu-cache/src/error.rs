//! Cache error types.
//!
//! A miss is an ordinary outcome that callers answer by recomputing; every
//! other variant is surfaced unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Cache operation error.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No cache file exists for the requested key.
    #[error("no cached data at {path}")]
    Miss { path: PathBuf },

    /// File I/O error.
    #[error("Failed to {operation} cache file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a cache file, or a payload that does not describe a split dataset.
    #[error("Invalid cache file format: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Written by a newer schema.
    #[error("Cache file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Serialization error.
    #[error("Failed to serialize cache data")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization error.
    #[error("Failed to deserialize cache data")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete cache write")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Whether this is a plain cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss { .. })
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Miss { .. } => {
                Some("Run once with generate_cache enabled to populate the cache.".into())
            }
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the cache file is readable.".into())
                } else {
                    Some("Check that the data directory is writable.".into())
                }
            }
            Self::InvalidFormat { .. } | Self::Deserialization { .. } => {
                Some("Delete the cache file; it will be regenerated on the next run.".into())
            }
            Self::UnsupportedVersion { .. } => {
                Some("Regenerate the cache with this version or upgrade.".into())
            }
            Self::Serialization { .. } => None,
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space in the data directory.".into())
            }
        }
    }
}

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
