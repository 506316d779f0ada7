//! Cache key derivation.

use std::fmt;

use icu_model::{FileNames, VariableMap};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{CacheError, Result};

/// Digest of everything that shapes a preprocessed dataset.
///
/// Hashes `preprocessor_state`, then the file-name map and variable map as
/// compact JSON with sorted keys, then the debug flag. Fold coordinates and
/// the seed are deliberately left out; they live in the [`CacheKey`] prefix.
pub fn fingerprint(
    preprocessor_state: &str,
    file_names: &FileNames,
    vars: &VariableMap,
    debug: bool,
) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(preprocessor_state.as_bytes());
    hasher.update(sorted_json(file_names)?.as_bytes());
    hasher.update(sorted_json(vars)?.as_bytes());
    hasher.update(if debug { "True" } else { "False" }.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Compact JSON with object keys in sorted order.
fn sorted_json<T: Serialize>(value: &T) -> Result<String> {
    // serde_json::Value objects are key-ordered maps
    let value = serde_json::to_value(value).map_err(|e| CacheError::Serialization {
        source: Box::new(e),
    })?;
    Ok(value.to_string())
}

/// Name of one cache artifact: fold coordinates plus configuration digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub seed: u64,
    pub repetition_index: usize,
    pub fold_index: usize,
    pub digest: String,
}

impl CacheKey {
    pub fn new(
        seed: u64,
        repetition_index: usize,
        fold_index: usize,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            seed,
            repetition_index,
            fold_index,
            digest: digest.into(),
        }
    }

    /// File name of the artifact, `s_<seed>_r_<rep>_f_<fold>_<digest>`.
    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "s_{}_r_{}_f_{}_{}",
            self.seed, self.repetition_index, self.fold_index, self.digest
        )
    }
}
