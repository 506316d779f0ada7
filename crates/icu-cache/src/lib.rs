//! Content-addressed cache for split and preprocessed datasets.
//!
//! Splitting and preprocessing a cohort is expensive; this crate memoizes the
//! result on disk under a key derived from everything that shapes it.
//!
//! # Features
//!
//! - **Fingerprints**: SHA-256 over the preprocessor state and the key-sorted
//!   file-name and variable maps, so construction order never matters
//! - **Readable file names**: `s_<seed>_r_<rep>_f_<fold>_<digest>`
//! - **Atomic writes** to prevent torn cache files
//!
//! # File Format
//!
//! Cache files use a simple binary format:
//!
//! ```text
//! +------------------+
//! | Magic: "ICU\x01" | 4 bytes - file identification
//! +------------------+
//! | Version: 1       | 4 bytes - u32 little-endian schema version
//! +------------------+
//! | rkyv Payload     | Variable - split -> segment -> parquet bytes
//! +------------------+
//! ```
//!
//! # Example
//!
//! ```ignore
//! use icu_cache::{CacheKey, CacheStore, fingerprint};
//!
//! let digest = fingerprint(&preprocessor.to_cache_string(), &file_names, &vars, false)?;
//! let key = CacheKey::new(42, 0, 0, digest);
//! let store = CacheStore::new(data_dir);
//!
//! if store.exists(&key) {
//!     let data = store.load(&key)?;
//! }
//! store.save(&key, &split_data)?;
//! ```

mod bundle;
mod error;
mod fingerprint;
mod store;

pub use bundle::{CURRENT_SCHEMA_VERSION, CacheBundle, MAGIC_BYTES};
pub use error::{CacheError, Result};
pub use fingerprint::{CacheKey, fingerprint};
pub use store::{CACHE_DIR_NAME, CacheStore};
