//! On-disk cache store.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use icu_model::SplitData;

use crate::bundle::CacheBundle;
use crate::error::{CacheError, Result};
use crate::fingerprint::CacheKey;

/// Name of the cache subdirectory inside a data directory.
pub const CACHE_DIR_NAME: &str = "cache";

/// Cache of split datasets, one file per [`CacheKey`], under `<data_dir>/cache`.
///
/// The store is the only component that creates the cache directory or
/// writes into it. Concurrent writers to the same key are not arbitrated;
/// distinct fold coordinates always map to distinct files.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    overwrite: bool,
}

impl CacheStore {
    /// A store for the data directory `data_dir`. Overwrites by default.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join(CACHE_DIR_NAME),
            overwrite: true,
        }
    }

    /// Whether `save` replaces an existing artifact.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn exists(&self, key: &CacheKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Load the artifact for `key`, or [`CacheError::Miss`] if there is none.
    pub fn load(&self, key: &CacheKey) -> Result<SplitData> {
        let path = self.path_for(key);
        let bytes = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CacheError::Miss { path: path.clone() }
            } else {
                CacheError::Io {
                    operation: "read",
                    path: path.clone(),
                    source: e,
                }
            }
        })?;

        let data = CacheBundle::from_bytes(&bytes, &path)?.decode(&path)?;
        tracing::info!("Loaded cached data from {}", path.display());
        Ok(data)
    }

    /// Persist `data` under `key`.
    ///
    /// Returns `Ok(false)` without touching the disk when the artifact exists
    /// and overwriting is disabled. Writes go to a temp file that is renamed
    /// into place, so readers never observe a partial artifact.
    pub fn save(&self, key: &CacheKey, data: &SplitData) -> Result<bool> {
        let path = self.path_for(key);
        if !self.overwrite && path.exists() {
            tracing::info!("Cache file {} exists, not overwriting", path.display());
            return Ok(false);
        }

        let bytes = CacheBundle::encode(data)?.to_bytes()?;

        fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            operation: "create directory",
            path: self.dir.clone(),
            source: e,
        })?;

        let temp_path = path.with_extension("tmp");
        let written = write_synced(&temp_path, &bytes).and_then(|()| {
            fs::rename(&temp_path, &path).map_err(|e| CacheError::AtomicWriteFailed {
                temp_path: temp_path.clone(),
                target_path: path.clone(),
                source: e,
            })
        });
        if let Err(e) = written {
            match fs::remove_file(&temp_path) {
                Err(cleanup) if cleanup.kind() != std::io::ErrorKind::NotFound => {
                    tracing::warn!(
                        path = %temp_path.display(),
                        error = %cleanup,
                        "Failed to remove temporary cache file"
                    );
                }
                _ => {}
            }
            return Err(e);
        }

        tracing::info!("Cached data in {}", path.display());
        Ok(true)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_error = |operation: &'static str| {
        move |e: std::io::Error| CacheError::Io {
            operation,
            path: path.to_path_buf(),
            source: e,
        }
    };

    let mut file = File::create(path).map_err(io_error("create"))?;
    file.write_all(bytes).map_err(io_error("write"))?;
    file.sync_all().map_err(io_error("sync"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::MAGIC_BYTES;
    use icu_model::{Dataset, Segment, Split};
    use polars::prelude::*;
    use tempfile::tempdir;

    fn sample_data() -> SplitData {
        let mut dataset = Dataset::new();
        dataset.insert(
            Segment::Static,
            df!("stay_id" => [1i64, 2], "age" => [40.0, 55.5]).unwrap(),
        );
        let mut data = SplitData::new();
        data.insert(Split::Train, dataset);
        data
    }

    fn key() -> CacheKey {
        CacheKey::new(42, 0, 1, "deadbeef")
    }

    #[test]
    fn test_cache_dir_layout() {
        let store = CacheStore::new(Path::new("/data/mimic"));
        assert_eq!(store.dir(), Path::new("/data/mimic/cache"));
        assert_eq!(
            store.path_for(&key()),
            PathBuf::from("/data/mimic/cache/s_42_r_0_f_1_deadbeef")
        );
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        assert!(!store.dir().exists());

        assert!(store.save(&key(), &sample_data()).unwrap());

        assert!(store.exists(&key()));
        let bytes = fs::read(store.path_for(&key())).unwrap();
        assert_eq!(&bytes[0..4], &MAGIC_BYTES);
        assert!(!store.path_for(&key()).with_extension("tmp").exists());
    }

    #[test]
    fn test_load_missing_is_miss() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let err = store.load(&key()).unwrap_err();
        assert!(err.is_miss());
    }

    #[test]
    fn test_no_overwrite_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path()).with_overwrite(false);
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path_for(&key()), b"existing").unwrap();

        assert!(!store.save(&key(), &sample_data()).unwrap());
        assert_eq!(fs::read(store.path_for(&key())).unwrap(), b"existing");
    }

    #[test]
    fn test_overwrite_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path_for(&key()), b"existing").unwrap();

        assert!(store.save(&key(), &sample_data()).unwrap());
        assert!(store.load(&key()).is_ok());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        // a directory at the target path makes the final rename fail
        fs::create_dir_all(store.path_for(&key())).unwrap();

        let err = store.save(&key(), &sample_data()).unwrap_err();

        assert!(matches!(err, CacheError::AtomicWriteFailed { .. }));
        assert!(!store.path_for(&key()).with_extension("tmp").exists());
        let entries: Vec<_> = fs::read_dir(store.dir()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_load_invalid_magic() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.path_for(&key()), b"NOT_A_CACHE_FILE_DATA").unwrap();

        assert!(matches!(
            store.load(&key()),
            Err(CacheError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_load_unsupported_version() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        fs::create_dir_all(store.dir()).unwrap();

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC_BYTES);
        bytes.extend_from_slice(&999u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 100]);
        fs::write(store.path_for(&key()), bytes).unwrap();

        assert!(matches!(
            store.load(&key()),
            Err(CacheError::UnsupportedVersion { found: 999, .. })
        ));
    }
}
