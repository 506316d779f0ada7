//! Serialized form of a split dataset.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use icu_model::{Dataset, Segment, Split, SplitData};
use polars::prelude::*;
use rkyv::{Archive, Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Current schema version.
///
/// Increment this when making breaking changes to the cache format.
/// The loader will reject files with version > CURRENT_SCHEMA_VERSION.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Magic bytes at the start of cache files.
///
/// Format: "ICU" + version byte (0x01 for v1)
pub const MAGIC_BYTES: [u8; 4] = [b'I', b'C', b'U', 0x01];

/// Split name -> segment name -> parquet-encoded table.
#[derive(Debug, Clone, Default, PartialEq, Archive, Serialize, Deserialize)]
pub struct CacheBundle {
    pub splits: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
}

impl CacheBundle {
    /// Encode every table of `data` as parquet.
    pub fn encode(data: &SplitData) -> Result<Self> {
        let mut splits = BTreeMap::new();
        for (split, dataset) in data {
            let mut segments = BTreeMap::new();
            for (segment, table) in dataset {
                let bytes = encode_table(table).map_err(|e| CacheError::Serialization {
                    source: Box::new(e),
                })?;
                segments.insert(segment.as_str().to_string(), bytes);
            }
            splits.insert(split.as_str().to_string(), segments);
        }
        Ok(Self { splits })
    }

    /// Decode back into tables; `path` is only used for error reporting.
    pub fn decode(self, path: &Path) -> Result<SplitData> {
        let invalid = |reason: String| CacheError::InvalidFormat {
            path: path.to_path_buf(),
            reason,
        };

        let mut data = SplitData::new();
        for (split_name, segments) in self.splits {
            let split: Split = split_name.parse().map_err(|e| invalid(format!("{e}")))?;
            let mut dataset = Dataset::new();
            for (segment_name, bytes) in segments {
                let segment: Segment = segment_name.parse().map_err(|e| invalid(format!("{e}")))?;
                let table = decode_table(bytes).map_err(|e| CacheError::Deserialization {
                    source: Box::new(e),
                })?;
                dataset.insert(segment, table);
            }
            data.insert(split, dataset);
        }
        Ok(data)
    }

    /// Serialize to the on-disk format (magic, version, rkyv payload).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let rkyv_bytes = rkyv::to_bytes::<rkyv::rancor::Error>(self).map_err(|e| {
            CacheError::Serialization {
                source: Box::new(std::io::Error::other(format!(
                    "rkyv serialization failed: {e}"
                ))),
            }
        })?;

        let mut output = Vec::with_capacity(8 + rkyv_bytes.len());
        output.extend_from_slice(&MAGIC_BYTES);
        output.extend_from_slice(&CURRENT_SCHEMA_VERSION.to_le_bytes());
        output.extend_from_slice(&rkyv_bytes);
        Ok(output)
    }

    /// Parse the on-disk format and validate its header.
    pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
        // Minimum size: magic (4) + version (4) + some payload
        if bytes.len() < 12 {
            return Err(CacheError::InvalidFormat {
                path: path.to_path_buf(),
                reason: "File too small".to_string(),
            });
        }

        if bytes[0..4] != MAGIC_BYTES {
            return Err(CacheError::InvalidFormat {
                path: path.to_path_buf(),
                reason: "Not a cache file (invalid magic bytes)".to_string(),
            });
        }

        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version > CURRENT_SCHEMA_VERSION {
            return Err(CacheError::UnsupportedVersion {
                found: version,
                max_supported: CURRENT_SCHEMA_VERSION,
                path: path.to_path_buf(),
            });
        }

        // rkyv validates alignment, so copy the payload out of the header offset
        let mut payload = rkyv::util::AlignedVec::<16>::with_capacity(bytes.len() - 8);
        payload.extend_from_slice(&bytes[8..]);

        rkyv::from_bytes::<CacheBundle, rkyv::rancor::Error>(&payload).map_err(|e| {
            CacheError::Deserialization {
                source: Box::new(std::io::Error::other(format!(
                    "rkyv deserialization failed: {e}"
                ))),
            }
        })
    }
}

fn encode_table(table: &DataFrame) -> PolarsResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut table = table.clone();
    ParquetWriter::new(&mut buffer).finish(&mut table)?;
    Ok(buffer)
}

fn decode_table(bytes: Vec<u8>) -> PolarsResult<DataFrame> {
    ParquetReader::new(Cursor::new(bytes)).finish()
}
