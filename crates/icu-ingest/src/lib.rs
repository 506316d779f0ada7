//! ICU segment data ingestion.
//!
//! This crate loads the raw segment tables of a dataset (static, dynamic and
//! outcome) into Polars DataFrames.
//!
//! # Features
//!
//! - **Format detection**: parquet (columnar) and CSV/TSV (row-oriented) by extension
//! - **Dataset loading**: resolve a file-name map against a data directory
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use icu_ingest::{load_dataset, load_table};
//! use icu_model::{FileNames, Segment};
//!
//! let files = FileNames::new()
//!     .with(Segment::Static, "sta.parquet")
//!     .with(Segment::Outcome, "outc.parquet");
//!
//! let dataset = load_dataset(Path::new("data/mortality24/mimic"), &files)?;
//! let dynamic = load_table(Path::new("data/mortality24/mimic/dyn.csv"))?;
//! ```

mod dataset;
mod error;
mod format;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Table Reading ===
pub use format::TableFormat;
pub use reader::{load_table, validate_dataframe_shape};

// === Dataset Loading ===
pub use dataset::load_dataset;
