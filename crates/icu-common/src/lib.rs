//! Shared utilities for the ICU cohort preparation crates.
//!
//! Subject identifiers and labels arrive in whatever dtype the source table
//! used (integer stay ids, string patient ids, boolean or integer labels).
//! The helpers here turn such values into stable string keys so that
//! membership tests and class grouping never depend on the column dtype.

mod polars;

pub use polars::{column_keys, format_numeric, series_keys, value_key};
