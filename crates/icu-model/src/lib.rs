//! Data model types for ICU cohort preparation.
//!
//! A run works on a [`Dataset`]: one Polars table per [`Segment`], all keyed
//! by the subject identifier column named by the `GROUP` role of the
//! [`VariableMap`]. Splitting produces a [`SplitAssignment`] of subject ids
//! per [`Split`], and reconciling it against the dataset produces
//! [`SplitData`].
//!
//! # Module Organization
//!
//! - [`enums`]: Segment, Split and RunMode
//! - [`vars`]: Variable map and file-name map
//! - [`fold`]: Cross-validation fold coordinates
//! - [`split`]: Split assignments and the dataset containers
//! - [`error`]: Configuration errors

pub mod enums;
pub mod error;
pub mod fold;
pub mod split;
pub mod vars;

pub use enums::{RunMode, Segment, Split};
pub use error::{ConfigError, Result};
pub use fold::FoldCoordinates;
pub use split::{Dataset, SplitAssignment, SplitData};
pub use vars::{FileNames, VarSpec, VariableMap};
