//! Split assignments and dataset containers.

use std::collections::{BTreeMap, HashSet};

use polars::prelude::*;

use crate::enums::{Segment, Split};

/// One table per segment, all sharing the subject identifier column.
pub type Dataset = BTreeMap<Segment, DataFrame>;

/// Per-split, per-segment tables: the shape returned by preprocessing and
/// stored in the cache.
pub type SplitData = BTreeMap<Split, Dataset>;

/// Partition of the cohort's subject ids into train, validation and test.
///
/// Each series keeps the dtype of the source identifier column. The three
/// series are pairwise disjoint and together cover the (possibly
/// subsampled) cohort.
#[derive(Debug, Clone)]
pub struct SplitAssignment {
    pub train: Series,
    pub val: Series,
    pub test: Series,
}

impl SplitAssignment {
    pub fn get(&self, split: Split) -> &Series {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    /// Iterate over the splits in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Split, &Series)> {
        Split::ALL.into_iter().map(move |split| (split, self.get(split)))
    }

    /// Total number of assigned subjects.
    pub fn len(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element-wise equality of all three splits, order included.
    pub fn equals(&self, other: &Self) -> bool {
        self.train.equals_missing(&other.train)
            && self.val.equals_missing(&other.val)
            && self.test.equals_missing(&other.test)
    }

    /// Whether no subject id appears in more than one split or twice in one.
    pub fn is_disjoint(&self) -> PolarsResult<bool> {
        let mut seen = HashSet::with_capacity(self.len());
        for (_, series) in self.iter() {
            for idx in 0..series.len() {
                if !seen.insert(series.get(idx)?.to_string()) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
