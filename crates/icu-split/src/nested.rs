//! Two-level (outer test / inner validation) cross-validation splitting.

use icu_common::series_keys;
use icu_model::{FoldCoordinates, RunMode, SplitAssignment};
use polars::prelude::*;

use crate::error::{Result, SplitError};
use crate::kfold::{Fold, KFold, StratifiedKFold};
use crate::subsample::debug_subsample;

/// Fold generator family used for both levels of a nested split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Label-stratified k-fold.
    Stratified,
    /// Plain k-fold.
    Plain,
}

impl SplitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitStrategy::Stratified => "stratified",
            SplitStrategy::Plain => "plain",
        }
    }
}

/// Positions into the (possibly subsampled) id sequence for each split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPositions {
    pub train: Vec<usize>,
    pub val: Vec<usize>,
    pub test: Vec<usize>,
}

/// Partitions subject ids into train, validation and test.
///
/// The outer k-fold over all subjects (`cv_repetitions` folds) selects the
/// test fold at `repetition_index`; the inner k-fold over the remaining
/// development subjects (`cv_folds` folds) selects the validation fold at
/// `fold_index`. Both generators shuffle with the same seed.
#[derive(Debug, Clone, Copy)]
pub struct NestedSplitter {
    coords: FoldCoordinates,
    run_mode: RunMode,
    debug: bool,
}

impl NestedSplitter {
    pub fn new(coords: FoldCoordinates, run_mode: RunMode) -> Self {
        Self {
            coords,
            run_mode,
            debug: false,
        }
    }

    /// Subsample the cohort to 1% (seeded) before computing folds.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn coords(&self) -> &FoldCoordinates {
        &self.coords
    }

    /// Strategy for a run with or without a label series.
    ///
    /// Stratification needs both a label and a classification run; any other
    /// combination uses plain k-fold.
    pub fn strategy(&self, has_labels: bool) -> SplitStrategy {
        if has_labels && self.run_mode.allows_stratification() {
            SplitStrategy::Stratified
        } else {
            SplitStrategy::Plain
        }
    }

    /// Split `ids`, optionally stratifying on `labels` aligned to them.
    pub fn split(&self, ids: &Series, labels: Option<&Series>) -> Result<SplitAssignment> {
        self.coords.validate()?;

        if let Some(labels) = labels {
            if labels.len() != ids.len() {
                return Err(SplitError::LabelLength {
                    ids: ids.len(),
                    labels: labels.len(),
                });
            }
        }

        let (ids, labels) = if self.debug {
            let positions = debug_subsample(ids.len(), self.coords.seed);
            tracing::info!(
                kept = positions.len(),
                total = ids.len(),
                seed = self.coords.seed,
                "Debug mode: subsampling subjects"
            );
            let ids = take_positions(ids, &positions)?;
            let labels = labels
                .map(|labels| take_positions(labels, &positions))
                .transpose()?;
            (ids, labels)
        } else {
            (ids.clone(), labels.cloned())
        };

        let strategy = self.strategy(labels.is_some());
        let positions = match (strategy, &labels) {
            (SplitStrategy::Stratified, Some(labels)) => {
                let keys = label_keys(labels)?;
                self.stratified_positions(&keys)?
            }
            _ => self.plain_positions(ids.len())?,
        };

        tracing::debug!(
            strategy = strategy.as_str(),
            train = positions.train.len(),
            val = positions.val.len(),
            test = positions.test.len(),
            "Computed nested split"
        );

        Ok(SplitAssignment {
            train: take_positions(&ids, &positions.train)?,
            val: take_positions(&ids, &positions.val)?,
            test: take_positions(&ids, &positions.test)?,
        })
    }

    /// Nested plain k-fold over `n_samples` positions.
    pub fn plain_positions(&self, n_samples: usize) -> Result<SplitPositions> {
        let outer = KFold::new(self.coords.cv_repetitions)?
            .with_shuffle(self.coords.seed)
            .split(n_samples)?;
        let dev_test = select(outer, self.coords.repetition_index)?;

        let inner = KFold::new(self.coords.cv_folds)?
            .with_shuffle(self.coords.seed)
            .split(dev_test.train.len())?;
        let train_val = select(inner, self.coords.fold_index)?;

        Ok(compose(&dev_test, &train_val))
    }

    /// Nested stratified k-fold over positions of `labels`.
    pub fn stratified_positions<S: AsRef<str>>(&self, labels: &[S]) -> Result<SplitPositions> {
        let outer = StratifiedKFold::new(self.coords.cv_repetitions)?
            .with_shuffle(self.coords.seed)
            .split(labels)?;
        let dev_test = select(outer, self.coords.repetition_index)?;

        let dev_labels: Vec<&str> = dev_test.train.iter().map(|&p| labels[p].as_ref()).collect();
        let inner = StratifiedKFold::new(self.coords.cv_folds)?
            .with_shuffle(self.coords.seed)
            .split(&dev_labels)?;
        let train_val = select(inner, self.coords.fold_index)?;

        Ok(compose(&dev_test, &train_val))
    }
}

fn select(folds: Vec<Fold>, index: usize) -> Result<Fold> {
    let count = folds.len();
    folds.into_iter().nth(index).ok_or_else(|| {
        icu_model::ConfigError::IndexOutOfRange {
            name: "fold",
            index,
            count,
        }
        .into()
    })
}

/// Map inner-fold positions (relative to the development set) back to cohort positions.
fn compose(outer: &Fold, inner: &Fold) -> SplitPositions {
    SplitPositions {
        train: inner.train.iter().map(|&p| outer.train[p]).collect(),
        val: inner.test.iter().map(|&p| outer.train[p]).collect(),
        test: outer.test.clone(),
    }
}

fn label_keys(labels: &Series) -> Result<Vec<String>> {
    let keys = series_keys(labels)?;
    let missing = keys.iter().filter(|key| key.is_none()).count();
    if missing > 0 {
        return Err(SplitError::MissingLabel { count: missing });
    }
    Ok(keys.into_iter().flatten().collect())
}

fn take_positions(series: &Series, positions: &[usize]) -> PolarsResult<Series> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        positions.iter().map(|&p| p as IdxSize).collect(),
    );
    series.take(&idx)
}
