//! Seeded k-fold generators.
//!
//! Folds are addressed by index: for a fixed seed, `split(..)[i]` is the same
//! fold on every call.

use std::collections::BTreeMap;

use icu_model::ConfigError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Result, SplitError};

/// One fold: positions used for fitting and positions held out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Ascending positions outside the held-out block.
    pub train: Vec<usize>,
    /// Held-out positions, in assignment order.
    pub test: Vec<usize>,
}

impl Fold {
    fn from_test(test: Vec<usize>, n_samples: usize) -> Self {
        let mut held_out = vec![false; n_samples];
        for &pos in &test {
            held_out[pos] = true;
        }
        let train = (0..n_samples).filter(|&pos| !held_out[pos]).collect();
        Self { train, test }
    }
}

fn check_split_count(n_splits: usize) -> Result<()> {
    if n_splits < 2 {
        return Err(ConfigError::InvalidSplitCount {
            name: "n_splits",
            value: n_splits,
        }
        .into());
    }
    Ok(())
}

fn check_sample_count(n_samples: usize, n_splits: usize) -> Result<()> {
    if n_samples < n_splits {
        return Err(SplitError::TooFewSamples {
            n_samples,
            n_splits,
        });
    }
    Ok(())
}

/// Plain k-fold partitioning.
///
/// Positions are optionally permuted by a seeded RNG, then cut into `k`
/// contiguous blocks; the first `n % k` blocks hold one extra position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
    seed: Option<u64>,
}

impl KFold {
    pub fn new(n_splits: usize) -> Result<Self> {
        check_split_count(n_splits)?;
        Ok(Self {
            n_splits,
            seed: None,
        })
    }

    /// Shuffle positions with `seed` before cutting folds.
    #[must_use]
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// All folds over `n_samples` positions.
    pub fn split(&self, n_samples: usize) -> Result<Vec<Fold>> {
        check_sample_count(n_samples, self.n_splits)?;

        let mut order: Vec<usize> = (0..n_samples).collect();
        if let Some(seed) = self.seed {
            let mut rng = StdRng::seed_from_u64(seed);
            order.shuffle(&mut rng);
        }

        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;
        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let test = order[start..start + size].to_vec();
            folds.push(Fold::from_test(test, n_samples));
            start += size;
        }
        Ok(folds)
    }
}

/// Label-stratified k-fold partitioning.
///
/// Positions are grouped by class (classes in sorted order), each class is
/// shuffled by the seeded RNG, and positions are dealt round-robin over the
/// folds with one running counter. Per-class counts and total fold sizes
/// therefore differ by at most one between folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifiedKFold {
    n_splits: usize,
    seed: Option<u64>,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Result<Self> {
        check_split_count(n_splits)?;
        Ok(Self {
            n_splits,
            seed: None,
        })
    }

    #[must_use]
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// All folds over the positions of `labels`.
    pub fn split<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<Fold>> {
        let n_samples = labels.len();
        check_sample_count(n_samples, self.n_splits)?;

        let mut classes: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (pos, label) in labels.iter().enumerate() {
            classes.entry(label.as_ref()).or_default().push(pos);
        }

        let smallest = classes.values().map(Vec::len).min().unwrap_or(0);
        if smallest < self.n_splits {
            tracing::warn!(
                smallest_class = smallest,
                n_splits = self.n_splits,
                "Least populated class has fewer members than folds"
            );
        }

        let mut rng = self.seed.map(StdRng::seed_from_u64);
        let mut tests: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];
        let mut counter = 0usize;
        for members in classes.values_mut() {
            if let Some(rng) = rng.as_mut() {
                members.shuffle(rng);
            }
            for &pos in members.iter() {
                tests[counter % self.n_splits].push(pos);
                counter += 1;
            }
        }

        Ok(tests
            .into_iter()
            .map(|test| Fold::from_test(test, n_samples))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kfold_sizes() {
        let folds = KFold::new(3).unwrap().split(10).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        for fold in &folds {
            assert_eq!(fold.train.len() + fold.test.len(), 10);
        }
    }

    #[test]
    fn test_kfold_unshuffled_is_contiguous() {
        let folds = KFold::new(2).unwrap().split(4).unwrap();
        assert_eq!(folds[0].test, vec![0, 1]);
        assert_eq!(folds[0].train, vec![2, 3]);
        assert_eq!(folds[1].test, vec![2, 3]);
    }

    #[test]
    fn test_kfold_shuffle_is_deterministic() {
        let a = KFold::new(5).unwrap().with_shuffle(42).split(50).unwrap();
        let b = KFold::new(5).unwrap().with_shuffle(42).split(50).unwrap();
        let c = KFold::new(5).unwrap().with_shuffle(43).split(50).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_kfold_test_blocks_partition_positions() {
        let folds = KFold::new(4).unwrap().with_shuffle(7).split(22).unwrap();
        let mut all: Vec<usize> = folds.iter().flat_map(|f| f.test.clone()).collect();
        all.sort_unstable();
        assert_eq!(all, (0..22).collect::<Vec<_>>());
    }

    #[test]
    fn test_kfold_train_is_ascending() {
        let folds = KFold::new(3).unwrap().with_shuffle(1).split(12).unwrap();
        for fold in folds {
            assert!(fold.train.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_single_split_rejected() {
        assert!(matches!(
            KFold::new(1),
            Err(SplitError::Config(ConfigError::InvalidSplitCount { value: 1, .. }))
        ));
        assert!(StratifiedKFold::new(0).is_err());
    }

    #[test]
    fn test_too_few_samples() {
        assert!(matches!(
            KFold::new(5).unwrap().split(4),
            Err(SplitError::TooFewSamples {
                n_samples: 4,
                n_splits: 5
            })
        ));
    }

    #[test]
    fn test_stratified_balances_classes() {
        // 12 of class 0, 6 of class 1, 2 of class 2
        let mut labels = vec!["0"; 12];
        labels.extend(vec!["1"; 6]);
        labels.extend(vec!["2"; 2]);

        let folds = StratifiedKFold::new(3)
            .unwrap()
            .with_shuffle(42)
            .split(&labels)
            .unwrap();

        for fold in &folds {
            let count = |class: &str| fold.test.iter().filter(|&&p| labels[p] == class).count();
            assert_eq!(count("0"), 4);
            assert_eq!(count("1"), 2);
            assert!(count("2") <= 1);
        }

        let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        let max = sizes.iter().max().unwrap();
        let min = sizes.iter().min().unwrap();
        assert!(max - min <= 1);
    }

    #[test]
    fn test_stratified_is_deterministic() {
        let labels: Vec<String> = (0..40).map(|i| (i % 3).to_string()).collect();
        let a = StratifiedKFold::new(4).unwrap().with_shuffle(9).split(&labels).unwrap();
        let b = StratifiedKFold::new(4).unwrap().with_shuffle(9).split(&labels).unwrap();
        assert_eq!(a, b);
    }
}
