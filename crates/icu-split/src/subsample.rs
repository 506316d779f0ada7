//! Seeded debug subsampling.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Share of the cohort kept in debug mode.
pub const DEBUG_FRACTION: f64 = 0.01;

/// Number of subjects kept out of `n_samples` in debug mode.
///
/// Rounds to the nearest subject, keeping at least one of a non-empty cohort.
pub fn debug_sample_size(n_samples: usize) -> usize {
    if n_samples == 0 {
        return 0;
    }
    let size = (n_samples as f64 * DEBUG_FRACTION).round() as usize;
    size.max(1)
}

/// Draw the debug subsample of `n_samples` positions with `seed`.
///
/// Positions are returned in draw order; the same seed always yields the
/// same positions in the same order.
pub fn debug_subsample(n_samples: usize, seed: u64) -> Vec<usize> {
    let amount = debug_sample_size(n_samples);
    let mut rng = StdRng::seed_from_u64(seed);
    index::sample(&mut rng, n_samples, amount).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_size() {
        assert_eq!(debug_sample_size(0), 0);
        assert_eq!(debug_sample_size(10), 1);
        assert_eq!(debug_sample_size(1000), 10);
        assert_eq!(debug_sample_size(1049), 10);
        assert_eq!(debug_sample_size(1050), 11);
    }

    #[test]
    fn test_subsample_is_reproducible() {
        let a = debug_subsample(1000, 7);
        let b = debug_subsample(1000, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_subsample_positions_are_distinct_and_in_range() {
        let positions = debug_subsample(5000, 3);
        let unique: HashSet<usize> = positions.iter().copied().collect();
        assert_eq!(unique.len(), positions.len());
        assert!(positions.iter().all(|&p| p < 5000));
    }

    #[test]
    fn test_subsample_depends_on_seed() {
        assert_ne!(debug_subsample(1000, 7), debug_subsample(1000, 8));
    }
}
