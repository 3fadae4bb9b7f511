//! Seeded train/test partitioning
//!
//! The split is uniform over all records: no stratification by label is
//! applied, so a small dataset with a skewed label balance can produce a test
//! set whose balance differs from the training set.
//!
//! # Determinism
//!
//! The partition depends only on the number of records, the fraction and the
//! seed. Record indices are shuffled with a [`Pcg32`] generator seeded from
//! the `u64` seed, the first `round(n * fraction)` indices form the training
//! set and the remainder the test set. Both halves are returned in source
//! order.
//!
//! ```
//! use playerlab_analysis::{
//!     dataset::Dataset,
//!     record::{PlayerRecord, Subscription},
//! };
//!
//! let records = (0..8)
//!     .map(|row| PlayerRecord {
//!         row,
//!         age: 20.0,
//!         played_hours: 1.0,
//!         subscription: Subscription::Subscribed,
//!     })
//!     .collect();
//! let dataset = Dataset::from_records(records)?;
//! let split = dataset.split(0.75, 123)?;
//! assert_eq!(split.training.len(), 6);
//! assert_eq!(split.test.len(), 2);
//! assert_eq!(split, dataset.split(0.75, 123)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use tracing::info;

use crate::{dataset::Dataset, record::PlayerRecord};

/// Default share of records assigned to the training set
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.75;
/// Default seed for the partition
pub const DEFAULT_SEED: u64 = 123;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SplitError {
    #[display("train fraction must be within [0, 1], got {fraction}")]
    InvalidFraction { fraction: f64 },
}

/// Disjoint training and test subsets of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub training: Vec<PlayerRecord>,
    pub test: Vec<PlayerRecord>,
}

/// Number of training records for `len` records and `fraction`.
///
/// Rounds to the nearest whole record, halves away from zero.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
#[must_use]
pub fn training_size(len: usize, fraction: f64) -> usize {
    let size = (len as f64 * fraction).round() as usize;
    size.min(len)
}

impl Dataset {
    /// Partitions the records into a training and a test set.
    ///
    /// Identical `fraction`, `seed` and record count always give the same
    /// partition.
    pub fn split(&self, fraction: f64, seed: u64) -> Result<Split, SplitError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SplitError::InvalidFraction { fraction });
        }

        let records = self.records();
        let mut indices = (0..records.len()).collect::<Vec<_>>();
        let mut rng = Pcg32::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (training_indices, test_indices) =
            indices.split_at_mut(training_size(records.len(), fraction));
        training_indices.sort_unstable();
        test_indices.sort_unstable();

        let split = Split {
            training: training_indices.iter().map(|&i| records[i]).collect(),
            test: test_indices.iter().map(|&i| records[i]).collect(),
        };
        info!(
            "split {} records into {} training and {} test (fraction={fraction}, seed={seed})",
            records.len(),
            split.training.len(),
            split.test.len()
        );
        Ok(split)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::record::Subscription;

    fn dataset(len: usize) -> Dataset {
        let records = (0..len)
            .map(|row| PlayerRecord {
                row,
                age: 15.0 + (row % 20) as f64,
                played_hours: 0.1,
                subscription: if row % 4 == 0 {
                    Subscription::NotSubscribed
                } else {
                    Subscription::Subscribed
                },
            })
            .collect();
        Dataset::from_records(records).unwrap()
    }

    fn rows(records: &[PlayerRecord]) -> BTreeSet<usize> {
        records.iter().map(|r| r.row).collect()
    }

    #[test]
    fn test_split_is_deterministic() {
        let dataset = dataset(196);
        let a = dataset.split(0.75, 123).unwrap();
        let b = dataset.split(0.75, 123).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_is_a_partition() {
        let dataset = dataset(196);
        let split = dataset.split(0.75, 123).unwrap();
        assert_eq!(split.training.len() + split.test.len(), dataset.len());
        assert_eq!(split.training.len(), 147);

        let training = rows(&split.training);
        let test = rows(&split.test);
        assert!(training.is_disjoint(&test));
        let union = training.union(&test).copied().collect::<BTreeSet<_>>();
        assert_eq!(union, rows(dataset.records()));
    }

    #[test]
    fn test_halves_keep_source_order() {
        let split = dataset(50).split(0.75, 7).unwrap();
        assert!(split.training.is_sorted_by_key(|r| r.row));
        assert!(split.test.is_sorted_by_key(|r| r.row));
    }

    #[test]
    fn test_different_seeds_give_different_partitions() {
        let dataset = dataset(100);
        let a = dataset.split(0.75, 1).unwrap();
        let b = dataset.split(0.75, 2).unwrap();
        assert_ne!(rows(&a.test), rows(&b.test));
    }

    #[test]
    fn test_training_size_rounds_to_nearest() {
        assert_eq!(training_size(10, 0.75), 8); // 7.5 rounds up
        assert_eq!(training_size(9, 0.75), 7); // 6.75
        assert_eq!(training_size(1, 0.75), 1);
        assert_eq!(training_size(4, 1.0), 4);
        assert_eq!(training_size(4, 0.0), 0);
    }

    #[test]
    fn test_full_fraction_leaves_empty_test_set() {
        let split = dataset(5).split(1.0, 123).unwrap();
        assert_eq!(split.training.len(), 5);
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_invalid_fraction() {
        let dataset = dataset(5);
        assert!(dataset.split(1.5, 123).is_err());
        assert!(dataset.split(-0.1, 123).is_err());
        assert!(dataset.split(f64::NAN, 123).is_err());
    }
}
