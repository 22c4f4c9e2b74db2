//! Train/test splitting of the ratings table.
//!
//! The split is an 80/20 partition driven by a fixed-seed shuffle, so the
//! same input and seed always produce the same partition. The training
//! pipeline and all regression tests depend on that reproducibility.

use data_loader::Rating;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Seed used for the canonical training split.
pub const SPLIT_SEED: u64 = 42;

/// Fraction of ratings held out for evaluation.
pub const TEST_FRACTION: f64 = 0.2;

/// A partition of the ratings table into a training and a held-out set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainTestSplit {
    pub train: Vec<Rating>,
    pub test: Vec<Rating>,
}

impl TrainTestSplit {
    /// FNV-1a hash over the partition, in order.
    ///
    /// Two splits of the same input with the same seed hash identically;
    /// this is what the reproducibility regression test checks.
    pub fn partition_hash(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = FNV_OFFSET;
        let mut mix = |value: u64| {
            for byte in value.to_le_bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        };

        for (marker, part) in [(0u64, &self.train), (1u64, &self.test)] {
            mix(marker);
            mix(part.len() as u64);
            for r in part.iter() {
                mix(r.user_id as u64);
                mix(r.item_id as u64);
                mix(r.rating as u64);
                mix(r.timestamp as u64);
            }
        }
        hash
    }
}

/// Split ratings into train and test sets by seeded shuffle.
///
/// The held-out size is `ceil(n * test_fraction)`; the first shuffled
/// records form the test set, the remainder the training set.
pub fn train_test_split(ratings: &[Rating], test_fraction: f64, seed: u64) -> TrainTestSplit {
    let n = ratings.len();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(n);

    let test = indices[..n_test].iter().map(|&i| ratings[i]).collect();
    let train = indices[n_test..].iter().map(|&i| ratings[i]).collect();

    TrainTestSplit { train, test }
}
