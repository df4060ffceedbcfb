//! Uniform-without-replacement sampling of vector ids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::postings::PostingList;

/// Reservoir sampler (Algorithm R) over the id range `[0, n)`.
///
/// Seeded for reproducible builds: the same seed and arguments always
/// produce the same sample.
pub struct ReservoirSampler {
    rng: StdRng,
}

impl ReservoirSampler {
    /// A sampler seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sample `sample_size` distinct ids from `[0, num_vectors)`.
    ///
    /// Returns the full range when `sample_size >= num_vectors`. The order
    /// of the returned ids is unspecified and must not be relied on.
    pub fn sample(&mut self, num_vectors: usize, sample_size: usize) -> PostingList {
        if sample_size >= num_vectors {
            return Self::range(num_vectors);
        }

        let mut reservoir = PostingList::with_capacity(sample_size);
        for i in 0..sample_size {
            reservoir.add(i as i32);
        }

        for i in sample_size..num_vectors {
            let j = self.rng.random_range(0..=i);
            if j < sample_size {
                reservoir.set(j, i as i32);
            }
        }
        reservoir
    }

    fn range(n: usize) -> PostingList {
        let mut result = PostingList::with_capacity(n);
        for i in 0..n {
            result.add(i as i32);
        }
        result
    }
}
