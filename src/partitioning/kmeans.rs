//! k-means clustering over sampled vector ids.
//!
//! Lloyd's algorithm with seeded random initialization. The IVF builder
//! trains on a reservoir sample and keeps only the centroids; the sample
//! labels returned by [`KMeans::fit`] exist for callers that want them.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{IndexError, Result};
use crate::postings::PostingList;
use crate::simd;
use crate::storage::VectorStorage;

/// Lloyd's k-means over the rows named by a sample of vector ids.
pub struct KMeans {
    k: usize,
    max_iterations: usize,
    seed: u64,
    /// Centroids (k x dimension), valid after `fit`.
    centroids: Vec<Vec<f32>>,
}

impl KMeans {
    /// A trainer for `k` clusters running at most `max_iterations` sweeps.
    ///
    /// # Errors
    ///
    /// [`IndexError::InvalidParameter`] when `k` is zero.
    pub fn new(k: usize, max_iterations: usize, seed: u64) -> Result<Self> {
        if k == 0 {
            return Err(IndexError::InvalidParameter(
                "cluster count must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            k,
            max_iterations,
            seed,
            centroids: Vec::new(),
        })
    }

    /// Cluster the sampled rows and return the final label of each sample
    /// position.
    ///
    /// Iterates until the label array stops changing or `max_iterations`
    /// is reached. A cluster that loses all members keeps an all-zero
    /// centroid; callers tolerate the occasional zero centroid.
    ///
    /// # Errors
    ///
    /// [`IndexError::InvalidParameter`] when the sample holds fewer than
    /// `k` ids (initialization needs `k` distinct positions).
    pub fn fit(
        &mut self,
        sample_ids: &PostingList,
        vectors: &dyn VectorStorage,
    ) -> Result<Vec<usize>> {
        let n = sample_ids.len();
        if n < self.k {
            return Err(IndexError::InvalidParameter(format!(
                "sample of {n} ids cannot seed {} clusters",
                self.k
            )));
        }

        let mut labels = vec![0usize; n];
        self.centroids = self.initialize_centroids(sample_ids, vectors)?;

        for _ in 0..self.max_iterations {
            let new_labels = self.assign_clusters(sample_ids, vectors);
            if new_labels == labels {
                break;
            }
            labels = new_labels;
            self.update_centroids(sample_ids, vectors, &labels);
        }
        Ok(labels)
    }

    /// The trained centroids (k x dimension).
    #[must_use]
    pub fn centroids(&self) -> &[Vec<f32>] {
        &self.centroids
    }

    /// Pick `k` distinct sample positions and copy their rows as the
    /// initial centroids.
    fn initialize_centroids(
        &self,
        sample_ids: &PostingList,
        vectors: &dyn VectorStorage,
    ) -> Result<Vec<Vec<f32>>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let dimensions = vectors.dimensions();

        let mut selected = HashSet::new();
        let mut centroids = Vec::with_capacity(self.k);
        for _ in 0..self.k {
            let mut position = rng.random_range(0..sample_ids.len());
            while !selected.insert(position) {
                position = rng.random_range(0..sample_ids.len());
            }

            let mut centroid = vec![0.0f32; dimensions];
            vectors.load_vector_into(sample_ids.get(position), &mut centroid)?;
            centroids.push(centroid);
        }
        Ok(centroids)
    }

    /// Label every sampled row with its nearest centroid. On an exact
    /// distance tie the earlier centroid keeps the point.
    fn assign_clusters(&self, sample_ids: &PostingList, vectors: &dyn VectorStorage) -> Vec<usize> {
        let mut labels = vec![0usize; sample_ids.len()];
        for (i, label) in labels.iter_mut().enumerate() {
            let row = vectors.row(sample_ids.get(i));
            let mut min_distance = f32::MAX;
            for (j, centroid) in self.centroids.iter().enumerate() {
                let distance = simd::l2_distance_squared(row, centroid);
                if distance < min_distance {
                    min_distance = distance;
                    *label = j;
                }
            }
        }
        labels
    }

    /// Recompute each centroid as the mean of its members, accumulating in
    /// single precision. Empty clusters are left at the zero vector.
    fn update_centroids(
        &mut self,
        sample_ids: &PostingList,
        vectors: &dyn VectorStorage,
        labels: &[usize],
    ) {
        let dimensions = vectors.dimensions();
        let mut counts = vec![0usize; self.k];
        let mut centroids = vec![vec![0.0f32; dimensions]; self.k];

        for (i, &cluster) in labels.iter().enumerate() {
            counts[cluster] += 1;
            let row = vectors.row(sample_ids.get(i));
            for (acc, &value) in centroids[cluster].iter_mut().zip(row) {
                *acc += value;
            }
        }

        for (centroid, &count) in centroids.iter_mut().zip(&counts) {
            if count > 0 {
                for value in centroid.iter_mut() {
                    *value /= count as f32;
                }
            }
        }
        self.centroids = centroids;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ReservoirSampler;
    use crate::storage::ArenaVectorStorage;
    use proptest::prelude::*;

    fn storage_from(rows: &[&[f32]]) -> ArenaVectorStorage {
        let mut storage = ArenaVectorStorage::new(rows[0].len(), rows.len());
        for (id, row) in rows.iter().enumerate() {
            storage.add_vector(id as i32, row).unwrap();
        }
        storage
    }

    fn full_sample(n: usize) -> PostingList {
        ReservoirSampler::new(123).sample(n, n)
    }

    #[test]
    fn simple_clustering() {
        let storage = storage_from(&[
            &[1.0, 1.0],
            &[1.5, 2.0],
            &[3.0, 4.0],
            &[5.0, 7.0],
            &[3.5, 5.0],
            &[4.5, 5.0],
            &[3.5, 4.5],
        ]);

        let mut kmeans = KMeans::new(2, 100, 99).unwrap();
        let labels = kmeans.fit(&full_sample(7), &storage).unwrap();

        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0], labels[1]);
        assert!(labels[2] == labels[3] || labels[2] == labels[4]);
    }

    #[test]
    fn single_cluster_labels_everything_zero() {
        let storage = storage_from(&[&[1.0, 2.0], &[1.1, 2.1], &[0.9, 1.9]]);

        let mut kmeans = KMeans::new(1, 10, 99).unwrap();
        let labels = kmeans.fit(&full_sample(3), &storage).unwrap();

        assert_eq!(labels, vec![0, 0, 0]);
    }

    #[test]
    fn centroid_shape_matches_k_and_dimension() {
        let storage = storage_from(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);

        let mut kmeans = KMeans::new(2, 10, 99).unwrap();
        kmeans.fit(&full_sample(3), &storage).unwrap();

        let centroids = kmeans.centroids();
        assert_eq!(centroids.len(), 2);
        assert_eq!(centroids[0].len(), 3);
    }

    #[test]
    fn exact_duplicate_clusters_share_labels() {
        let storage = storage_from(&[
            &[0.0, 0.0],
            &[0.0, 0.0],
            &[10.0, 10.0],
            &[10.0, 10.0],
        ]);
        let sample = full_sample(4);

        // Within-group labels agree for every seed. A seed whose init
        // spans both duplicate groups also separates them; with duplicate
        // points an init drawn entirely from one group cannot.
        let mut separated = false;
        for seed in 0..20 {
            let mut kmeans = KMeans::new(2, 100, seed).unwrap();
            let labels = kmeans.fit(&sample, &storage).unwrap();

            assert_eq!(labels[0], labels[1]);
            assert_eq!(labels[2], labels[3]);
            if labels[0] != labels[2] {
                separated = true;
                break;
            }
        }
        assert!(separated, "no seed separated the two duplicate groups");
    }

    #[test]
    fn rejects_sample_smaller_than_k() {
        let storage = storage_from(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let mut kmeans = KMeans::new(3, 10, 99).unwrap();
        assert!(matches!(
            kmeans.fit(&full_sample(2), &storage),
            Err(IndexError::InvalidParameter(_))
        ));
    }

    #[test]
    fn zero_clusters_is_invalid() {
        assert!(KMeans::new(0, 10, 99).is_err());
    }

    proptest! {
        #[test]
        fn fit_is_deterministic_given_seed(
            seed in any::<u64>(),
            dimension in 1usize..12,
            num_vectors in 2usize..48,
            k in 1usize..12,
            raw in proptest::collection::vec(-1.0f32..1.0f32, 2usize..(48 * 12)),
        ) {
            prop_assume!(k <= num_vectors);
            let needed = num_vectors * dimension;
            prop_assume!(raw.len() >= needed);

            let mut storage = ArenaVectorStorage::new(dimension, num_vectors);
            for i in 0..num_vectors {
                storage
                    .add_vector(i as i32, &raw[i * dimension..(i + 1) * dimension])
                    .unwrap();
            }
            let sample = full_sample(num_vectors);

            let mut km1 = KMeans::new(k, 50, seed).unwrap();
            let mut km2 = KMeans::new(k, 50, seed).unwrap();

            let l1 = km1.fit(&sample, &storage).unwrap();
            let l2 = km2.fit(&sample, &storage).unwrap();

            prop_assert_eq!(l1, l2);
            prop_assert_eq!(km1.centroids(), km2.centroids());
        }
    }
}
