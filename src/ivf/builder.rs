//! Index construction: sample, train, assign.

use tracing::{debug, info};

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::ivf::index::ClusterIndex;
use crate::partitioning::kmeans::KMeans;
use crate::postings::PostingList;
use crate::sampler::ReservoirSampler;
use crate::simd;
use crate::storage::{self, VectorStorage};

/// Build a [`ClusterIndex`] over `vectors`.
///
/// Pipeline: reservoir-sample ids, train k-means on the sample, move the
/// centroids into the configured storage variant, then assign every vector
/// in the full store to its nearest centroid. The trainer's sample labels
/// are discarded; the assignment sweep covers the whole collection, which
/// the training sample only approximates.
pub(crate) fn build_cluster_index(
    vectors: Box<dyn VectorStorage>,
    config: &IndexConfig,
) -> Result<ClusterIndex> {
    let n = vectors.len();
    if n == 0 {
        return Err(IndexError::EmptyIndex);
    }

    let sample_size = (n as f32 * config.sample_fraction) as usize;
    let mut sampler = ReservoirSampler::new(config.seed);
    let sample_ids = sampler.sample(n, sample_size);
    info!(sampled = sample_ids.len(), total = n, "sampled ids for training");

    let k = config.clusters.unwrap_or_else(|| (n as f64).sqrt().ceil() as usize);
    let mut kmeans = KMeans::new(k, config.kmeans_iterations, config.seed)?;
    kmeans.fit(&sample_ids, vectors.as_ref())?;
    info!(clusters = k, "k-means training complete");

    if config.debug {
        log_centroid_distances(kmeans.centroids());
    }

    let centroids = into_storage(kmeans.centroids(), config, vectors.dimensions())?;
    let postings = assign_all(vectors.as_ref(), centroids.as_ref());
    info!(vectors = n, "assignment complete");

    Ok(ClusterIndex::new(centroids, postings, vectors))
}

/// Move trained centroids into the same storage variant as the vectors.
fn into_storage(
    centroids: &[Vec<f32>],
    config: &IndexConfig,
    dimensions: usize,
) -> Result<Box<dyn VectorStorage>> {
    let mut storage = storage::new_storage(config.storage, dimensions, centroids.len());
    for (i, centroid) in centroids.iter().enumerate() {
        storage.add_vector(i as i32, centroid)?;
    }
    Ok(storage)
}

/// Assign every vector to its nearest centroid and collect posting lists.
///
/// On an exact distance tie the later centroid wins, unlike the trainer's
/// assignment sweep; both rules are load-bearing for reproducing recall
/// numbers. Posting slots are allocated on first assignment, so a cluster
/// that never receives a vector stays `None`.
fn assign_all(
    vectors: &dyn VectorStorage,
    centroids: &dyn VectorStorage,
) -> Vec<Option<PostingList>> {
    let total_centroids = centroids.len();
    let mut postings: Vec<Option<PostingList>> = (0..total_centroids).map(|_| None).collect();

    for i in 0..vectors.len() {
        let row = vectors.row(i as i32);
        let mut assigned = 0usize;
        let mut min_distance = simd::l2_distance_squared(row, centroids.row(0));
        for j in 1..total_centroids {
            let distance = simd::l2_distance_squared(row, centroids.row(j as i32));
            if distance <= min_distance {
                min_distance = distance;
                assigned = j;
            }
        }
        postings[assigned]
            .get_or_insert_with(PostingList::new)
            .add(i as i32);
    }
    postings
}

/// Log all pairwise centroid distances, nearest pairs first.
fn log_centroid_distances(centroids: &[Vec<f32>]) {
    let mut pairs = Vec::new();
    for i in 0..centroids.len() {
        for j in (i + 1)..centroids.len() {
            pairs.push((i, j, simd::l2_distance_squared(&centroids[i], &centroids[j])));
        }
    }
    pairs.sort_by(|a, b| a.2.total_cmp(&b.2));
    for (a, b, distance) in pairs {
        debug!(centroid_a = a, centroid_b = b, distance, "centroid pair distance");
    }
}
