//! The index facade: build, search, persist.

use std::path::Path;

use tracing::info;

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::ivf::builder;
use crate::ivf::heap::{BoundedMaxHeap, IdAndDistance};
use crate::ivf::index::{ClusterIndex, IndexStats};
use crate::persistence;
use crate::simd;
use crate::storage::VectorStorage;

/// Cluster-partitioned approximate nearest neighbor index.
///
/// Fill a [`VectorStorage`] with the collection, [`IvfIndex::build`] once,
/// then serve top-k queries. Search probes `max(1, floor(probe_fraction *
/// clusters))` clusters: a first bounded max-heap keeps the nearest
/// centroids while all of them are scanned, a second keeps the best `k`
/// candidates while the probed posting lists are scanned. Nothing beyond
/// the two heaps and the result vector is allocated per query.
///
/// With a fixed seed, input, and config, build and search are fully
/// deterministic, including tie resolution and the order of equidistant
/// results.
pub struct IvfIndex {
    config: IndexConfig,
    cluster_index: Option<ClusterIndex>,
}

impl IvfIndex {
    /// An unbuilt index carrying `config`.
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            cluster_index: None,
        }
    }

    /// Build the index over `vectors`, consuming the storage.
    ///
    /// # Errors
    ///
    /// [`IndexError::EmptyIndex`] for an empty storage, or
    /// [`IndexError::InvalidParameter`] when the training sample cannot
    /// seed the requested cluster count. On error no partial index is
    /// retained.
    pub fn build(&mut self, vectors: Box<dyn VectorStorage>) -> Result<()> {
        self.cluster_index = Some(builder::build_cluster_index(vectors, &self.config)?);
        Ok(())
    }

    /// Load a previously written index from `base`, materialized in the
    /// arena storage variant.
    ///
    /// # Errors
    ///
    /// Fails when either index file is missing or malformed.
    pub fn load(base: &Path, config: IndexConfig) -> Result<Self> {
        let cluster_index = persistence::read_index(base)?;
        info!(base = %base.display(), "index loaded");
        Ok(Self {
            config,
            cluster_index: Some(cluster_index),
        })
    }

    /// Top-`k` ids for `query`, ordered by ascending distance.
    ///
    /// Returns fewer than `k` ids when the probed clusters hold fewer
    /// vectors.
    ///
    /// # Errors
    ///
    /// [`IndexError::NotBuilt`] before a successful build or load;
    /// [`IndexError::DimensionMismatch`] when the query width differs from
    /// the index dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<i32>> {
        let index = self.cluster_index.as_ref().ok_or(IndexError::NotBuilt)?;

        let dimensions = index.vector_storage().dimensions();
        if query.len() != dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: dimensions,
                actual: query.len(),
            });
        }

        let total_centroids = index.total_centroids();
        let probes = ((self.config.probe_fraction * total_centroids as f32) as usize).max(1);

        let mut nearest_centroids = BoundedMaxHeap::new(probes);
        for c in 0..total_centroids {
            let distance = simd::l2_distance_squared(index.centroid_storage().row(c as i32), query);
            nearest_centroids.push(IdAndDistance {
                id: c as i32,
                distance,
            });
        }

        let mut results = BoundedMaxHeap::new(k);
        while let Some(centroid) = nearest_centroids.pop() {
            let Some(posting) = &index.postings()[centroid.id as usize] else {
                continue;
            };
            for id in posting.iter() {
                let distance = simd::l2_distance_squared(index.vector_storage().row(id), query);
                results.push(IdAndDistance { id, distance });
            }
        }

        Ok(results.into_sorted_ids())
    }

    /// Write the index to `<base>.clus` and `<base>.vec`, truncating any
    /// existing files.
    ///
    /// # Errors
    ///
    /// [`IndexError::NotBuilt`] before a successful build, or any
    /// persistence failure.
    pub fn write(&self, base: &Path) -> Result<()> {
        let index = self.cluster_index.as_ref().ok_or(IndexError::NotBuilt)?;
        persistence::write_index(base, index)?;
        info!(base = %base.display(), "index written");
        Ok(())
    }

    /// Cluster occupancy statistics.
    ///
    /// # Errors
    ///
    /// [`IndexError::NotBuilt`] before a successful build or load.
    pub fn stats(&self) -> Result<IndexStats> {
        self.cluster_index
            .as_ref()
            .map(ClusterIndex::stats)
            .ok_or(IndexError::NotBuilt)
    }

    /// True after a successful build or load.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.cluster_index.is_some()
    }

    /// The built index data, if any.
    #[must_use]
    pub fn cluster_index(&self) -> Option<&ClusterIndex> {
        self.cluster_index.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage;

    fn tiny_config() -> IndexConfig {
        IndexConfig {
            clusters: Some(2),
            sample_fraction: 1.0,
            probe_fraction: 1.0,
            ..IndexConfig::default()
        }
    }

    fn filled_storage(rows: &[[f32; 2]]) -> Box<dyn VectorStorage> {
        let mut out = storage::new_storage(Default::default(), 2, rows.len());
        for (id, row) in rows.iter().enumerate() {
            out.add_vector(id as i32, row).unwrap();
        }
        out
    }

    #[test]
    fn search_before_build_fails() {
        let index = IvfIndex::new(IndexConfig::default());
        assert!(matches!(
            index.search(&[0.0, 0.0], 3),
            Err(IndexError::NotBuilt)
        ));
        assert!(matches!(index.stats(), Err(IndexError::NotBuilt)));
    }

    #[test]
    fn query_dimension_is_checked() {
        let mut index = IvfIndex::new(tiny_config());
        index
            .build(filled_storage(&[[0.0, 0.0], [1.0, 1.0], [5.0, 5.0]]))
            .unwrap();

        assert!(matches!(
            index.search(&[0.0, 0.0, 0.0], 1),
            Err(IndexError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn at_least_one_cluster_is_probed() {
        let config = IndexConfig {
            probe_fraction: 0.0001,
            ..tiny_config()
        };
        let mut index = IvfIndex::new(config);
        index
            .build(filled_storage(&[[0.0, 0.0], [0.1, 0.1], [9.0, 9.0]]))
            .unwrap();

        let results = index.search(&[0.0, 0.0], 1).unwrap();
        assert_eq!(results.len(), 1);
    }
}
