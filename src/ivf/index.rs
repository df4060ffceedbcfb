//! Built index data and occupancy statistics.

use std::fmt;

use crate::postings::PostingList;
use crate::storage::VectorStorage;

/// The immutable product of a build: centroids, one posting slot per
/// centroid, and the full vector set.
///
/// A posting slot is `None` when no vector was ever assigned to its
/// centroid. The distinction from a present-but-empty list survives
/// persistence, so both forms are accepted everywhere.
pub struct ClusterIndex {
    centroids: Box<dyn VectorStorage>,
    postings: Vec<Option<PostingList>>,
    vectors: Box<dyn VectorStorage>,
}

impl ClusterIndex {
    pub(crate) fn new(
        centroids: Box<dyn VectorStorage>,
        postings: Vec<Option<PostingList>>,
        vectors: Box<dyn VectorStorage>,
    ) -> Self {
        debug_assert_eq!(centroids.len(), postings.len());
        Self {
            centroids,
            postings,
            vectors,
        }
    }

    /// Number of clusters.
    #[must_use]
    pub fn total_centroids(&self) -> usize {
        self.centroids.len()
    }

    /// Read view over the centroid storage.
    #[must_use]
    pub fn centroid_storage(&self) -> &dyn VectorStorage {
        self.centroids.as_ref()
    }

    /// Read view over the posting slots, one per centroid.
    #[must_use]
    pub fn postings(&self) -> &[Option<PostingList>] {
        &self.postings
    }

    /// Read view over the full vector storage.
    #[must_use]
    pub fn vector_storage(&self) -> &dyn VectorStorage {
        self.vectors.as_ref()
    }

    /// Cluster occupancy summary.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        let mut total_vectors = 0usize;
        let mut empty_clusters = 0usize;
        let mut min_cluster_size = usize::MAX;
        let mut max_cluster_size = 0usize;

        for slot in &self.postings {
            let size = slot.as_ref().map_or(0, PostingList::len);
            if size == 0 {
                empty_clusters += 1;
                continue;
            }
            total_vectors += size;
            min_cluster_size = min_cluster_size.min(size);
            max_cluster_size = max_cluster_size.max(size);
        }

        let occupied = self.postings.len() - empty_clusters;
        IndexStats {
            clusters: self.postings.len(),
            dimensions: self.centroids.dimensions(),
            total_vectors,
            empty_clusters,
            min_cluster_size: (occupied > 0).then_some(min_cluster_size),
            max_cluster_size: (occupied > 0).then_some(max_cluster_size),
            avg_cluster_size: (occupied > 0).then(|| total_vectors / occupied),
        }
    }
}

/// Occupancy statistics for a built index.
///
/// The size fields are `None` when every cluster is empty. The average is
/// taken over occupied clusters only, with integer division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub clusters: usize,
    pub dimensions: usize,
    pub total_vectors: usize,
    pub empty_clusters: usize,
    pub min_cluster_size: Option<usize>,
    pub max_cluster_size: Option<usize>,
    pub avg_cluster_size: Option<usize>,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Cluster Index Statistics ===")?;
        writeln!(f, "Number of clusters: {}", self.clusters)?;
        writeln!(f, "Centroid dimensions: {}", self.dimensions)?;
        writeln!(f, "Total vectors: {}", self.total_vectors)?;
        writeln!(f, "Empty clusters: {}", self.empty_clusters)?;
        if let (Some(min), Some(max), Some(avg)) = (
            self.min_cluster_size,
            self.max_cluster_size,
            self.avg_cluster_size,
        ) {
            writeln!(f, "Min cluster size: {min}")?;
            writeln!(f, "Max cluster size: {max}")?;
            writeln!(f, "Avg cluster size: {avg}")?;
        }
        write!(f, "================================")
    }
}
