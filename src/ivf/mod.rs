//! Inverted-file (IVF) approximate nearest neighbor index.
//!
//! # Algorithm
//!
//! Build partitions the collection with k-means and records, per centroid,
//! the posting list of vector ids whose nearest centroid it is. A query
//! then runs in two stages:
//!
//! 1. **Centroid probe**: scan all centroids, keep the nearest
//!    `max(1, floor(probe_fraction * clusters))` in a bounded max-heap.
//! 2. **Posting scan**: walk the posting lists of the probed clusters,
//!    keep the best `k` candidates in a second bounded max-heap.
//!
//! With `k = ceil(sqrt(n))` clusters and a few percent probe fraction this
//! scans a small slice of the collection per query while keeping recall
//! high on clustered data.
//!
//! # Tie handling
//!
//! Two different tie rules coexist on purpose. Bounded heaps replace their
//! maximum only on strict improvement, while the build-time assignment
//! sweep prefers the later centroid on an exact tie. Normalizing either
//! one changes which ids land where and therefore measured recall.
//!
//! # Usage
//!
//! ```rust
//! use tessera::{IndexConfig, IvfIndex};
//! use tessera::storage::{self, VectorStorage};
//!
//! # fn main() -> tessera::Result<()> {
//! let config = IndexConfig {
//!     sample_fraction: 1.0,
//!     probe_fraction: 1.0,
//!     ..IndexConfig::default()
//! };
//!
//! let mut vectors = storage::new_storage(config.storage, 2, 4);
//! for (id, row) in [[0.0_f32, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]]
//!     .iter()
//!     .enumerate()
//! {
//!     vectors.add_vector(id as i32, row)?;
//! }
//!
//! let mut index = IvfIndex::new(config);
//! index.build(vectors)?;
//!
//! let nearest = index.search(&[0.05, 0.0], 2)?;
//! assert_eq!(nearest.len(), 2);
//! # Ok(())
//! # }
//! ```

mod builder;
mod heap;
mod index;
mod search;

pub use index::{ClusterIndex, IndexStats};
pub use search::IvfIndex;
