//! tessera: cluster-partitioned approximate nearest neighbor search.
//!
//! Builds an inverted-file (IVF) index over dense `f32` vectors under
//! squared Euclidean distance: k-means partitions the collection, every
//! vector lands in the posting list of its nearest centroid, and a query
//! scans only the clusters whose centroids are nearest. At around a 5%
//! probe rate on million-scale clustered data this trades a few percent of
//! recall for orders of magnitude less work than a brute-force scan.
//!
//! # Pipeline
//!
//! | Stage | Module | What happens |
//! |-------|--------|--------------|
//! | Store | [`storage`] | The collection fills a fixed `(n, d)` storage |
//! | Sample | [`sampler`] | Reservoir sample of ids for training |
//! | Train | [`partitioning`] | Lloyd's k-means over the sample |
//! | Assign | [`ivf`] | Full sweep builds per-centroid posting lists |
//! | Search | [`ivf`] | Centroid probe, then posting-list scan |
//! | Persist | [`persistence`] | Paired `.clus` / `.vec` binary files |
//!
//! Everything runs on the caller's thread; the library spawns nothing and
//! an index is read-only after build, so concurrent readers of a built
//! index are safe.
//!
//! # Determinism
//!
//! One seed (see [`IndexConfig::seed`]) drives the sampler and centroid
//! initialization, the distance kernel sums in a fixed order, and every
//! tie rule is pinned. Two builds from identical input and config produce
//! byte-identical index files.
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
//! let nearest = index.search(&[0.02, 0.0], 2)?;
//! assert_eq!(nearest[0], 0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod ivf;
pub mod partitioning;
pub mod persistence;
pub mod postings;
pub mod sampler;
pub mod simd;
pub mod storage;

pub use config::{IndexConfig, StorageKind};
pub use error::{IndexError, Result};
pub use ivf::{ClusterIndex, IndexStats, IvfIndex};
