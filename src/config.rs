//! Build and search configuration.
//!
//! Every option has a default, so `IndexConfig::default()` is a complete,
//! usable configuration. [`IndexConfig::from_env`] layers process-wide
//! environment overrides on top of the defaults, mirroring the classic
//! `vector.storage` / `vector.debug` / `index.build` property triple:
//!
//! - `VECTOR_STORAGE`: `ON_HEAP` or `OFF_HEAP`
//! - `VECTOR_DEBUG`: `true` / `false`
//! - `INDEX_BUILD`: `true` / `false` (whether a driver should rebuild
//!   rather than load a persisted index)

use serde::{Deserialize, Serialize};

/// Default seed shared by the reservoir sampler and k-means init.
const DEFAULT_SEED: u64 = 1_234_212_342;

/// Storage layout for vector data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    /// One owned allocation per row. Suited to small collections.
    OnHeap,
    /// One contiguous arena of `n * dimensions` floats. The default; keeps
    /// rows adjacent for the SIMD kernel and allows bulk persistence.
    #[default]
    OffHeap,
}

/// Hyperparameters for building and searching a cluster index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Which [`StorageKind`] backs centroids and loaded indexes.
    #[serde(default)]
    pub storage: StorageKind,

    /// Number of clusters. `None` derives `ceil(sqrt(n))` at build time.
    #[serde(default)]
    pub clusters: Option<usize>,

    /// Maximum Lloyd iterations for k-means.
    #[serde(default = "default_kmeans_iterations")]
    pub kmeans_iterations: usize,

    /// Fraction of the collection sampled for k-means training.
    #[serde(default = "default_sample_fraction")]
    pub sample_fraction: f32,

    /// Fraction of clusters probed per query (at least one is always probed).
    #[serde(default = "default_probe_fraction")]
    pub probe_fraction: f32,

    /// Seed for the sampler and centroid initialization. Identical seed,
    /// input, and config give bit-identical builds.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Emit diagnostic output (pairwise centroid distances) during build.
    #[serde(default)]
    pub debug: bool,

    /// Whether a driver should rebuild the index instead of loading it.
    /// The library itself never consults this.
    #[serde(default = "default_true")]
    pub rebuild: bool,
}

fn default_kmeans_iterations() -> usize {
    300
}

fn default_sample_fraction() -> f32 {
    0.1
}

fn default_probe_fraction() -> f32 {
    0.01
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_true() -> bool {
    true
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            clusters: None,
            kmeans_iterations: default_kmeans_iterations(),
            sample_fraction: default_sample_fraction(),
            probe_fraction: default_probe_fraction(),
            seed: default_seed(),
            debug: false,
            rebuild: true,
        }
    }
}

impl IndexConfig {
    /// Defaults overridden by `VECTOR_STORAGE`, `VECTOR_DEBUG`, and
    /// `INDEX_BUILD` environment variables. Unset or unrecognized values
    /// keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("VECTOR_STORAGE") {
            match value.to_ascii_uppercase().as_str() {
                "ON_HEAP" => config.storage = StorageKind::OnHeap,
                "OFF_HEAP" => config.storage = StorageKind::OffHeap,
                _ => {}
            }
        }
        if let Ok(value) = std::env::var("VECTOR_DEBUG") {
            if let Ok(debug) = value.parse() {
                config.debug = debug;
            }
        }
        if let Ok(value) = std::env::var("INDEX_BUILD") {
            if let Ok(rebuild) = value.parse() {
                config.rebuild = rebuild;
            }
        }
        config
    }
}
