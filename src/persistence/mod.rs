//! Binary persistence of cluster indexes.
//!
//! Two files per index share a caller-supplied base path:
//!
//! - `<base>.clus`: centroid storage followed by the posting lists
//! - `<base>.vec`: the full vector storage
//!
//! Each storage block is `[dimensions: i32][count: i32]` followed by
//! `count` row-major f32 rows. The posting section is a count followed by
//! one record per cluster: a size (`-1` marks a never-allocated slot) and
//! that many i32 ids. All values are little-endian; files are not portable
//! across endianness.
//!
//! Both files must exist for a load to succeed, and a writer truncates
//! whatever was there before. A load either returns a complete index or an
//! error; a partial index is never produced.

mod cluster_io;
mod error;

pub use cluster_io::{delete_index_files, index_files_exist, read_index, write_index};
pub use error::{PersistenceError, PersistenceResult};
