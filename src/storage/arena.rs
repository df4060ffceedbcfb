//! Contiguous arena-backed storage.

use super::{check_access, VectorStorage};
use crate::error::Result;

/// Row-major storage in a single contiguous allocation.
///
/// Row `i` occupies floats `[i * dimensions, (i + 1) * dimensions)`. The
/// whole region is one `Box<[f32]>`, so adjacent rows are adjacent in
/// memory and the persistence layer can stream the region as one block.
pub struct ArenaVectorStorage {
    data: Box<[f32]>,
    dimensions: usize,
    len: usize,
}

impl ArenaVectorStorage {
    /// Reserve the backing region for `len` rows of `dimensions` floats.
    #[must_use]
    pub fn new(dimensions: usize, len: usize) -> Self {
        Self {
            data: vec![0.0; len * dimensions].into_boxed_slice(),
            dimensions,
            len,
        }
    }

    /// Adopt an already-populated row-major region. The persistence layer
    /// uses this after a bulk read.
    pub(crate) fn from_flat(dimensions: usize, len: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), len * dimensions);
        Self {
            data: data.into_boxed_slice(),
            dimensions,
            len,
        }
    }
}

impl VectorStorage for ArenaVectorStorage {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn len(&self) -> usize {
        self.len
    }

    fn add_vector(&mut self, id: i32, src: &[f32]) -> Result<()> {
        check_access(id, self.len, self.dimensions, src.len())?;
        let start = id as usize * self.dimensions;
        self.data[start..start + self.dimensions].copy_from_slice(src);
        Ok(())
    }

    fn load_vector_into(&self, id: i32, dst: &mut [f32]) -> Result<()> {
        check_access(id, self.len, self.dimensions, dst.len())?;
        dst.copy_from_slice(self.row(id));
        Ok(())
    }

    fn row(&self, id: i32) -> &[f32] {
        let start = id as usize * self.dimensions;
        &self.data[start..start + self.dimensions]
    }
}
