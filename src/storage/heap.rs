//! Per-row heap-backed storage.

use super::{check_access, VectorStorage};
use crate::error::Result;

/// Storage with one owned allocation per row.
pub struct HeapVectorStorage {
    rows: Vec<Box<[f32]>>,
    dimensions: usize,
}

impl HeapVectorStorage {
    /// Reserve `len` rows of `dimensions` floats.
    #[must_use]
    pub fn new(dimensions: usize, len: usize) -> Self {
        Self {
            rows: (0..len)
                .map(|_| vec![0.0; dimensions].into_boxed_slice())
                .collect(),
            dimensions,
        }
    }
}

impl VectorStorage for HeapVectorStorage {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn add_vector(&mut self, id: i32, src: &[f32]) -> Result<()> {
        check_access(id, self.rows.len(), self.dimensions, src.len())?;
        self.rows[id as usize].copy_from_slice(src);
        Ok(())
    }

    fn load_vector_into(&self, id: i32, dst: &mut [f32]) -> Result<()> {
        check_access(id, self.rows.len(), self.dimensions, dst.len())?;
        dst.copy_from_slice(&self.rows[id as usize]);
        Ok(())
    }

    fn row(&self, id: i32) -> &[f32] {
        &self.rows[id as usize]
    }
}
