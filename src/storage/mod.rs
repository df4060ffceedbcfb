//! Index-addressable storage of fixed-dimension f32 vectors.
//!
//! A storage holds exactly `len()` rows of `dimensions()` floats each,
//! addressed by dense ids in `[0, len)`. Both dimensions are fixed at
//! construction; a write fully overwrites its row and reads return the
//! last value written.
//!
//! Two interchangeable variants exist behind the [`VectorStorage`] trait:
//!
//! - [`HeapVectorStorage`]: one owned allocation per row. Simple, but a
//!   pointer chase per access; fine for small collections.
//! - [`ArenaVectorStorage`]: a single row-major allocation of
//!   `len * dimensions` floats. Rows are adjacent, which the SIMD kernel
//!   and the bulk persistence path both rely on.
//!
//! The variant is selected by [`StorageKind`] through [`new_storage`]; the
//! contract is identical either way. Backing memory is released when the
//! storage is dropped, on every exit path.

mod arena;
mod heap;

pub use arena::ArenaVectorStorage;
pub use heap::HeapVectorStorage;

use crate::config::StorageKind;
use crate::error::{IndexError, Result};

/// Index-addressable storage of fixed-dimension f32 vectors.
pub trait VectorStorage {
    /// Width of every row.
    fn dimensions(&self) -> usize;

    /// Number of rows the storage was created with.
    fn len(&self) -> usize;

    /// True when the storage holds no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write `src` into row `id`, fully overwriting it.
    ///
    /// # Errors
    ///
    /// [`IndexError::CapacityExceeded`] when `id` is outside `[0, len)`;
    /// [`IndexError::DimensionMismatch`] when `src.len() != dimensions()`.
    fn add_vector(&mut self, id: i32, src: &[f32]) -> Result<()>;

    /// Copy row `id` into `dst`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`VectorStorage::add_vector`], with the mismatch
    /// check applied to `dst`.
    fn load_vector_into(&self, id: i32, dst: &mut [f32]) -> Result<()>;

    /// Borrow row `id` without copying, for the distance kernel.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside `[0, len)`.
    fn row(&self, id: i32) -> &[f32];

    /// Owned copy of row `id`. Cold paths only.
    fn vector(&self, id: i32) -> Vec<f32> {
        self.row(id).to_vec()
    }
}

/// Construct the storage variant selected by `kind`.
#[must_use]
pub fn new_storage(kind: StorageKind, dimensions: usize, len: usize) -> Box<dyn VectorStorage> {
    match kind {
        StorageKind::OnHeap => Box::new(HeapVectorStorage::new(dimensions, len)),
        StorageKind::OffHeap => Box::new(ArenaVectorStorage::new(dimensions, len)),
    }
}

/// Shared bounds and width validation for writes and copies.
fn check_access(id: i32, len: usize, dimensions: usize, slice_len: usize) -> Result<()> {
    if id < 0 || id as usize >= len {
        return Err(IndexError::CapacityExceeded { id, capacity: len });
    }
    if slice_len != dimensions {
        return Err(IndexError::DimensionMismatch {
            expected: dimensions,
            actual: slice_len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(storage: &mut dyn VectorStorage) {
        for id in 0..storage.len() {
            let row: Vec<f32> = (0..storage.dimensions())
                .map(|d| (id * 10 + d) as f32)
                .collect();
            storage.add_vector(id as i32, &row).unwrap();
        }
    }

    fn roundtrips(mut storage: Box<dyn VectorStorage>) {
        fill(storage.as_mut());

        assert_eq!(storage.row(2), &[20.0, 21.0, 22.0]);
        assert_eq!(storage.vector(0), vec![0.0, 1.0, 2.0]);

        let mut dst = [0.0f32; 3];
        storage.load_vector_into(3, &mut dst).unwrap();
        assert_eq!(dst, [30.0, 31.0, 32.0]);

        // Overwrite is total.
        storage.add_vector(2, &[7.0, 8.0, 9.0]).unwrap();
        assert_eq!(storage.row(2), &[7.0, 8.0, 9.0]);
    }

    fn rejects_bad_access(mut storage: Box<dyn VectorStorage>) {
        assert!(matches!(
            storage.add_vector(4, &[0.0; 3]),
            Err(IndexError::CapacityExceeded { id: 4, capacity: 4 })
        ));
        assert!(matches!(
            storage.add_vector(-1, &[0.0; 3]),
            Err(IndexError::CapacityExceeded { id: -1, .. })
        ));
        assert!(matches!(
            storage.add_vector(0, &[0.0; 2]),
            Err(IndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        let mut short = [0.0f32; 2];
        assert!(storage.load_vector_into(0, &mut short).is_err());
    }

    #[test]
    fn arena_roundtrips() {
        roundtrips(Box::new(ArenaVectorStorage::new(3, 4)));
    }

    #[test]
    fn heap_roundtrips() {
        roundtrips(Box::new(HeapVectorStorage::new(3, 4)));
    }

    #[test]
    fn arena_rejects_bad_access() {
        rejects_bad_access(Box::new(ArenaVectorStorage::new(3, 4)));
    }

    #[test]
    fn heap_rejects_bad_access() {
        rejects_bad_access(Box::new(HeapVectorStorage::new(3, 4)));
    }
}
