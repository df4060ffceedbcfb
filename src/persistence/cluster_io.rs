//! Reading and writing the paired `.clus` / `.vec` files.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::ivf::ClusterIndex;
use crate::postings::PostingList;
use crate::storage::{ArenaVectorStorage, VectorStorage};

use super::error::{PersistenceError, PersistenceResult};

const CLUSTER_FILE_EXTENSION: &str = "clus";
const VECTOR_FILE_EXTENSION: &str = "vec";

/// Size written for a posting slot that was never allocated.
const NULL_POSTING_SENTINEL: i32 = -1;

fn with_appended_extension(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn cluster_file(base: &Path) -> PathBuf {
    with_appended_extension(base, CLUSTER_FILE_EXTENSION)
}

fn vector_file(base: &Path) -> PathBuf {
    with_appended_extension(base, VECTOR_FILE_EXTENSION)
}

/// Write `index` to `<base>.clus` and `<base>.vec`, truncating existing
/// files.
pub fn write_index(base: &Path, index: &ClusterIndex) -> PersistenceResult<()> {
    let mut clus = BufWriter::new(File::create(cluster_file(base))?);
    write_storage(&mut clus, index.centroid_storage())?;
    write_postings(&mut clus, index.postings())?;
    clus.flush()?;

    let mut vec = BufWriter::new(File::create(vector_file(base))?);
    write_storage(&mut vec, index.vector_storage())?;
    vec.flush()?;
    Ok(())
}

/// Read the index written at `base`, materialized in the arena storage
/// variant.
///
/// # Errors
///
/// [`PersistenceError::MissingFile`] when either file is absent;
/// [`PersistenceError::InvalidFormat`] when headers disagree or a record
/// is malformed or truncated. No partial index is ever returned.
pub fn read_index(base: &Path) -> PersistenceResult<ClusterIndex> {
    let clus_path = cluster_file(base);
    let vec_path = vector_file(base);
    if !clus_path.exists() {
        return Err(PersistenceError::MissingFile(clus_path));
    }
    if !vec_path.exists() {
        return Err(PersistenceError::MissingFile(vec_path));
    }

    let mut clus = BufReader::new(File::open(&clus_path)?);
    let centroids = read_storage(&mut clus)?;
    let postings = read_postings(&mut clus)?;
    if postings.len() != centroids.len() {
        return Err(PersistenceError::InvalidFormat(format!(
            "posting count {} does not match centroid count {}",
            postings.len(),
            centroids.len()
        )));
    }

    let mut vec = BufReader::new(File::open(&vec_path)?);
    let vectors = read_storage(&mut vec)?;
    if vectors.dimensions() != centroids.dimensions() {
        return Err(PersistenceError::InvalidFormat(format!(
            "vector dimension {} does not match centroid dimension {}",
            vectors.dimensions(),
            centroids.dimensions()
        )));
    }

    Ok(ClusterIndex::new(
        Box::new(centroids),
        postings,
        Box::new(vectors),
    ))
}

/// True when both index files exist at `base`.
#[must_use]
pub fn index_files_exist(base: &Path) -> bool {
    cluster_file(base).exists() && vector_file(base).exists()
}

/// Remove both index files at `base`, ignoring ones already absent.
pub fn delete_index_files(base: &Path) -> PersistenceResult<()> {
    for path in [cluster_file(base), vector_file(base)] {
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(PersistenceError::Io(e)),
        }
    }
    Ok(())
}

fn write_storage<W: Write>(writer: &mut W, storage: &dyn VectorStorage) -> PersistenceResult<()> {
    writer.write_all(&(storage.dimensions() as i32).to_le_bytes())?;
    writer.write_all(&(storage.len() as i32).to_le_bytes())?;

    let mut row_bytes = Vec::with_capacity(storage.dimensions() * 4);
    for id in 0..storage.len() {
        row_bytes.clear();
        for &value in storage.row(id as i32) {
            row_bytes.extend_from_slice(&value.to_le_bytes());
        }
        writer.write_all(&row_bytes)?;
    }
    Ok(())
}

fn read_storage<R: Read>(reader: &mut R) -> PersistenceResult<ArenaVectorStorage> {
    let dimensions = read_i32(reader)?;
    let count = read_i32(reader)?;
    if dimensions <= 0 || count < 0 {
        return Err(PersistenceError::InvalidFormat(format!(
            "implausible storage header: dimensions {dimensions}, count {count}"
        )));
    }
    let dimensions = dimensions as usize;
    let count = count as usize;

    // The backing region is contiguous, so the rows arrive as one read.
    let mut bytes = vec![0u8; count * dimensions * 4];
    reader.read_exact(&mut bytes).map_err(eof_as_format)?;

    let mut data = Vec::with_capacity(count * dimensions);
    for chunk in bytes.chunks_exact(4) {
        let mut word = [0u8; 4];
        word.copy_from_slice(chunk);
        data.push(f32::from_le_bytes(word));
    }

    Ok(ArenaVectorStorage::from_flat(dimensions, count, data))
}

fn write_postings<W: Write>(
    writer: &mut W,
    postings: &[Option<PostingList>],
) -> PersistenceResult<()> {
    writer.write_all(&(postings.len() as i32).to_le_bytes())?;
    for slot in postings {
        match slot {
            None => writer.write_all(&NULL_POSTING_SENTINEL.to_le_bytes())?,
            Some(list) => {
                writer.write_all(&(list.len() as i32).to_le_bytes())?;
                let mut bytes = Vec::with_capacity(list.len() * 4);
                for id in list.iter() {
                    bytes.extend_from_slice(&id.to_le_bytes());
                }
                writer.write_all(&bytes)?;
            }
        }
    }
    Ok(())
}

fn read_postings<R: Read>(reader: &mut R) -> PersistenceResult<Vec<Option<PostingList>>> {
    let count = read_i32(reader)?;
    if count < 0 {
        return Err(PersistenceError::InvalidFormat(format!(
            "negative posting list count {count}"
        )));
    }

    let mut postings = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let size = read_i32(reader)?;
        if size == NULL_POSTING_SENTINEL {
            postings.push(None);
            continue;
        }
        if size < 0 {
            return Err(PersistenceError::InvalidFormat(format!(
                "negative posting list size {size}"
            )));
        }

        let mut bytes = vec![0u8; size as usize * 4];
        reader.read_exact(&mut bytes).map_err(eof_as_format)?;

        let mut list = PostingList::with_capacity(size as usize);
        for chunk in bytes.chunks_exact(4) {
            let mut word = [0u8; 4];
            word.copy_from_slice(chunk);
            list.add(i32::from_le_bytes(word));
        }
        postings.push(Some(list));
    }
    Ok(postings)
}

fn read_i32<R: Read>(reader: &mut R) -> PersistenceResult<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(eof_as_format)?;
    Ok(i32::from_le_bytes(buf))
}

/// A short read inside a record means a malformed file, not an I/O fault.
fn eof_as_format(e: std::io::Error) -> PersistenceError {
    if e.kind() == ErrorKind::UnexpectedEof {
        PersistenceError::InvalidFormat("unexpected end of file mid-record".to_string())
    } else {
        PersistenceError::Io(e)
    }
}
