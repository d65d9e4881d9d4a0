//! On-disk artifact pair for a built store.
//!
//! Two artifacts are written together and must be loaded together: a
//! little-endian vectors blob (header + row-major f32 matrix) and a JSON
//! metadata record carrying the chunk list and the embedding model
//! identifier. A shared build id is stamped into both so a mismatched
//! pair from different builds fails instead of silently mispairing index
//! rows with chunks.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use super::index::FlatIpIndex;
use crate::chunking::Chunk;
use crate::types::RagError;

const VECTORS_MAGIC: [u8; 4] = *b"RGWV";
const VECTORS_VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 16 + 4 + 4;

/// Metadata record persisted next to the vectors blob.
///
/// `documents` and `embedding_model` are required; a record missing
/// either is corrupt, never defaulted.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StoreMeta {
    pub index_id: Uuid,
    pub documents: Vec<Chunk>,
    pub embedding_model: String,
}

pub(crate) async fn write_artifacts(
    index_path: &Path,
    meta_path: &Path,
    index: &FlatIpIndex,
    meta: &StoreMeta,
) -> Result<(), RagError> {
    for path in [index_path, meta_path] {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
    }

    let data = index.raw_data();
    let mut blob = Vec::with_capacity(HEADER_LEN + data.len() * 4);
    blob.extend_from_slice(&VECTORS_MAGIC);
    blob.extend_from_slice(&VECTORS_VERSION.to_le_bytes());
    blob.extend_from_slice(meta.index_id.as_bytes());
    blob.extend_from_slice(&(index.dims() as u32).to_le_bytes());
    blob.extend_from_slice(&(index.len() as u32).to_le_bytes());
    for value in data {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    fs::write(index_path, blob).await?;

    let record = serde_json::to_string(meta)
        .map_err(|err| RagError::Io(err.to_string()))?;
    fs::write(meta_path, record).await?;
    Ok(())
}

pub(crate) async fn read_artifacts(
    index_path: &Path,
    meta_path: &Path,
) -> Result<(FlatIpIndex, StoreMeta), RagError> {
    for path in [index_path, meta_path] {
        if !path.exists() {
            return Err(RagError::NotFound(path.display().to_string()));
        }
    }

    let record = fs::read_to_string(meta_path).await?;
    let meta: StoreMeta = serde_json::from_str(&record)
        .map_err(|err| RagError::Corrupt(format!("invalid metadata record: {err}")))?;

    let blob = fs::read(index_path).await?;
    let index = decode_blob(&blob, &meta)?;
    Ok((index, meta))
}

fn decode_blob(blob: &[u8], meta: &StoreMeta) -> Result<FlatIpIndex, RagError> {
    if blob.len() < HEADER_LEN {
        return Err(RagError::Corrupt(
            "vectors blob is smaller than its header".to_string(),
        ));
    }
    if blob[0..4] != VECTORS_MAGIC {
        return Err(RagError::Corrupt(
            "vectors blob has an unrecognized magic".to_string(),
        ));
    }

    let version = u32::from_le_bytes(blob[4..8].try_into().unwrap());
    if version != VECTORS_VERSION {
        return Err(RagError::Corrupt(format!(
            "unsupported vectors blob version {version}"
        )));
    }

    let index_id = Uuid::from_bytes(blob[8..24].try_into().unwrap());
    if index_id != meta.index_id {
        return Err(RagError::Corrupt(format!(
            "artifact pair mismatch: vectors blob is from build {index_id}, metadata from build {}",
            meta.index_id
        )));
    }

    let dims = u32::from_le_bytes(blob[24..28].try_into().unwrap()) as usize;
    let count = u32::from_le_bytes(blob[28..32].try_into().unwrap()) as usize;

    let expected = HEADER_LEN + dims * count * 4;
    if blob.len() != expected {
        return Err(RagError::Corrupt(format!(
            "vectors blob size mismatch: got {}, expected {expected} (dims={dims}, count={count})",
            blob.len()
        )));
    }
    if count != meta.documents.len() {
        return Err(RagError::Corrupt(format!(
            "vectors blob holds {count} rows but metadata lists {} documents",
            meta.documents.len()
        )));
    }

    let data: Vec<f32> = blob[HEADER_LEN..]
        .chunks_exact(4)
        .map(|bytes| f32::from_le_bytes(bytes.try_into().unwrap()))
        .collect();

    Ok(FlatIpIndex::from_normalized_raw(dims, data))
}
