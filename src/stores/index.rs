//! Exact in-memory similarity index over normalized vectors.
//!
//! Similarity is the inner product of L2-normalized vectors, which equals
//! cosine similarity while skipping the per-query magnitude division. The
//! index is flat and exact: every query scans every row. Rebuilds replace
//! the whole index; there is no incremental insertion.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::warn;

use crate::types::RagError;

/// L2-normalize a vector in place.
///
/// A zero-norm vector is left unchanged instead of dividing by zero and
/// poisoning every subsequent score with NaN.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Min-heap entry used for top-k selection: the worst candidate (lowest
/// score, then highest position) sits on top and is evicted first.
#[derive(Debug)]
struct HeapEntry {
    score: f32,
    position: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.score.partial_cmp(&self.score) {
            Some(Ordering::Equal) | None => self.position.cmp(&other.position),
            Some(ordering) => ordering,
        }
    }
}

/// Flat exact inner-product index.
///
/// Owns a row-major matrix of normalized vectors; row *i* corresponds to
/// chunk list position *i* for the lifetime of one build. The index is
/// immutable after construction.
#[derive(Clone, Debug)]
pub struct FlatIpIndex {
    dims: usize,
    data: Vec<f32>,
}

impl FlatIpIndex {
    /// An index over zero documents; searches return empty results.
    pub fn empty() -> Self {
        Self {
            dims: 0,
            data: Vec::new(),
        }
    }

    /// Build the index from embedding rows, normalizing each row.
    ///
    /// All rows must share one dimensionality; a provider emitting ragged
    /// rows has broken its contract.
    pub fn build(rows: Vec<Vec<f32>>) -> Result<Self, RagError> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };
        let dims = first.len();
        if dims == 0 {
            return Err(RagError::Embedding(
                "embedding rows have zero dimensions".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(dims * rows.len());
        for (position, mut row) in rows.into_iter().enumerate() {
            if row.len() != dims {
                return Err(RagError::Embedding(format!(
                    "embedding row {position} has {} dimensions, expected {dims}",
                    row.len()
                )));
            }
            l2_normalize(&mut row);
            data.extend_from_slice(&row);
        }

        Ok(Self { dims, data })
    }

    /// Reconstruct from already-normalized row-major data (the load path).
    pub(crate) fn from_normalized_raw(dims: usize, data: Vec<f32>) -> Self {
        debug_assert!(dims == 0 || data.len() % dims == 0);
        Self { dims, data }
    }

    /// Row-major vector data, for persistence.
    pub(crate) fn raw_data(&self) -> &[f32] {
        &self.data
    }

    /// Dimensionality of the indexed vectors (0 for an empty index).
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Number of indexed vectors.
    pub fn len(&self) -> usize {
        if self.dims == 0 {
            0
        } else {
            self.data.len() / self.dims
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return up to `k` `(position, score)` pairs ordered by descending
    /// similarity, ties broken by ascending insertion position.
    ///
    /// The query is normalized before scoring. An empty index (or `k` of
    /// zero) yields an empty result.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if self.is_empty() || k == 0 {
            return Vec::new();
        }
        if query.len() != self.dims {
            warn!(
                query_dims = query.len(),
                index_dims = self.dims,
                "query dimensionality does not match the index; returning no results"
            );
            return Vec::new();
        }

        let mut query = query.to_vec();
        l2_normalize(&mut query);

        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(k + 1);
        for (position, row) in self.data.chunks_exact(self.dims).enumerate() {
            let score: f32 = row.iter().zip(&query).map(|(a, b)| a * b).sum();
            if !score.is_finite() {
                continue;
            }
            heap.push(HeapEntry { score, position });
            if heap.len() > k {
                heap.pop();
            }
        }

        let mut results: Vec<(usize, f32)> = heap
            .into_iter()
            .map(|entry| (entry.position, entry.score))
            .collect();
        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        results
    }
}
