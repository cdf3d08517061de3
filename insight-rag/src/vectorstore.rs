//! Exact nearest-neighbor search over a fixed set of vectors.
//!
//! [`VectorStore`] keeps every vector in one row-major buffer and answers
//! queries by a linear scan with squared Euclidean distance. The `k` best
//! candidates are kept in a bounded max-heap, so a query costs
//! `O(n·D + n·log k)` and never sorts the full candidate set.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::info;

use crate::document::Neighbor;
use crate::error::{RagError, Result};

/// An immutable flat L2 index.
///
/// # Example
///
/// ```rust
/// use insight_rag::VectorStore;
///
/// let store = VectorStore::build(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![5.0, 5.0]])?;
/// let hits = store.search(&[0.0, 1.0], 2)?;
/// assert_eq!(hits.iter().map(|n| n.ordinal).collect::<Vec<_>>(), vec![0, 1]);
/// assert_eq!(hits[1].distance, 2.0);
/// # Ok::<(), insight_rag::RagError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VectorStore {
    data: Vec<f32>,
    dimensions: usize,
    len: usize,
}

impl VectorStore {
    /// Build the index from vectors in ordinal order.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyStore`] if `vectors` is empty
    /// - [`RagError::DimensionMismatch`] if lengths differ (the first vector
    ///   fixes the dimension) or the first vector is zero-length
    /// - [`RagError::NonFiniteVector`] if a component is NaN or infinite
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimensions = vectors.first().map(Vec::len).ok_or(RagError::EmptyStore)?;
        if dimensions == 0 {
            return Err(RagError::DimensionMismatch { expected: 1, actual: 0, ordinal: Some(0) });
        }

        let mut data = Vec::with_capacity(vectors.len() * dimensions);
        for (ordinal, vector) in vectors.iter().enumerate() {
            check_vector(vector, dimensions, Some(ordinal))?;
            data.extend_from_slice(vector);
        }

        let len = vectors.len();
        info!(vector_count = len, dimensions, "built vector store");
        Ok(Self { data, dimensions, len })
    }

    /// Return up to `k` ordinals nearest to `query`, ascending by squared
    /// Euclidean distance, ties broken by ascending ordinal.
    ///
    /// A `k` larger than the store returns every ordinal.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidTopK`] if `k == 0`
    /// - [`RagError::DimensionMismatch`] if `query.len() != dimensions()`
    /// - [`RagError::NonFiniteVector`] if the query has a NaN or infinite component
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 {
            return Err(RagError::InvalidTopK { k });
        }
        check_vector(query, self.dimensions, None)?;

        let k = k.min(self.len);
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        for (ordinal, row) in self.data.chunks_exact(self.dimensions).enumerate() {
            let candidate = Candidate { distance: squared_l2(query, row), ordinal };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| Neighbor { ordinal: c.ordinal, distance: c.distance as f32 })
            .collect())
    }

    /// Return the stored vector at `ordinal`.
    pub fn vector(&self, ordinal: usize) -> Result<&[f32]> {
        if ordinal >= self.len {
            return Err(RagError::IndexOutOfRange { ordinal, size: self.len });
        }
        let start = ordinal * self.dimensions;
        Ok(&self.data[start..start + self.dimensions])
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a store cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn check_vector(vector: &[f32], expected: usize, ordinal: Option<usize>) -> Result<()> {
    if vector.len() != expected {
        return Err(RagError::DimensionMismatch { expected, actual: vector.len(), ordinal });
    }
    if let Some(position) = vector.iter().position(|x| !x.is_finite()) {
        return Err(RagError::NonFiniteVector { ordinal, position });
    }
    Ok(())
}

/// `Σ (a_i - b_i)²`, accumulated in `f64` so finite `f32` inputs never
/// overflow. Both slices have the same length.
fn squared_l2(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum()
}

/// Heap entry ordered by `(distance, ordinal)`.
///
/// The max-heap top is the worst of the kept candidates, so a later ordinal
/// at an equal distance never displaces an earlier one.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    ordinal: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.total_cmp(&other.distance).then(self.ordinal.cmp(&other.ordinal))
    }
}
