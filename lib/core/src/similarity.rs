//! Dense pairwise similarity.
//!
//! The full N×N matrix is a deliberate scale boundary: it is only built for
//! datasets small enough to hold a dense matrix in memory. Beyond that
//! regime an approximate index would replace it.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::Vector;

/// Square cosine-similarity matrix, row-major, indexed by collection
/// position. `row(i)[j]` is the similarity between embeddings i and j.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build the matrix from one embedding per collection position.
    ///
    /// All vectors must share the dimension of the first; O(N²) time and
    /// space. Rows are computed in parallel.
    pub fn build(vectors: &[Vector]) -> Result<Self> {
        let n = vectors.len();
        if n == 0 {
            return Ok(Self { n: 0, data: Vec::new() });
        }

        let expected = vectors[0].dim();
        for vector in vectors {
            if vector.dim() != expected {
                return Err(Error::InvalidDimension {
                    expected,
                    actual: vector.dim(),
                });
            }
        }

        let rows: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (0..n)
                    .map(|j| vectors[i].cosine_similarity(&vectors[j]))
                    .collect()
            })
            .collect();
        let data: Vec<f32> = rows.into_iter().flatten().collect();

        Ok(Self { n, data })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity row for collection position `i`.
    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.n + j]
    }
}
