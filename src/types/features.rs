//! Sparse feature vectors produced by the vectorizer.

use crate::{DhakhtarError, Result};

/// Fixed-dimension sparse numeric representation of one symptom text.
///
/// Indices are strictly increasing and every index is `< dimension`.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dimension: usize,
    indices: Vec<usize>,
    values: Vec<f32>,
}

impl FeatureVector {
    /// Build from `(index, value)` pairs.
    ///
    /// Pairs may arrive in any order; duplicate indices are summed and
    /// explicit zeros dropped.
    pub fn from_pairs(
        dimension: usize,
        pairs: impl IntoIterator<Item = (usize, f32)>,
    ) -> Result<Self> {
        let mut pairs: Vec<(usize, f32)> = pairs.into_iter().collect();
        pairs.sort_by_key(|(idx, _)| *idx);

        let mut indices = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            if idx >= dimension {
                return Err(DhakhtarError::InvalidFeatures(format!(
                    "feature index {idx} out of range for dimension {dimension}"
                )));
            }
            if !value.is_finite() {
                return Err(DhakhtarError::InvalidFeatures(format!(
                    "feature {idx} is not finite"
                )));
            }
            match indices.last() {
                Some(&last) if last == idx => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(idx);
                    values.push(value);
                }
            }
        }

        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|(_, v)| *v != 0.0)
            .unzip();

        Ok(Self {
            dimension,
            indices,
            values,
        })
    }

    /// Build from a dense slice.
    pub fn from_dense(values: &[f32]) -> Result<Self> {
        Self::from_pairs(values.len(), values.iter().copied().enumerate())
    }

    /// An all-zero vector.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate non-zero `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `index` (zero when absent or out of range).
    pub fn get(&self, index: usize) -> f32 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Dot product with a dense row of the same dimension.
    ///
    /// Callers check the dimension first; a shorter row is treated as zero-padded.
    pub fn dot(&self, row: &[f32]) -> f32 {
        self.iter()
            .map(|(idx, value)| row.get(idx).copied().unwrap_or(0.0) * value)
            .sum()
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dimension];
        for (idx, value) in self.iter() {
            dense[idx] = value;
        }
        dense
    }

    /// Fail with `ShapeMismatch` unless this vector has `expected` columns.
    pub fn check_dimension(&self, expected: usize) -> Result<()> {
        if self.dimension == expected {
            Ok(())
        } else {
            Err(DhakhtarError::ShapeMismatch {
                expected,
                actual: self.dimension,
            })
        }
    }
}
