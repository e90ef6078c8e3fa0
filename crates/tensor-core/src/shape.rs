// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor shape descriptors and dimension utilities.

use crate::TensorError;
use std::fmt;

/// Describes the dimensionality of a [`crate::Tensor`].
///
/// A shape is the per-dimension size list of a tensor. Valid tensor shapes
/// have at least one dimension and no zero-sized dimensions; see
/// [`Shape::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Creates a new shape from the given dimensions.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Shape;
    /// let s = Shape::new(vec![2, 3, 4]);
    /// assert_eq!(s.rank(), 3);
    /// assert_eq!(s.num_elements(), 24);
    /// ```
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    /// Creates the shape of a single-element tensor (`[1]`).
    pub fn scalar() -> Self {
        Self { dims: vec![1] }
    }

    /// Creates a 1-D shape.
    pub fn vector(len: usize) -> Self {
        Self { dims: vec![len] }
    }

    /// Creates a 2-D shape (matrix).
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self {
            dims: vec![rows, cols],
        }
    }

    /// Returns the number of dimensions (arity).
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Returns the total number of elements.
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns the dimensions as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the size of a specific dimension, or `None` if out of bounds.
    pub fn dim(&self, index: usize) -> Option<usize> {
        self.dims.get(index).copied()
    }

    /// Checks that the shape can describe a tensor.
    pub fn validate(&self) -> Result<(), TensorError> {
        if self.dims.is_empty() || self.dims.contains(&0) {
            return Err(TensorError::InvalidShape(self.clone()));
        }
        Ok(())
    }

    /// Computes row-major (C-order) strides for this shape.
    ///
    /// The stride for dimension `i` is the number of elements to skip
    /// in the flat buffer to advance one step along that dimension.
    pub fn strides(&self) -> Vec<usize> {
        let rank = self.dims.len();
        if rank == 0 {
            return vec![];
        }
        let mut strides = vec![0usize; rank];
        strides[rank - 1] = 1;
        for i in (0..rank - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Converts a full coordinate vector into a flat buffer offset.
    ///
    /// # Errors
    /// [`TensorError::IndexArity`] if `indices.len() != rank`,
    /// [`TensorError::IndexOutOfRange`] if any coordinate is too large.
    pub fn offset_of(&self, indices: &[usize]) -> Result<usize, TensorError> {
        self.check_arity(indices.len())?;
        let mut offset = 0;
        for (dim, ((&index, &size), stride)) in indices
            .iter()
            .zip(&self.dims)
            .zip(self.strides())
            .enumerate()
        {
            if index >= size {
                return Err(TensorError::IndexOutOfRange { dim, index, size });
            }
            offset += index * stride;
        }
        Ok(offset)
    }

    pub(crate) fn check_arity(&self, actual: usize) -> Result<(), TensorError> {
        if actual != self.rank() {
            return Err(TensorError::IndexArity {
                expected: self.rank(),
                actual,
            });
        }
        Ok(())
    }

    /// Returns `true` if the shapes are compatible for a matrix multiply:
    /// `self` is `[M, K]` and `other` is `[K, N]`.
    pub fn is_matmul_compatible(&self, other: &Shape) -> bool {
        self.rank() == 2 && other.rank() == 2 && self.dims[1] == other.dims[0]
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_shape() {
        let s = Shape::scalar();
        assert_eq!(s.rank(), 1);
        assert_eq!(s.num_elements(), 1);
        assert_eq!(s.strides(), vec![1]);
    }

    #[test]
    fn test_matrix_shape() {
        let s = Shape::matrix(3, 4);
        assert_eq!(s.rank(), 2);
        assert_eq!(s.num_elements(), 12);
        assert_eq!(s.strides(), vec![4, 1]);
    }

    #[test]
    fn test_3d_strides() {
        let s = Shape::new(vec![2, 3, 4]);
        assert_eq!(s.strides(), vec![12, 4, 1]);
    }

    #[test]
    fn test_offset_of_last_index_fastest() {
        let s = Shape::new(vec![2, 3, 4]);
        assert_eq!(s.offset_of(&[0, 0, 1]).unwrap(), 1);
        assert_eq!(s.offset_of(&[0, 1, 0]).unwrap(), 4);
        assert_eq!(s.offset_of(&[1, 2, 3]).unwrap(), 23);
    }

    #[test]
    fn test_offset_of_errors() {
        let s = Shape::matrix(2, 3);
        assert_eq!(
            s.offset_of(&[1]),
            Err(TensorError::IndexArity {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            s.offset_of(&[1, 3]),
            Err(TensorError::IndexOutOfRange {
                dim: 1,
                index: 3,
                size: 3
            })
        );
    }

    #[test]
    fn test_validate() {
        assert!(Shape::matrix(2, 3).validate().is_ok());
        assert!(Shape::new(vec![]).validate().is_err());
        assert!(Shape::new(vec![2, 0]).validate().is_err());
    }

    #[test]
    fn test_matmul_compatible() {
        let a = Shape::matrix(3, 4);
        let b = Shape::matrix(4, 5);
        assert!(a.is_matmul_compatible(&b));

        let c = Shape::matrix(5, 5);
        assert!(!a.is_matmul_compatible(&c));
        assert!(!Shape::vector(4).is_matmul_compatible(&b));
    }

    #[test]
    fn test_display() {
        let s = Shape::new(vec![2, 3, 4]);
        assert_eq!(format!("{s}"), "[2, 3, 4]");
    }

    #[test]
    fn test_offset_follows_strides() {
        let s = Shape::new(vec![2, 3, 4]);
        assert_eq!(s.offset_of(&[0, 0, 0]).unwrap(), 0);
        assert_eq!(s.offset_of(&[0, 0, 3]).unwrap(), 3);
        assert_eq!(s.offset_of(&[0, 2, 0]).unwrap(), 8);
        assert_eq!(s.offset_of(&[1, 2, 3]).unwrap(), 12 + 8 + 3);
        assert_eq!(s.offset_of(&[1, 2, 3]).unwrap(), s.num_elements() - 1);
    }
}
