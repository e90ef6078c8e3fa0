// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Shape operations: transpose and metadata-only reinterpretation.

use crate::{Element, Shape, Tensor, TensorError};

impl<E: Element> Tensor<E> {
    /// Swaps the two axes of a rank-2 tensor, physically reordering values.
    ///
    /// # Errors
    /// [`TensorError::InvalidState`] if the tensor is not rank 2.
    pub fn transpose(&mut self) -> Result<&mut Self, TensorError> {
        if self.arity() != 2 {
            return Err(TensorError::InvalidState {
                op: "transpose",
                requirement: "arity 2",
                shape: self.shape().clone(),
            });
        }
        let (rows, cols) = (self.shape().dims()[0], self.shape().dims()[1]);
        let src = self.content();
        let mut dst = Vec::with_capacity(src.len());
        for j in 0..cols {
            for i in 0..rows {
                dst.push(src[i * cols + j]);
            }
        }
        self.replace(Shape::matrix(cols, rows), dst);
        Ok(self)
    }

    /// Reinterprets a vector of length N as a `[1, N]` row matrix.
    pub fn to_row_matrix(&mut self) -> Result<&mut Self, TensorError> {
        let n = self.require_vector("to row matrix")?;
        self.reinterpret(Shape::matrix(1, n));
        Ok(self)
    }

    /// Reinterprets a vector of length N as an `[N, 1]` column matrix.
    pub fn to_column_matrix(&mut self) -> Result<&mut Self, TensorError> {
        let n = self.require_vector("to column matrix")?;
        self.reinterpret(Shape::matrix(n, 1));
        Ok(self)
    }

    /// Flattens a vector, or a row or column matrix, to rank 1.
    pub fn to_vector(&mut self) -> Result<&mut Self, TensorError> {
        let flattenable = match self.shape().dims() {
            [_] => true,
            [rows, cols] => *rows == 1 || *cols == 1,
            _ => false,
        };
        if !flattenable {
            return Err(self.unsupported("to vector"));
        }
        let n = self.num_elements();
        self.reinterpret(Shape::vector(n));
        Ok(self)
    }

    fn require_vector(&self, op: &'static str) -> Result<usize, TensorError> {
        match self.shape().dims() {
            [n] => Ok(*n),
            _ => Err(self.unsupported(op)),
        }
    }

    fn unsupported(&self, op: &'static str) -> TensorError {
        TensorError::Unsupported {
            op,
            arity: self.arity(),
            shape: self.shape().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_transpose_reorders_values() {
        let mut t = Tensor::from_rows(&[[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        t.transpose().unwrap();
        assert_eq!(t.shape(), &Shape::matrix(3, 2));
        assert_eq!(t.content(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.get(&[2, 1]).unwrap(), 6.0);
    }

    #[test]
    fn test_transpose_requires_rank_two() {
        let mut v = Tensor::from_vec(Shape::vector(3), vec![1.0f32, 2.0, 3.0]).unwrap();
        let err = v.transpose().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_product_transpose_identity() {
        // (A x B)^T == B^T x A^T
        let a = Tensor::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let b = Tensor::from_rows(&[[1.0, 0.5], [-1.0, 2.0], [0.0, 3.0]]).unwrap();

        let mut lhs = a.matrix_mul_n(&b).unwrap();
        lhs.transpose().unwrap();

        let mut bt = b.duplicate();
        bt.transpose().unwrap();
        let mut at = a.duplicate();
        at.transpose().unwrap();
        let rhs = bt.matrix_mul_n(&at).unwrap();

        assert!(lhs.same_shape(&rhs));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_row_and_column_matrix_keep_values() {
        let v = Tensor::from_vec(Shape::vector(3), vec![1.0f64, 2.0, 3.0]).unwrap();

        let mut row = v.duplicate();
        row.to_row_matrix().unwrap();
        assert_eq!(row.shape(), &Shape::matrix(1, 3));
        assert_eq!(row.content(), v.content());

        let mut col = v.duplicate();
        col.to_column_matrix().unwrap();
        assert_eq!(col.shape(), &Shape::matrix(3, 1));
        assert_eq!(col.content(), v.content());
    }

    #[test]
    fn test_matrix_cannot_become_row_matrix() {
        let mut m = Tensor::<f32>::zeros(Shape::matrix(2, 2)).unwrap();
        assert_eq!(m.to_row_matrix().unwrap_err().kind(), ErrorKind::Unsupported);
        assert_eq!(m.to_column_matrix().unwrap_err().kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_to_vector() {
        let mut col = Tensor::<f32>::zeros(Shape::matrix(4, 1)).unwrap();
        col.to_vector().unwrap();
        assert_eq!(col.shape(), &Shape::vector(4));

        let mut square = Tensor::<f32>::zeros(Shape::matrix(2, 2)).unwrap();
        assert_eq!(square.to_vector().unwrap_err().kind(), ErrorKind::Unsupported);

        let mut cube = Tensor::<f32>::zeros(Shape::new(vec![1, 1, 2])).unwrap();
        assert!(cube.to_vector().is_err());
    }
}
