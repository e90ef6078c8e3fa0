// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Matrix multiplication operation.

use crate::{Element, Shape, Tensor, TensorError};

/// Computes the matrix product `lhs x rhs` into a newly allocated tensor.
///
/// `lhs` is `[M, K]`, `rhs` is `[K, N]` and the result is `[M, N]`.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] naming both shapes if either input
/// is not rank 2 or the inner dimensions differ.
pub fn matmul<E: Element>(lhs: &Tensor<E>, rhs: &Tensor<E>) -> Result<Tensor<E>, TensorError> {
    if !lhs.shape().is_matmul_compatible(rhs.shape()) {
        return Err(TensorError::ShapeMismatch {
            op: "matrix multiply",
            lhs: lhs.shape().clone(),
            rhs: rhs.shape().clone(),
        });
    }

    let lhs_dims = lhs.shape().dims();
    let rhs_dims = rhs.shape().dims();
    let (m, k, n) = (lhs_dims[0], lhs_dims[1], rhs_dims[1]);

    let mut c = vec![E::zero(); m * n];
    matmul_generic(lhs.content(), rhs.content(), &mut c, m, k, n);
    Tensor::from_vec(Shape::matrix(m, n), c)
}

/// Portable matrix multiplication kernel.
///
/// Uses ikj loop order so the inner loop walks a row of `b` and a row of `c`
/// sequentially in memory. `c` must be zeroed.
fn matmul_generic<E: Element>(a: &[E], b: &[E], c: &mut [E], m: usize, k: usize, n: usize) {
    for i in 0..m {
        let c_row = &mut c[i * n..(i + 1) * n];
        for p in 0..k {
            let a_ip = a[i * k + p];
            let b_row = &b[p * n..(p + 1) * n];
            for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                *c_ij = *c_ij + a_ip * b_pj;
            }
        }
    }
}
