// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Softmax over a whole tensor.

use crate::{Element, Tensor};
use num_traits::Float;

/// Normalises the **entire** tensor in place: `x[i] = exp(x[i]) / sum(exp(x))`.
///
/// The shape is ignored; every element takes part in one distribution.
/// Uses the numerically stable variant that subtracts the maximum value
/// before exponentiation to prevent overflow.
pub fn softmax<E: Element>(tensor: &mut Tensor<E>) {
    let values = tensor.content_mut();
    let max_val = values.iter().copied().fold(E::neg_infinity(), Float::max);

    let mut sum = E::zero();
    for v in values.iter_mut() {
        *v = (*v - max_val).exp();
        sum = sum + *v;
    }

    if sum > E::zero() {
        let inv_sum = sum.recip();
        for v in values.iter_mut() {
            *v = *v * inv_sum;
        }
    }
}
