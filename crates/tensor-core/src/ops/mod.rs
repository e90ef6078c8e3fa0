// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor arithmetic operations.
//!
//! Binary arithmetic follows the broadcasting rules of [`BinaryOp`];
//! mutating forms write into and return the left operand, the `_n` forms
//! duplicate it first.

mod arithmetic;
mod matmul_op;
mod reshape_op;
mod softmax_op;

pub use arithmetic::BinaryOp;
pub use matmul_op::matmul;
pub use softmax_op::softmax;
