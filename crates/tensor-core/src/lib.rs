// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! N-dimensional numeric tensors for layer forward/backward arithmetic.
//!
//! This crate provides:
//! - [`Tensor`]: a flat, row-major buffer plus per-dimension sizes, generic
//!   over the element width ([`Element`] is implemented for `f32` and `f64`).
//! - [`Shape`]: size descriptors, strides and offset computation.
//! - Wildcard slicing: `None` in an index pattern selects a whole dimension.
//! - Broadcasting arithmetic ([`BinaryOp`]), matrix multiplication,
//!   transpose, row/column/vector reinterpretation and whole-tensor softmax.
//!
//! # Example
//! ```
//! use tensor_core::Tensor;
//!
//! let mut t = Tensor::from_rows(&[[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
//! t.div(&Tensor::scalar(10.0)).unwrap();
//! assert_eq!(t, Tensor::from_rows(&[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]).unwrap());
//! ```
//!
//! # Design Goals
//! - One implementation for every element width.
//! - Shapes are validated before any element is written.
//! - Clean error types via `thiserror`.

mod dtype;
mod error;
mod ops;
mod shape;
mod tensor;

pub use dtype::{DType, Element};
pub use error::{ErrorKind, TensorError};
pub use ops::{matmul, softmax, BinaryOp};
pub use shape::Shape;
pub use tensor::Tensor;
