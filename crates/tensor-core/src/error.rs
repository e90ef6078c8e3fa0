// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor operations.

use crate::Shape;

/// Broad classification of a failure, shared with the formula engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input: shape mismatch, out-of-range index, short buffer, etc.
    Argument,
    /// Lexical or grammatical failure in a formula.
    Syntax,
    /// The operation is not implemented for the tensor's arity.
    Unsupported,
    /// The tensor is not in the state the operation requires.
    State,
}

/// Errors that can occur during tensor operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    /// The content buffer does not match the number of elements the shape describes.
    #[error("buffer size mismatch: shape {shape} needs {expected} elements, got {actual}")]
    BufferSizeMismatch {
        shape: Shape,
        expected: usize,
        actual: usize,
    },

    /// A shape has no dimensions or a zero-sized dimension.
    #[error("invalid shape {0}: every tensor needs at least one dimension and no empty dimensions")]
    InvalidShape(Shape),

    /// Two tensors have incompatible shapes for the requested operation.
    #[error("incompatible shapes for {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// An index vector has the wrong number of coordinates.
    #[error("index has {actual} coordinates but the tensor has arity {expected}")]
    IndexArity { expected: usize, actual: usize },

    /// A coordinate lies outside `0..size`.
    #[error("index {index} out of range for dimension {dim} of size {size}")]
    IndexOutOfRange {
        dim: usize,
        index: usize,
        size: usize,
    },

    /// An external slice buffer is shorter than the number of matching positions.
    #[error("slice buffer too short: {needed} positions match, buffer holds {actual}")]
    SliceBufferTooShort { needed: usize, actual: usize },

    /// The operation needs a precondition the tensor does not satisfy.
    #[error("{op} requires {requirement}, tensor has shape {shape}")]
    InvalidState {
        op: &'static str,
        requirement: &'static str,
        shape: Shape,
    },

    /// The operation is not implemented for this arity.
    #[error("{op} is not supported for arity {arity} (shape {shape})")]
    Unsupported {
        op: &'static str,
        arity: usize,
        shape: Shape,
    },
}

impl TensorError {
    /// Maps the error onto the engine-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TensorError::BufferSizeMismatch { .. }
            | TensorError::InvalidShape(_)
            | TensorError::ShapeMismatch { .. }
            | TensorError::IndexArity { .. }
            | TensorError::IndexOutOfRange { .. }
            | TensorError::SliceBufferTooShort { .. } => ErrorKind::Argument,
            TensorError::InvalidState { .. } => ErrorKind::State,
            TensorError::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }
}
