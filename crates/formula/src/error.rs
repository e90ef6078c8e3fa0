// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for formula parsing and evaluation.

use tensor_core::{ErrorKind, Shape, TensorError};

/// Errors that can occur while lexing, parsing or evaluating a formula.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormulaError {
    /// The formula text is empty or only whitespace.
    #[error("formula is empty")]
    EmptyFormula,

    /// Lexical or grammatical failure at a byte offset in the formula.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A `%N` reference points past the supplied operands.
    #[error("formula references %{index} but only {available} operand(s) are bound")]
    MissingOperand { index: usize, available: usize },

    /// A function was called with the wrong number of arguments.
    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        function: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// A parameter argument (e.g. a leaky slope) did not evaluate to one value.
    #[error("{function} parameter must be a single value, got shape {shape}")]
    NonScalarParameter {
        function: &'static str,
        shape: Shape,
    },

    /// No strategy is registered for the function.
    #[error("function {0} is not supported by this engine")]
    Unsupported(&'static str),

    /// Engine configuration could not be read or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A tensor operation failed during evaluation.
    #[error(transparent)]
    Tensor(#[from] TensorError),
}

impl FormulaError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        FormulaError::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Maps the error onto the engine-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormulaError::Syntax { .. } => ErrorKind::Syntax,
            FormulaError::Unsupported(_) => ErrorKind::Unsupported,
            FormulaError::Tensor(e) => e.kind(),
            FormulaError::EmptyFormula
            | FormulaError::MissingOperand { .. }
            | FormulaError::ArgumentCount { .. }
            | FormulaError::NonScalarParameter { .. }
            | FormulaError::Config(_) => ErrorKind::Argument,
        }
    }

    /// Byte offset of a syntax error, if this is one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            FormulaError::Syntax { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
