// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # formula
//!
//! A small expression language over [`tensor_core::Tensor`], used by layer
//! code to write forward and backward passes as formula strings.
//!
//! ```text
//!   text ──► lex ──► parse ──► Node ──► Evaluator ──► Tensor
//!                        (cached by FormulaEngine)
//! ```
//!
//! - `%0`, `%1`, ... bind to the receiver and the call's operands.
//! - `+ - * /` broadcast a single-element side; `x` is matrix multiply.
//! - Functions: `min`, `max`, `sumAbs`, `sumSqr`, `sqrt` and the
//!   activation/derivative pairs (`relu`/`Drelu`, `leakyReLu(x, slope)`, ...).
//! - Suffixes: `.T`, `.m1` (row matrix), `.m2` (column matrix), `.v`.
//!
//! # Example
//! ```
//! use formula::Calculate;
//! use tensor_core::{Shape, Tensor};
//!
//! let input = Tensor::from_vec(Shape::vector(2), vec![1.0f64, -1.0]).unwrap();
//! let weights = Tensor::from_rows(&[[0.5, 1.0], [2.0, -1.0]]).unwrap();
//! let out = input.calculate("relu((%0.m1 x %1).T).v", &[&weights]).unwrap();
//! assert_eq!(out.content(), &[0.0, 2.0]);
//! ```

mod activation;
mod ast;
pub mod config;
mod engine;
mod error;
mod eval;
mod function;
pub mod lexer;
mod parser;
pub mod registry;

pub use ast::{Chain, Node};
pub use config::EngineConfig;
pub use engine::{Calculate, EngineElement, FormulaEngine};
pub use error::FormulaError;
pub use eval::Evaluator;
pub use function::{FunctionFamily, FunctionTag};
pub use lexer::{lex, Token, TokenKind};
pub use parser::{parse, MAX_NESTING};
pub use registry::FunctionRegistry;
