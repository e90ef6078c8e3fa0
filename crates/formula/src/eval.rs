// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tree-walking evaluator.
//!
//! Every node produces a fresh tensor. Operands are duplicated on access,
//! so neither the receiver nor any bound operand is modified.

use crate::registry::{FunctionRegistry, Strategy};
use crate::{Chain, FormulaError, FunctionTag, Node};
use tensor_core::{Element, Tensor};

/// Evaluates parsed formulas against bound operands.
pub struct Evaluator<'a, E: Element> {
    operands: &'a [&'a Tensor<E>],
    registry: &'a FunctionRegistry<E>,
}

impl<'a, E: Element> Evaluator<'a, E> {
    /// `operands[0]` is `%0`, normally the receiver.
    pub fn new(operands: &'a [&'a Tensor<E>], registry: &'a FunctionRegistry<E>) -> Self {
        Self { operands, registry }
    }

    pub fn evaluate(&self, node: &Node) -> Result<Tensor<E>, FormulaError> {
        match node {
            Node::Constant(v) => Ok(Tensor::scalar(E::from_literal(*v))),
            Node::Operand(index) => self
                .operands
                .get(*index)
                .map(|t| t.duplicate())
                .ok_or(FormulaError::MissingOperand {
                    index: *index,
                    available: self.operands.len(),
                }),
            Node::Negate(inner) => {
                let mut value = self.evaluate(inner)?;
                value.map_in_place(|x| -x);
                Ok(value)
            }
            Node::AddChain(chain) | Node::MulChain(chain) => self.evaluate_chain(chain),
            Node::Function { tag, args } => self.evaluate_function(*tag, args),
        }
    }

    fn evaluate_chain(&self, chain: &Chain) -> Result<Tensor<E>, FormulaError> {
        let mut operands = chain.operands.iter();
        let Some(first) = operands.next() else {
            return Err(FormulaError::EmptyFormula);
        };
        let mut acc = self.evaluate(first)?;
        for (op, operand) in chain.operators.iter().zip(operands) {
            let rhs = self.evaluate(operand)?;
            acc.apply(*op, &rhs)?;
        }
        Ok(acc)
    }

    fn evaluate_function(&self, tag: FunctionTag, args: &[Node]) -> Result<Tensor<E>, FormulaError> {
        let strategy = self
            .registry
            .get(tag)
            .ok_or(FormulaError::Unsupported(tag.name()))?;

        match strategy {
            Strategy::Aggregate(factory) => {
                let input = self.single_argument(tag, args)?;
                let mut acc = factory();
                for value in input.content() {
                    acc.process(*value);
                }
                Ok(Tensor::scalar(acc.finish()))
            }
            Strategy::Elementwise(function) => {
                let (input, param) = if function.accepts_param() {
                    match args {
                        [input] => (self.evaluate(input)?, None),
                        [input, param] => (self.evaluate(input)?, Some(self.parameter(tag, param)?)),
                        _ => return Err(arity_error(tag, "1 or 2", args.len())),
                    }
                } else {
                    (self.single_argument(tag, args)?, None)
                };
                let mut value = input;
                function.apply(&mut value, param);
                Ok(value)
            }
            Strategy::Shape(reshape) => {
                let mut value = self.single_argument(tag, args)?;
                reshape(&mut value)?;
                Ok(value)
            }
        }
    }

    fn single_argument(&self, tag: FunctionTag, args: &[Node]) -> Result<Tensor<E>, FormulaError> {
        match args {
            [arg] => self.evaluate(arg),
            _ => Err(arity_error(tag, "1", args.len())),
        }
    }

    fn parameter(&self, tag: FunctionTag, node: &Node) -> Result<E, FormulaError> {
        let value = self.evaluate(node)?;
        match value.content() {
            [v] => Ok(*v),
            _ => Err(FormulaError::NonScalarParameter {
                function: tag.name(),
                shape: value.shape().clone(),
            }),
        }
    }
}

fn arity_error(tag: FunctionTag, expected: &'static str, actual: usize) -> FormulaError {
    FormulaError::ArgumentCount {
        function: tag.name(),
        expected,
        actual,
    }
}
