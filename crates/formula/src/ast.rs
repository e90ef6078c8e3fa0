// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Abstract syntax tree for parsed formulas.

use crate::{FunctionFamily, FunctionTag};
use std::fmt;
use tensor_core::BinaryOp;

/// An n-ary, left-to-right operator chain: `operands[0] op[0] operands[1] ...`.
///
/// Invariant: `operators.len() + 1 == operands.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub operands: Vec<Node>,
    pub operators: Vec<BinaryOp>,
}

/// A parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal, evaluated as a single-element tensor.
    Constant(f64),
    /// `%N`.
    Operand(usize),
    /// Unary minus.
    Negate(Box<Node>),
    /// `+` / `-` chain.
    AddChain(Chain),
    /// `*` / `/` / `x` chain.
    MulChain(Chain),
    /// A function call, or a `.suffix` applied to its single argument.
    Function { tag: FunctionTag, args: Vec<Node> },
}

impl Node {
    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + match self {
            Node::Constant(_) | Node::Operand(_) => 0,
            Node::Negate(inner) => inner.node_count(),
            Node::AddChain(chain) | Node::MulChain(chain) => {
                chain.operands.iter().map(Node::node_count).sum()
            }
            Node::Function { args, .. } => args.iter().map(Node::node_count).sum(),
        }
    }

    /// Highest `%N` index referenced, if any.
    pub fn max_operand(&self) -> Option<usize> {
        match self {
            Node::Constant(_) => None,
            Node::Operand(i) => Some(*i),
            Node::Negate(inner) => inner.max_operand(),
            Node::AddChain(chain) | Node::MulChain(chain) => {
                chain.operands.iter().filter_map(Node::max_operand).max()
            }
            Node::Function { args, .. } => args.iter().filter_map(Node::max_operand).max(),
        }
    }

    /// Writes `self` so that it parses back as a single term.
    fn fmt_term(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::AddChain(_) | Node::MulChain(_) | Node::Negate(_) => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl Chain {
    fn fmt_with(
        &self,
        f: &mut fmt::Formatter<'_>,
        needs_parens: impl Fn(&Node) -> bool,
    ) -> fmt::Result {
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.operators[i - 1])?;
            }
            if needs_parens(operand) {
                write!(f, "({operand})")?;
            } else {
                write!(f, "{operand}")?;
            }
        }
        Ok(())
    }
}

/// Renders canonical formula text that parses back to the same tree.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant(v) => write!(f, "{v}"),
            Node::Operand(i) => write!(f, "%{i}"),
            Node::Negate(inner) => {
                write!(f, "-")?;
                inner.fmt_term(f)
            }
            Node::AddChain(chain) => chain.fmt_with(f, |n| matches!(n, Node::AddChain(_))),
            Node::MulChain(chain) => {
                chain.fmt_with(f, |n| matches!(n, Node::AddChain(_) | Node::MulChain(_)))
            }
            Node::Function { tag, args } if tag.family() == FunctionFamily::Shape => {
                match args.as_slice() {
                    // `1.T` would lex as a malformed decimal.
                    [arg @ Node::Constant(_)] => write!(f, "({arg}).{tag}"),
                    [arg] => {
                        arg.fmt_term(f)?;
                        write!(f, ".{tag}")
                    }
                    _ => write_call(f, *tag, args),
                }
            }
            Node::Function { tag, args } => write_call(f, *tag, args),
        }
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, tag: FunctionTag, args: &[Node]) -> fmt::Result {
    write!(f, "{tag}(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    write!(f, ")")
}
