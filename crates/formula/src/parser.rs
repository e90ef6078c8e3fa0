// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Recursive-descent parser for formulas.
//!
//! ```text
//! Add   := Mul (('+' | '-') Mul)*
//! Mul   := Unary (('*' | '/' | 'x') Unary)*
//! Unary := '-' Term | Term
//! Term  := Primary ('.' Suffix)*
//! Primary := Number | OperandRef | FuncName '(' Add (',' Add)* ')' | '(' Add ')'
//! ```
//!
//! A level with more than one operand collapses into one [`Chain`] so that
//! `1 - 2 - 3` evaluates left to right.
//!
//! Groups, calls and unary minus may nest at most [`MAX_NESTING`] levels.

use crate::lexer::{lex, Token, TokenKind};
use crate::{Chain, FormulaError, Node};
use tensor_core::BinaryOp;

/// Deepest allowed nesting of `(...)`, `f(...)` and unary `-`.
pub const MAX_NESTING: usize = 256;

/// Parses a complete formula.
///
/// # Errors
/// [`FormulaError::EmptyFormula`] for blank input, otherwise
/// [`FormulaError::Syntax`] carrying the offset of the offending token.
/// Nesting past [`MAX_NESTING`] is a syntax error at the first token that
/// exceeds it.
pub fn parse(formula: &str) -> Result<Node, FormulaError> {
    if formula.trim().is_empty() {
        return Err(FormulaError::EmptyFormula);
    }
    let mut parser = Parser::new(lex(formula)?);
    let node = parser.parse_add()?;
    let trailing = parser.peek();
    if trailing.kind != TokenKind::End {
        return Err(FormulaError::syntax(
            trailing.offset,
            format!("unexpected {} after end of expression", trailing.kind),
        ));
    }
    Ok(node)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    // ── Token access ───────────────────────────────────────────

    fn peek(&self) -> Token {
        // The lexer always terminates the stream with `End`.
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn peek_operator(&self, accepted: &[BinaryOp]) -> Option<BinaryOp> {
        match self.peek().kind {
            TokenKind::Operator(op) if accepted.contains(&op) => Some(op),
            _ => None,
        }
    }

    fn expect_rparen(&mut self, context: impl FnOnce() -> String) -> Result<(), FormulaError> {
        let tok = self.peek();
        if tok.kind == TokenKind::RParen {
            self.advance();
            Ok(())
        } else {
            Err(FormulaError::syntax(
                tok.offset,
                format!("expected ')' {}, found {}", context(), tok.kind),
            ))
        }
    }

    /// Runs `f` one nesting level deeper, failing at `offset` past the limit.
    fn nested<T>(
        &mut self,
        offset: usize,
        f: impl FnOnce(&mut Self) -> Result<T, FormulaError>,
    ) -> Result<T, FormulaError> {
        if self.depth >= MAX_NESTING {
            return Err(FormulaError::syntax(
                offset,
                format!("formula nested deeper than {MAX_NESTING} levels"),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ── Grammar ────────────────────────────────────────────────

    fn parse_add(&mut self) -> Result<Node, FormulaError> {
        self.parse_chain(&[BinaryOp::Add, BinaryOp::Sub], Self::parse_mul, Node::AddChain)
    }

    fn parse_mul(&mut self) -> Result<Node, FormulaError> {
        self.parse_chain(
            &[BinaryOp::Mul, BinaryOp::Div, BinaryOp::MatMul],
            Self::parse_unary,
            Node::MulChain,
        )
    }

    fn parse_chain(
        &mut self,
        accepted: &[BinaryOp],
        operand: fn(&mut Self) -> Result<Node, FormulaError>,
        wrap: fn(Chain) -> Node,
    ) -> Result<Node, FormulaError> {
        let first = operand(self)?;
        let mut operands = vec![first];
        let mut operators = Vec::new();
        while let Some(op) = self.peek_operator(accepted) {
            self.advance();
            operators.push(op);
            operands.push(operand(self)?);
        }
        if operators.is_empty() {
            Ok(operands.remove(0))
        } else {
            Ok(wrap(Chain {
                operands,
                operators,
            }))
        }
    }

    fn parse_unary(&mut self) -> Result<Node, FormulaError> {
        let tok = self.peek();
        if tok.kind == TokenKind::Operator(BinaryOp::Sub) {
            self.advance();
            let inner = self.nested(tok.offset, Self::parse_term)?;
            return Ok(Node::Negate(Box::new(inner)));
        }
        self.parse_term()
    }

    fn parse_term(&mut self) -> Result<Node, FormulaError> {
        let mut node = self.parse_primary()?;
        while self.peek().kind == TokenKind::Dot {
            self.advance();
            let tok = self.advance();
            match tok.kind {
                TokenKind::Suffix(tag) => {
                    node = Node::Function {
                        tag,
                        args: vec![node],
                    };
                }
                other => {
                    return Err(FormulaError::syntax(
                        tok.offset,
                        format!("expected suffix (T, m1, m2, v) after '.', found {other}"),
                    ))
                }
            }
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Node, FormulaError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Number(v) => Ok(Node::Constant(v)),
            TokenKind::Operand(i) => Ok(Node::Operand(i)),
            TokenKind::LParen => self.nested(tok.offset, |p| {
                let inner = p.parse_add()?;
                p.expect_rparen(|| format!("to close '(' at offset {}", tok.offset))?;
                Ok(inner)
            }),
            TokenKind::Function(tag) => {
                let open = self.peek();
                if open.kind != TokenKind::LParen {
                    return Err(FormulaError::syntax(
                        open.offset,
                        format!("expected '(' after function '{tag}', found {}", open.kind),
                    ));
                }
                self.advance();
                let args = self.nested(tok.offset, |p| {
                    let mut args = vec![p.parse_add()?];
                    while p.peek().kind == TokenKind::Comma {
                        p.advance();
                        args.push(p.parse_add()?);
                    }
                    p.expect_rparen(|| format!("to close the arguments of '{tag}'"))?;
                    Ok(args)
                })?;
                Ok(Node::Function { tag, args })
            }
            other => Err(FormulaError::syntax(
                tok.offset,
                format!("expected a number, operand, function call or '(', found {other}"),
            )),
        }
    }
}
