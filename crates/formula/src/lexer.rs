// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tokenizer for formula strings.
//!
//! Raw scanning is done by `logos`; identifiers are then resolved against
//! the operator `x`, the function-name table and the suffix-name table, in
//! that order. An identifier that does not resolve but does once a leading
//! or trailing `x` is split off lexes as that name plus a matrix multiply,
//! so `%0.Tx%1` reads as `%0.T x %1`. The token stream always ends with an
//! explicit [`TokenKind::End`] marker.

use crate::{FormulaError, FunctionTag};
use logos::Logos;
use std::fmt;
use tensor_core::BinaryOp;

/// A resolved token and its byte offset in the formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// Integer or decimal literal.
    Number(f64),
    /// `%N`: index into the bound operands, `%0` being the receiver.
    Operand(usize),
    Operator(BinaryOp),
    LParen,
    RParen,
    Comma,
    Dot,
    /// A callable function name.
    Function(FunctionTag),
    /// A shape suffix name (`T`, `m1`, `m2`, `v`).
    Suffix(FunctionTag),
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(v) => write!(f, "number {v}"),
            TokenKind::Operand(i) => write!(f, "operand %{i}"),
            TokenKind::Operator(op) => write!(f, "'{op}'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Function(tag) => write!(f, "function '{tag}'"),
            TokenKind::Suffix(tag) => write!(f, "suffix '{tag}'"),
            TokenKind::End => write!(f, "end of formula"),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Raw {
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    #[regex(r"%[0-9]+")]
    Operand,
    #[token("%")]
    Percent,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

/// Tokenizes `source`.
///
/// # Errors
/// [`FormulaError::Syntax`] for an unknown symbol, a `%` without digits,
/// an unknown identifier or an unreadable literal.
pub fn lex(source: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut lexer = Raw::lexer(source);

    while let Some(result) = lexer.next() {
        let offset = lexer.span().start;
        let text = lexer.slice();
        let kind = match result {
            Ok(Raw::Number) => TokenKind::Number(text.parse().map_err(|_| {
                FormulaError::syntax(offset, format!("invalid number '{text}'"))
            })?),
            Ok(Raw::Operand) => TokenKind::Operand(text[1..].parse().map_err(|_| {
                FormulaError::syntax(offset, format!("operand index in '{text}' is too large"))
            })?),
            Ok(Raw::Percent) => {
                return Err(FormulaError::syntax(
                    offset,
                    "expected operand digits after '%'",
                ))
            }
            Ok(Raw::Plus) => TokenKind::Operator(BinaryOp::Add),
            Ok(Raw::Minus) => TokenKind::Operator(BinaryOp::Sub),
            Ok(Raw::Star) => TokenKind::Operator(BinaryOp::Mul),
            Ok(Raw::Slash) => TokenKind::Operator(BinaryOp::Div),
            Ok(Raw::LParen) => TokenKind::LParen,
            Ok(Raw::RParen) => TokenKind::RParen,
            Ok(Raw::Comma) => TokenKind::Comma,
            Ok(Raw::Dot) => TokenKind::Dot,
            Ok(Raw::Ident) => {
                tokens.extend(resolve_identifier(text, offset)?);
                continue;
            }
            Err(()) => {
                return Err(FormulaError::syntax(
                    offset,
                    format!("unknown symbol '{text}'"),
                ))
            }
        };
        tokens.push(Token { kind, offset });
    }

    tokens.push(Token {
        kind: TokenKind::End,
        offset: source.len(),
    });
    Ok(tokens)
}

const MATMUL: TokenKind = TokenKind::Operator(BinaryOp::MatMul);

fn resolve_name(text: &str) -> Option<TokenKind> {
    if text == "x" {
        return Some(MATMUL);
    }
    FunctionTag::from_function_name(text)
        .map(TokenKind::Function)
        .or_else(|| FunctionTag::from_suffix_name(text).map(TokenKind::Suffix))
}

fn resolve_identifier(text: &str, offset: usize) -> Result<Vec<Token>, FormulaError> {
    let token = |kind, at| Token { kind, offset: at };
    if let Some(kind) = resolve_name(text) {
        return Ok(vec![token(kind, offset)]);
    }
    if let Some(head) = text.strip_suffix('x') {
        if let Some(kind) = resolve_name(head) {
            return Ok(vec![token(kind, offset), token(MATMUL, offset + head.len())]);
        }
    }
    if let Some(tail) = text.strip_prefix('x') {
        if let Some(kind) = resolve_name(tail) {
            return Ok(vec![token(MATMUL, offset), token(kind, offset + 1)]);
        }
    }
    Err(FormulaError::syntax(offset, format!("unknown name '{text}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_layer_formula() {
        assert_eq!(
            kinds("linear((%0.m1 x %1).T).v"),
            vec![
                TokenKind::Function(FunctionTag::Linear),
                TokenKind::LParen,
                TokenKind::LParen,
                TokenKind::Operand(0),
                TokenKind::Dot,
                TokenKind::Suffix(FunctionTag::ToRowMatrix),
                TokenKind::Operator(BinaryOp::MatMul),
                TokenKind::Operand(1),
                TokenKind::RParen,
                TokenKind::Dot,
                TokenKind::Suffix(FunctionTag::Transpose),
                TokenKind::RParen,
                TokenKind::Dot,
                TokenKind::Suffix(FunctionTag::ToVector),
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_literals_and_operators() {
        assert_eq!(
            kinds("1 - 2.5*%12/3"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Operator(BinaryOp::Sub),
                TokenKind::Number(2.5),
                TokenKind::Operator(BinaryOp::Mul),
                TokenKind::Operand(12),
                TokenKind::Operator(BinaryOp::Div),
                TokenKind::Number(3.0),
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_matmul_without_spaces() {
        assert_eq!(
            kinds("%0x%1"),
            vec![
                TokenKind::Operand(0),
                TokenKind::Operator(BinaryOp::MatMul),
                TokenKind::Operand(1),
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_matmul_glued_to_suffix_or_function() {
        let tokens = lex("%0.Tx%0").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token { kind: TokenKind::Operand(0), offset: 0 },
                Token { kind: TokenKind::Dot, offset: 2 },
                Token { kind: TokenKind::Suffix(FunctionTag::Transpose), offset: 3 },
                Token { kind: MATMUL, offset: 4 },
                Token { kind: TokenKind::Operand(0), offset: 5 },
                Token { kind: TokenKind::End, offset: 7 },
            ]
        );

        assert_eq!(
            kinds("%0 xsqrt(%1)"),
            vec![
                TokenKind::Operand(0),
                MATMUL,
                TokenKind::Function(FunctionTag::Sqrt),
                TokenKind::LParen,
                TokenKind::Operand(1),
                TokenKind::RParen,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_names_ending_in_x_are_not_split() {
        assert_eq!(
            kinds("max(%0)")[0],
            TokenKind::Function(FunctionTag::Max)
        );
        let err = lex("%0.Txx%1").unwrap_err();
        assert!(err.to_string().contains("unknown name 'Txx'"));
    }

    #[test]
    fn test_offsets() {
        let tokens = lex("  %0 +  sqrt(1)").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![2, 5, 8, 12, 13, 14, 15]);
    }

    #[test]
    fn test_empty_input_still_has_end_marker() {
        assert_eq!(kinds(""), vec![TokenKind::End]);
    }

    #[test]
    fn test_percent_without_digits() {
        let err = lex("%0 + %").unwrap_err();
        assert_eq!(err.offset(), Some(5));
        assert!(err.to_string().contains("after '%'"));
    }

    #[test]
    fn test_unknown_symbol() {
        let err = lex("%0 ^ 2").unwrap_err();
        assert_eq!(err.offset(), Some(3));
        assert!(err.to_string().contains("unknown symbol '^'"));
    }

    #[test]
    fn test_unknown_identifier() {
        let err = lex("gelu(%0)").unwrap_err();
        assert_eq!(err.offset(), Some(0));
        assert!(err.to_string().contains("unknown name 'gelu'"));
    }
}
