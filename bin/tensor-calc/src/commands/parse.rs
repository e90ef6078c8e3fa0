// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `tensor-calc parse`: show how a formula is tokenized and parsed.

use formula::{lex, parse, TokenKind};

pub fn execute(formula: &str) -> anyhow::Result<()> {
    let tokens = lex(formula)?;

    println!("  Formula: {formula}");
    println!();
    println!("  {:<8} Token", "Offset");
    println!("  {}", "-".repeat(40));
    for token in &tokens {
        if token.kind != TokenKind::End {
            println!("  {:<8} {}", token.offset, token.kind);
        }
    }
    println!();

    let tree = parse(formula)?;
    println!("  Nodes:      {}", tree.node_count());
    match tree.max_operand() {
        Some(n) => println!("  Operands:   %0..%{n}"),
        None => println!("  Operands:   none"),
    }
    println!("  Canonical:  {tree}");
    println!();
    println!("{tree:#?}");
    Ok(())
}
