// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-calc
//!
//! Command-line front end for the formula engine.
//!
//! ## Usage
//! ```bash
//! # Evaluate a formula; %0 is the receiver, %1.. the operands
//! tensor-calc eval -f "relu(%0 x %1)" \
//!     -r '{"sizes":[1,2],"content":[1.0,-1.0]}' \
//!     -o @weights.json
//!
//! # Show tokens and the parsed tree
//! tensor-calc parse -f "linear((%0.m1 x %1).T).v"
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tensor-calc",
    about = "Evaluate tensor formulas against JSON-encoded tensors",
    version,
    author
)]
struct Cli {
    /// Path to a TOML engine configuration file.
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula and print the resulting tensor as JSON.
    Eval {
        /// Formula text, e.g. "sigmoid(%0 x %1)".
        #[arg(short, long)]
        formula: String,

        /// Receiver tensor (%0): inline JSON or @path.
        #[arg(short, long)]
        receiver: String,

        /// Further operands (%1, %2, ...): inline JSON or @path.
        #[arg(short, long = "operand")]
        operands: Vec<String>,

        /// Evaluate in double precision.
        #[arg(long = "f64")]
        double: bool,

        /// Pretty-print the JSON result.
        #[arg(long)]
        pretty: bool,
    },

    /// Tokenize and parse a formula without evaluating it.
    Parse {
        /// Formula text.
        #[arg(short, long)]
        formula: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Eval {
            formula,
            receiver,
            operands,
            double,
            pretty,
        } => {
            let request = commands::eval::Request {
                formula,
                receiver,
                operands,
                pretty,
            };
            if double {
                commands::eval::execute::<f64>(config, &request)
            } else {
                commands::eval::execute::<f32>(config, &request)
            }
        }
        Commands::Parse { formula } => commands::parse::execute(&formula),
    }
}
