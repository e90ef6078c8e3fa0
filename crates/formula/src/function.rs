// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Function and suffix names known to the formula language.

use std::fmt;

/// The three kinds of functions a formula can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionFamily {
    /// Reduces a whole tensor to one value.
    Aggregate,
    /// Maps values in place, keeping the shape.
    Elementwise,
    /// Changes the size metadata (written as a `.suffix`).
    Shape,
}

/// Every named operation in the formula language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionTag {
    Min,
    Max,
    SumAbs,
    SumSqr,
    Sqrt,
    Linear,
    DLinear,
    Relu,
    DRelu,
    Sigmoid,
    DSigmoid,
    Tanh,
    DTanh,
    LeakyRelu,
    DLeakyRelu,
    Softmax,
    DSoftmax,
    Transpose,
    ToRowMatrix,
    ToColumnMatrix,
    ToVector,
}

impl FunctionTag {
    /// Tags written as `name(args)`.
    pub const FUNCTIONS: [FunctionTag; 17] = [
        FunctionTag::Min,
        FunctionTag::Max,
        FunctionTag::SumAbs,
        FunctionTag::SumSqr,
        FunctionTag::Sqrt,
        FunctionTag::Linear,
        FunctionTag::DLinear,
        FunctionTag::Relu,
        FunctionTag::DRelu,
        FunctionTag::Sigmoid,
        FunctionTag::DSigmoid,
        FunctionTag::Tanh,
        FunctionTag::DTanh,
        FunctionTag::LeakyRelu,
        FunctionTag::DLeakyRelu,
        FunctionTag::Softmax,
        FunctionTag::DSoftmax,
    ];

    /// Tags written as `term.suffix`.
    pub const SUFFIXES: [FunctionTag; 4] = [
        FunctionTag::Transpose,
        FunctionTag::ToRowMatrix,
        FunctionTag::ToColumnMatrix,
        FunctionTag::ToVector,
    ];

    /// The spelling used in formulas.
    pub fn name(self) -> &'static str {
        match self {
            FunctionTag::Min => "min",
            FunctionTag::Max => "max",
            FunctionTag::SumAbs => "sumAbs",
            FunctionTag::SumSqr => "sumSqr",
            FunctionTag::Sqrt => "sqrt",
            FunctionTag::Linear => "linear",
            FunctionTag::DLinear => "Dlinear",
            FunctionTag::Relu => "relu",
            FunctionTag::DRelu => "Drelu",
            FunctionTag::Sigmoid => "sigmoid",
            FunctionTag::DSigmoid => "Dsigmoid",
            FunctionTag::Tanh => "tanh",
            FunctionTag::DTanh => "Dtanh",
            FunctionTag::LeakyRelu => "leakyReLu",
            FunctionTag::DLeakyRelu => "DleakyReLu",
            FunctionTag::Softmax => "softmax",
            FunctionTag::DSoftmax => "Dsoftmax",
            FunctionTag::Transpose => "T",
            FunctionTag::ToRowMatrix => "m1",
            FunctionTag::ToColumnMatrix => "m2",
            FunctionTag::ToVector => "v",
        }
    }

    pub fn family(self) -> FunctionFamily {
        match self {
            FunctionTag::Min | FunctionTag::Max | FunctionTag::SumAbs | FunctionTag::SumSqr => {
                FunctionFamily::Aggregate
            }
            FunctionTag::Transpose
            | FunctionTag::ToRowMatrix
            | FunctionTag::ToColumnMatrix
            | FunctionTag::ToVector => FunctionFamily::Shape,
            _ => FunctionFamily::Elementwise,
        }
    }

    /// Looks up a callable function name. Names are case-sensitive.
    pub fn from_function_name(name: &str) -> Option<Self> {
        Self::FUNCTIONS.into_iter().find(|tag| tag.name() == name)
    }

    /// Looks up a suffix name (`T`, `m1`, `m2`, `v`).
    pub fn from_suffix_name(name: &str) -> Option<Self> {
        Self::SUFFIXES.into_iter().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for FunctionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
