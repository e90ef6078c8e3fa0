// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Supported tensor element data types.

use num_traits::Float;
use std::fmt::{Debug, Display};

/// Enumerates the numeric widths a [`crate::Tensor`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit IEEE 754 floating point.
    F32,
    /// 64-bit IEEE 754 floating point.
    F64,
}

impl DType {
    /// Returns a human-readable label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
        }
    }
}

/// A floating-point element type a tensor can be instantiated with.
///
/// One tensor and engine implementation serves both widths; the width only
/// shows up here, in the equality tolerance and in literal conversion.
pub trait Element:
    Float + Debug + Display + Default + Send + Sync + serde::Serialize + 'static
{
    /// Runtime tag for this width.
    const DTYPE: DType;

    /// Elementwise tolerance used by tensor equality.
    fn epsilon_eq() -> Self;

    /// Converts a formula literal into this width.
    fn from_literal(value: f64) -> Self;

    /// Widens to `f64` for display and serialisation helpers.
    fn widen(self) -> f64;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn epsilon_eq() -> Self {
        1e-5
    }

    fn from_literal(value: f64) -> Self {
        value as f32
    }

    fn widen(self) -> f64 {
        f64::from(self)
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    fn epsilon_eq() -> Self {
        1e-9
    }

    fn from_literal(value: f64) -> Self {
        value
    }

    fn widen(self) -> f64 {
        self
    }
}
