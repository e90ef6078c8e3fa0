// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Maps every [`FunctionTag`] to the strategy that evaluates it.
//!
//! Three families of strategy exist:
//! - [`Accumulator`]s fold a whole tensor into one value. A fresh
//!   accumulator is created for every call so no state leaks between
//!   evaluations.
//! - [`ElementwiseFunction`]s rewrite values in place.
//! - Shape operations are the suffix methods on [`Tensor`].

use crate::activation::{Leaky, Pointwise, Softmax, SoftmaxDerivative};
use crate::{FunctionFamily, FunctionTag};
use num_traits::Float;
use std::collections::HashMap;
use tensor_core::{Element, Tensor, TensorError};

/// Stateful reduction over every element of a tensor.
pub trait Accumulator<E: Element>: Send {
    /// Feeds one value.
    fn process(&mut self, value: E);

    /// Returns the reduced value.
    fn finish(&self) -> E;
}

/// Per-element map applied in place.
pub trait ElementwiseFunction<E: Element>: Send + Sync {
    /// Rewrites `tensor`. `param` is the optional second call argument.
    fn apply(&self, tensor: &mut Tensor<E>, param: Option<E>);

    /// Whether a second, single-valued argument is accepted.
    fn accepts_param(&self) -> bool {
        false
    }
}

/// Signature of the shape suffix methods on [`Tensor`].
pub type ShapeFn<E> = fn(&mut Tensor<E>) -> Result<&mut Tensor<E>, TensorError>;

/// How a single function is evaluated.
pub enum Strategy<E: Element> {
    Aggregate(fn() -> Box<dyn Accumulator<E>>),
    Elementwise(Box<dyn ElementwiseFunction<E>>),
    Shape(ShapeFn<E>),
}

impl<E: Element> Strategy<E> {
    pub fn family(&self) -> FunctionFamily {
        match self {
            Strategy::Aggregate(_) => FunctionFamily::Aggregate,
            Strategy::Elementwise(_) => FunctionFamily::Elementwise,
            Strategy::Shape(_) => FunctionFamily::Shape,
        }
    }
}

// ── Accumulators ───────────────────────────────────────────────

struct MinAccumulator<E>(E);

impl<E: Element> Accumulator<E> for MinAccumulator<E> {
    fn process(&mut self, value: E) {
        self.0 = Float::min(self.0, value);
    }

    fn finish(&self) -> E {
        self.0
    }
}

struct MaxAccumulator<E>(E);

impl<E: Element> Accumulator<E> for MaxAccumulator<E> {
    fn process(&mut self, value: E) {
        self.0 = Float::max(self.0, value);
    }

    fn finish(&self) -> E {
        self.0
    }
}

struct SumAbsAccumulator<E>(E);

impl<E: Element> Accumulator<E> for SumAbsAccumulator<E> {
    fn process(&mut self, value: E) {
        self.0 = self.0 + value.abs();
    }

    fn finish(&self) -> E {
        self.0
    }
}

struct SumSqrAccumulator<E>(E);

impl<E: Element> Accumulator<E> for SumSqrAccumulator<E> {
    fn process(&mut self, value: E) {
        self.0 = self.0 + value * value;
    }

    fn finish(&self) -> E {
        self.0
    }
}

fn min_accumulator<E: Element>() -> Box<dyn Accumulator<E>> {
    Box::new(MinAccumulator(E::infinity()))
}

fn max_accumulator<E: Element>() -> Box<dyn Accumulator<E>> {
    Box::new(MaxAccumulator(E::neg_infinity()))
}

fn sum_abs_accumulator<E: Element>() -> Box<dyn Accumulator<E>> {
    Box::new(SumAbsAccumulator(E::zero()))
}

fn sum_sqr_accumulator<E: Element>() -> Box<dyn Accumulator<E>> {
    Box::new(SumSqrAccumulator(E::zero()))
}

// ── Registry ───────────────────────────────────────────────────

/// Function lookup table for one element type.
pub struct FunctionRegistry<E: Element> {
    strategies: HashMap<FunctionTag, Strategy<E>>,
}

impl<E: Element> FunctionRegistry<E> {
    /// Registry covering every built-in function and suffix.
    ///
    /// `leaky_slope` is used by `leakyReLu` / `DleakyReLu` when the call
    /// has no second argument.
    pub fn standard(leaky_slope: E) -> Self {
        let mut registry = Self {
            strategies: HashMap::with_capacity(
                FunctionTag::FUNCTIONS.len() + FunctionTag::SUFFIXES.len(),
            ),
        };

        registry.register(FunctionTag::Min, Strategy::Aggregate(min_accumulator::<E>));
        registry.register(FunctionTag::Max, Strategy::Aggregate(max_accumulator::<E>));
        registry.register(FunctionTag::SumAbs, Strategy::Aggregate(sum_abs_accumulator::<E>));
        registry.register(FunctionTag::SumSqr, Strategy::Aggregate(sum_sqr_accumulator::<E>));

        for tag in [
            FunctionTag::Sqrt,
            FunctionTag::Linear,
            FunctionTag::DLinear,
            FunctionTag::Relu,
            FunctionTag::DRelu,
            FunctionTag::Sigmoid,
            FunctionTag::DSigmoid,
            FunctionTag::Tanh,
            FunctionTag::DTanh,
        ] {
            if let Some(pointwise) = Pointwise::for_tag(tag) {
                registry.register(tag, Strategy::Elementwise(Box::new(pointwise)));
            }
        }
        registry.register(
            FunctionTag::LeakyRelu,
            Strategy::Elementwise(Box::new(Leaky::forward(leaky_slope))),
        );
        registry.register(
            FunctionTag::DLeakyRelu,
            Strategy::Elementwise(Box::new(Leaky::derivative(leaky_slope))),
        );
        registry.register(FunctionTag::Softmax, Strategy::Elementwise(Box::new(Softmax)));
        registry.register(
            FunctionTag::DSoftmax,
            Strategy::Elementwise(Box::new(SoftmaxDerivative)),
        );

        registry.register(FunctionTag::Transpose, Strategy::Shape(Tensor::transpose));
        registry.register(FunctionTag::ToRowMatrix, Strategy::Shape(Tensor::to_row_matrix));
        registry.register(
            FunctionTag::ToColumnMatrix,
            Strategy::Shape(Tensor::to_column_matrix),
        );
        registry.register(FunctionTag::ToVector, Strategy::Shape(Tensor::to_vector));

        registry
    }

    pub(crate) fn register(&mut self, tag: FunctionTag, strategy: Strategy<E>) {
        debug_assert_eq!(tag.family(), strategy.family(), "{tag} registered in wrong family");
        self.strategies.insert(tag, strategy);
    }

    pub fn get(&self, tag: FunctionTag) -> Option<&Strategy<E>> {
        self.strategies.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
