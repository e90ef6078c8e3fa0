// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Elementwise activation functions and their derivatives.

use crate::registry::ElementwiseFunction;
use crate::FunctionTag;
use tensor_core::{softmax, Element, Tensor};

/// A stateless `f(x)` applied to every element.
pub(crate) struct Pointwise<E> {
    f: fn(E) -> E,
}

impl<E: Element> Pointwise<E> {
    pub(crate) fn for_tag(tag: FunctionTag) -> Option<Self> {
        let f: fn(E) -> E = match tag {
            FunctionTag::Sqrt => |x| x.sqrt(),
            FunctionTag::Linear => |x| x,
            FunctionTag::DLinear => |_| E::one(),
            FunctionTag::Relu => |x| if x >= E::zero() { x } else { E::zero() },
            FunctionTag::DRelu => |x| if x >= E::zero() { E::one() } else { E::zero() },
            FunctionTag::Sigmoid => sigmoid,
            FunctionTag::DSigmoid => |x| {
                let s = sigmoid(x);
                s * (E::one() - s)
            },
            FunctionTag::Tanh => |x| x.tanh(),
            FunctionTag::DTanh => |x| {
                let t = x.tanh();
                E::one() - t * t
            },
            _ => return None,
        };
        Some(Self { f })
    }
}

impl<E: Element> ElementwiseFunction<E> for Pointwise<E> {
    fn apply(&self, tensor: &mut Tensor<E>, _param: Option<E>) {
        tensor.map_in_place(self.f);
    }
}

fn sigmoid<E: Element>(x: E) -> E {
    E::one() / (E::one() + (-x).exp())
}

/// Leaky ReLU and its derivative, parameterised by a slope.
pub(crate) struct Leaky<E> {
    default_slope: E,
    f: fn(E, E) -> E,
}

impl<E: Element> Leaky<E> {
    pub(crate) fn forward(default_slope: E) -> Self {
        Self {
            default_slope,
            f: |x, slope| if x >= E::zero() { x } else { slope * x },
        }
    }

    pub(crate) fn derivative(default_slope: E) -> Self {
        Self {
            default_slope,
            f: |x, slope| if x >= E::zero() { E::one() } else { slope.recip() },
        }
    }
}

impl<E: Element> ElementwiseFunction<E> for Leaky<E> {
    fn apply(&self, tensor: &mut Tensor<E>, param: Option<E>) {
        let slope = param.unwrap_or(self.default_slope);
        let f = self.f;
        tensor.map_in_place(|x| f(x, slope));
    }

    fn accepts_param(&self) -> bool {
        true
    }
}

/// Softmax over every element of the tensor, ignoring its shape.
pub(crate) struct Softmax;

impl<E: Element> ElementwiseFunction<E> for Softmax {
    fn apply(&self, tensor: &mut Tensor<E>, _param: Option<E>) {
        softmax(tensor);
    }
}

/// Diagonal approximation `p * (1 - p)` of the softmax Jacobian.
///
/// The off-diagonal `-p_i * p_j` terms are deliberately dropped; layer
/// backward passes are written against this simplification.
pub(crate) struct SoftmaxDerivative;

impl<E: Element> ElementwiseFunction<E> for SoftmaxDerivative {
    fn apply(&self, tensor: &mut Tensor<E>, _param: Option<E>) {
        softmax(tensor);
        tensor.map_in_place(|p| p * (E::one() - p));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::Shape;

    fn run(f: &dyn ElementwiseFunction<f64>, values: &[f64], param: Option<f64>) -> Vec<f64> {
        let mut t = Tensor::from_vec(Shape::vector(values.len()), values.to_vec()).unwrap();
        f.apply(&mut t, param);
        t.content().to_vec()
    }

    fn pointwise(tag: FunctionTag) -> Pointwise<f64> {
        Pointwise::for_tag(tag).unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_relu_pair() {
        assert_eq!(run(&pointwise(FunctionTag::Relu), &[-1.0, 0.0, 2.0], None), [0.0, 0.0, 2.0]);
        assert_eq!(run(&pointwise(FunctionTag::DRelu), &[-1.0, 0.0, 2.0], None), [0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_linear_pair() {
        assert_eq!(run(&pointwise(FunctionTag::Linear), &[-3.0, 4.0], None), [-3.0, 4.0]);
        assert_eq!(run(&pointwise(FunctionTag::DLinear), &[-3.0, 4.0], None), [1.0, 1.0]);
    }

    #[test]
    fn test_sigmoid_pair() {
        assert_close(&run(&pointwise(FunctionTag::Sigmoid), &[0.0], None), &[0.5]);
        assert_close(&run(&pointwise(FunctionTag::DSigmoid), &[0.0], None), &[0.25]);
    }

    #[test]
    fn test_tanh_pair() {
        assert_close(&run(&pointwise(FunctionTag::Tanh), &[0.0], None), &[0.0]);
        assert_close(&run(&pointwise(FunctionTag::DTanh), &[0.0], None), &[1.0]);
        let t = 0.5f64.tanh();
        assert_close(&run(&pointwise(FunctionTag::DTanh), &[0.5], None), &[1.0 - t * t]);
    }

    #[test]
    fn test_sqrt() {
        assert_close(&run(&pointwise(FunctionTag::Sqrt), &[4.0, 9.0], None), &[2.0, 3.0]);
    }

    #[test]
    fn test_non_pointwise_tags_rejected() {
        assert!(Pointwise::<f64>::for_tag(FunctionTag::Softmax).is_none());
        assert!(Pointwise::<f64>::for_tag(FunctionTag::Max).is_none());
    }

    #[test]
    fn test_leaky_default_and_explicit_slope() {
        let forward = Leaky::forward(0.1);
        assert_close(&run(&forward, &[-2.0, 3.0], None), &[-0.2, 3.0]);
        assert_close(&run(&forward, &[-2.0, 3.0], Some(0.5)), &[-1.0, 3.0]);

        let derivative = Leaky::derivative(0.1);
        assert_close(&run(&derivative, &[-2.0, 3.0], None), &[10.0, 1.0]);
        assert_close(&run(&derivative, &[-2.0, 3.0], Some(0.5)), &[2.0, 1.0]);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = run(&Softmax, &[1.0, 2.0, 3.0], None);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(p[0] < p[1] && p[1] < p[2]);
    }

    #[test]
    fn test_softmax_derivative_is_diagonal_approximation() {
        let p = run(&Softmax, &[1.0, 2.0, 3.0], None);
        let d = run(&SoftmaxDerivative, &[1.0, 2.0, 3.0], None);
        let expected: Vec<f64> = p.iter().map(|p| p * (1.0 - p)).collect();
        assert_close(&d, &expected);
    }
}
