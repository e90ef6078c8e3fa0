// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Broadcasting binary arithmetic.
//!
//! A binary operator accepts operands when:
//! 1. both have the same element count (elementwise),
//! 2. exactly one has a single element (it is broadcast), or
//! 3. both have a single element (plain scalar arithmetic).
//!
//! [`BinaryOp::MatMul`] additionally accepts two rank-2 tensors whose inner
//! sizes agree; that case is checked first and runs a true matrix product.
//! Shapes are validated before any element is touched, so a failing call
//! leaves the left operand unchanged.

use super::matmul_op::matmul;
use crate::{Element, Tensor, TensorError};
use std::fmt;

/// Binary operators understood by the broadcasting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Matrix product (`x` in formulas).
    MatMul,
}

impl BinaryOp {
    /// The formula character for this operator.
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::MatMul => 'x',
        }
    }

    /// Parses a formula operator character.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            'x' => Some(BinaryOp::MatMul),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::MatMul => "matrix multiply",
        }
    }

    /// Scalar kernel. `MatMul` degenerates to multiplication when broadcasting.
    fn eval<E: Element>(self, a: E, b: E) -> E {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul | BinaryOp::MatMul => a * b,
            BinaryOp::Div => a / b,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How two operands line up under the broadcasting rules.
enum Plan {
    Elementwise,
    BroadcastRight,
    BroadcastLeft,
    MatrixProduct,
}

fn plan<E: Element>(op: BinaryOp, lhs: &Tensor<E>, rhs: &Tensor<E>) -> Result<Plan, TensorError> {
    if op == BinaryOp::MatMul && lhs.shape().is_matmul_compatible(rhs.shape()) {
        return Ok(Plan::MatrixProduct);
    }
    let (l, r) = (lhs.num_elements(), rhs.num_elements());
    if op != BinaryOp::MatMul && l == r {
        Ok(Plan::Elementwise)
    } else if r == 1 {
        Ok(Plan::BroadcastRight)
    } else if l == 1 {
        Ok(Plan::BroadcastLeft)
    } else {
        Err(TensorError::ShapeMismatch {
            op: op.name(),
            lhs: lhs.shape().clone(),
            rhs: rhs.shape().clone(),
        })
    }
}

#[allow(clippy::should_implement_trait)]
impl<E: Element> Tensor<E> {
    /// Applies `op` with `rhs`, writing the result into `self`.
    ///
    /// When `self` is the broadcast single-element side, or for a matrix
    /// product, `self` takes the result's shape.
    pub fn apply(&mut self, op: BinaryOp, rhs: &Tensor<E>) -> Result<&mut Self, TensorError> {
        match plan(op, self, rhs)? {
            Plan::Elementwise => {
                for (a, &b) in self.content_mut().iter_mut().zip(rhs.content()) {
                    *a = op.eval(*a, b);
                }
            }
            Plan::BroadcastRight => {
                let b = rhs.content()[0];
                self.map_in_place(|a| op.eval(a, b));
            }
            Plan::BroadcastLeft => {
                let a = self.content()[0];
                let content = rhs.content().iter().map(|&b| op.eval(a, b)).collect();
                self.replace(rhs.shape().clone(), content);
            }
            Plan::MatrixProduct => {
                let product = matmul(self, rhs)?;
                *self = product;
            }
        }
        Ok(self)
    }

    /// Like [`Tensor::apply`] but leaves `self` untouched and returns a new tensor.
    pub fn combine(&self, op: BinaryOp, rhs: &Tensor<E>) -> Result<Tensor<E>, TensorError> {
        let mut out = self.duplicate();
        out.apply(op, rhs)?;
        Ok(out)
    }

    /// Applies `op` with a scalar right-hand side to every element.
    pub fn apply_scalar(&mut self, op: BinaryOp, value: E) -> &mut Self {
        self.map_in_place(|a| op.eval(a, value))
    }

    /// `self += rhs` under the broadcasting rules.
    pub fn add(&mut self, rhs: &Tensor<E>) -> Result<&mut Self, TensorError> {
        self.apply(BinaryOp::Add, rhs)
    }

    /// `self -= rhs` under the broadcasting rules.
    pub fn sub(&mut self, rhs: &Tensor<E>) -> Result<&mut Self, TensorError> {
        self.apply(BinaryOp::Sub, rhs)
    }

    /// `self *= rhs` under the broadcasting rules.
    pub fn mul(&mut self, rhs: &Tensor<E>) -> Result<&mut Self, TensorError> {
        self.apply(BinaryOp::Mul, rhs)
    }

    /// `self /= rhs` under the broadcasting rules.
    pub fn div(&mut self, rhs: &Tensor<E>) -> Result<&mut Self, TensorError> {
        self.apply(BinaryOp::Div, rhs)
    }

    /// Replaces `self` with the matrix product `self x rhs`.
    pub fn matrix_mul(&mut self, rhs: &Tensor<E>) -> Result<&mut Self, TensorError> {
        self.apply(BinaryOp::MatMul, rhs)
    }

    /// Non-mutating [`Tensor::add`].
    pub fn add_n(&self, rhs: &Tensor<E>) -> Result<Tensor<E>, TensorError> {
        self.combine(BinaryOp::Add, rhs)
    }

    /// Non-mutating [`Tensor::sub`].
    pub fn sub_n(&self, rhs: &Tensor<E>) -> Result<Tensor<E>, TensorError> {
        self.combine(BinaryOp::Sub, rhs)
    }

    /// Non-mutating [`Tensor::mul`].
    pub fn mul_n(&self, rhs: &Tensor<E>) -> Result<Tensor<E>, TensorError> {
        self.combine(BinaryOp::Mul, rhs)
    }

    /// Non-mutating [`Tensor::div`].
    pub fn div_n(&self, rhs: &Tensor<E>) -> Result<Tensor<E>, TensorError> {
        self.combine(BinaryOp::Div, rhs)
    }

    /// Non-mutating [`Tensor::matrix_mul`].
    pub fn matrix_mul_n(&self, rhs: &Tensor<E>) -> Result<Tensor<E>, TensorError> {
        self.combine(BinaryOp::MatMul, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    fn t1() -> Tensor<f64> {
        Tensor::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_add_zero_is_identity() {
        let mut t = t1();
        let z = Tensor::zeros(t.shape().clone()).unwrap();
        t.add(&z).unwrap();
        assert_eq!(t, t1());
    }

    #[test]
    fn test_elementwise_sub_self_is_zero() {
        let t = t1();
        let d = t.sub_n(&t).unwrap();
        assert!(d.content().iter().all(|&x| x == 0.0));
        assert!(d.same_shape(&t));
    }

    #[test]
    fn test_broadcast_right() {
        let mut t = t1();
        t.div(&Tensor::scalar(10.0)).unwrap();
        let expected = Tensor::from_rows(&[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]).unwrap();
        assert_eq!(t, expected);
        assert!(t.same_shape(&expected));
    }

    #[test]
    fn test_broadcast_left_takes_rhs_shape() {
        let mut s = Tensor::scalar(1.0);
        s.sub(&t1()).unwrap();
        assert_eq!(s.shape(), &Shape::matrix(2, 3));
        assert_eq!(s.content(), &[0.0, -1.0, -2.0, -3.0, -4.0, -5.0]);
    }

    #[test]
    fn test_scalar_scalar() {
        let a = Tensor::scalar(6.0f32);
        let b = Tensor::scalar(4.0f32);
        assert_eq!(a.div_n(&b).unwrap().content(), &[1.5]);
    }

    #[test]
    fn test_elementwise_across_shapes_with_equal_counts() {
        let a = Tensor::from_vec(Shape::vector(6), vec![1.0; 6]).unwrap();
        let out = t1().add_n(&a).unwrap();
        assert_eq!(out.shape(), &Shape::matrix(2, 3));
        assert_eq!(out.content(), &[2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_shape_mismatch_leaves_lhs_untouched() {
        let mut t = t1();
        let other = Tensor::zeros(Shape::vector(4)).unwrap();
        let err = t.add(&other).unwrap_err();
        assert!(matches!(err, TensorError::ShapeMismatch { op: "add", .. }));
        assert_eq!(
            err.to_string(),
            "incompatible shapes for add: [2, 3] vs [4]"
        );
        assert_eq!(t, t1());
    }

    #[test]
    fn test_matmul_operator_rejects_equal_count_non_matrices() {
        let a = Tensor::<f32>::zeros(Shape::vector(4)).unwrap();
        let b = Tensor::<f32>::zeros(Shape::vector(4)).unwrap();
        assert!(a.matrix_mul_n(&b).is_err());
    }

    #[test]
    fn test_matmul_operator_broadcasts_scalars() {
        let out = t1().matrix_mul_n(&Tensor::scalar(2.0)).unwrap();
        assert_eq!(out.content(), &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
    }

    #[test]
    fn test_apply_scalar() {
        let mut t = t1();
        t.apply_scalar(BinaryOp::Sub, 1.0);
        assert_eq!(t.content(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_symbols_roundtrip() {
        for op in [
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::MatMul,
        ] {
            assert_eq!(BinaryOp::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(BinaryOp::from_symbol('^'), None);
    }
}
