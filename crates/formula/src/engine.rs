// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The formula engine: compile (with memoisation), then evaluate.
//!
//! ```text
//!  "linear(%0 x %1)"
//!        │  compile: cache lookup, else lex + parse
//!        ▼
//!    Arc<Node>
//!        │  evaluate against [%0, %1, ...]
//!        ▼
//!    Tensor<E>
//! ```
//!
//! Compiled trees are keyed by the exact formula text. Caching never
//! changes results; it only skips re-parsing.

use crate::eval::Evaluator;
use crate::registry::FunctionRegistry;
use crate::{parse, EngineConfig, FormulaError, Node};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tensor_core::{Element, Tensor};

/// Parses, caches and evaluates formulas for one element type.
///
/// The engine is `Sync`; one instance can serve many threads. Evaluation
/// state (accumulators, intermediate tensors) is per call.
pub struct FormulaEngine<E: Element> {
    config: EngineConfig,
    registry: FunctionRegistry<E>,
    cache: Mutex<HashMap<String, Arc<Node>>>,
}

impl<E: Element> FormulaEngine<E> {
    /// Creates an engine after validating `config`.
    pub fn new(config: EngineConfig) -> Result<Self, FormulaError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        tracing::debug!(
            "formula engine ({}) created, cache {} (capacity {})",
            E::DTYPE.as_str(),
            if config.cache_formulas { "on" } else { "off" },
            config.cache_capacity
        );
        Self {
            registry: FunctionRegistry::standard(E::from_literal(config.leaky_slope)),
            cache: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the parsed tree for `formula`, from the cache when possible.
    ///
    /// Formulas that fail to parse are never cached.
    pub fn compile(&self, formula: &str) -> Result<Arc<Node>, FormulaError> {
        if !self.config.cache_formulas {
            return parse(formula).map(Arc::new);
        }

        if let Ok(cache) = self.cache.lock() {
            if let Some(node) = cache.get(formula) {
                tracing::debug!("formula cache hit: '{formula}'");
                return Ok(Arc::clone(node));
            }
        }

        let node = Arc::new(parse(formula)?);

        if let Ok(mut cache) = self.cache.lock() {
            if cache.len() < self.config.cache_capacity {
                tracing::debug!("formula cache miss, caching: '{formula}'");
                cache.insert(formula.to_owned(), Arc::clone(&node));
            } else {
                tracing::debug!(
                    "formula cache full ({} entries), evaluating uncached: '{formula}'",
                    cache.len()
                );
            }
        }
        Ok(node)
    }

    /// Evaluates `formula` with `operands[N]` bound to `%N`.
    pub fn evaluate(&self, formula: &str, operands: &[&Tensor<E>]) -> Result<Tensor<E>, FormulaError> {
        let node = self.compile(formula)?;
        tracing::trace!(
            "evaluating '{formula}' ({} nodes, {} operands)",
            node.node_count(),
            operands.len()
        );
        Evaluator::new(operands, &self.registry).evaluate(&node)
    }

    /// Evaluates `formula` with `%0` bound to `receiver` and `%1..` to `operands`.
    pub fn calculate(
        &self,
        receiver: &Tensor<E>,
        formula: &str,
        operands: &[&Tensor<E>],
    ) -> Result<Tensor<E>, FormulaError> {
        let mut bound = Vec::with_capacity(operands.len() + 1);
        bound.push(receiver);
        bound.extend_from_slice(operands);
        self.evaluate(formula, &bound)
    }

    /// Number of formulas currently memoised.
    pub fn cached_formulas(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

impl<E: Element> Default for FormulaEngine<E> {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

/// Element types with a process-wide default engine.
pub trait EngineElement: Element {
    /// Lazily initialised engine using [`EngineConfig::default`].
    fn default_engine() -> &'static FormulaEngine<Self>;
}

impl EngineElement for f32 {
    fn default_engine() -> &'static FormulaEngine<Self> {
        static ENGINE: OnceLock<FormulaEngine<f32>> = OnceLock::new();
        ENGINE.get_or_init(FormulaEngine::default)
    }
}

impl EngineElement for f64 {
    fn default_engine() -> &'static FormulaEngine<Self> {
        static ENGINE: OnceLock<FormulaEngine<f64>> = OnceLock::new();
        ENGINE.get_or_init(FormulaEngine::default)
    }
}

/// Formula evaluation on tensors through the default engine.
///
/// # Example
/// ```
/// use formula::Calculate;
/// use tensor_core::{Shape, Tensor};
///
/// let t = Tensor::from_vec(Shape::vector(3), vec![1.0f32, 2.0, 3.0]).unwrap();
/// let doubled = t.calculate("%0 * 2", &[]).unwrap();
/// assert_eq!(doubled.content(), &[2.0, 4.0, 6.0]);
/// ```
pub trait Calculate<E: Element> {
    /// Evaluates `formula` with `%0` bound to `self`. The receiver and
    /// operands are left untouched.
    fn calculate(&self, formula: &str, operands: &[&Tensor<E>]) -> Result<Tensor<E>, FormulaError>;

    /// Like [`Calculate::calculate`], but binds `%0` to a duplicate of the
    /// receiver.
    fn calculate_on_copy(
        &self,
        formula: &str,
        operands: &[&Tensor<E>],
    ) -> Result<Tensor<E>, FormulaError>;

    /// Evaluates `formula` and stores the result in `self`; the shape may
    /// change. On error `self` is left as it was.
    fn calculate_assign(&mut self, formula: &str, operands: &[&Tensor<E>])
        -> Result<&mut Self, FormulaError>;
}

impl<E: EngineElement> Calculate<E> for Tensor<E> {
    fn calculate(&self, formula: &str, operands: &[&Tensor<E>]) -> Result<Tensor<E>, FormulaError> {
        E::default_engine().calculate(self, formula, operands)
    }

    fn calculate_on_copy(
        &self,
        formula: &str,
        operands: &[&Tensor<E>],
    ) -> Result<Tensor<E>, FormulaError> {
        let copy = self.duplicate();
        E::default_engine().calculate(&copy, formula, operands)
    }

    fn calculate_assign(
        &mut self,
        formula: &str,
        operands: &[&Tensor<E>],
    ) -> Result<&mut Self, FormulaError> {
        *self = E::default_engine().calculate(self, formula, operands)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::Shape;

    fn vector(values: &[f64]) -> Tensor<f64> {
        Tensor::from_vec(Shape::vector(values.len()), values.to_vec()).unwrap()
    }

    #[test]
    fn test_compile_caches_by_text() {
        let engine = FormulaEngine::<f64>::default();
        let a = engine.compile("%0 + 1").unwrap();
        let b = engine.compile("%0 + 1").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(engine.cached_formulas(), 1);

        engine.compile("%0 + 2").unwrap();
        assert_eq!(engine.cached_formulas(), 2);

        engine.clear_cache();
        assert_eq!(engine.cached_formulas(), 0);
    }

    #[test]
    fn test_parse_errors_not_cached() {
        let engine = FormulaEngine::<f64>::default();
        assert!(engine.compile("sqrt(1").is_err());
        assert_eq!(engine.cached_formulas(), 0);
    }

    #[test]
    fn test_cache_disabled() {
        let engine = FormulaEngine::<f64>::new(EngineConfig {
            cache_formulas: false,
            ..Default::default()
        })
        .unwrap();
        let a = engine.compile("%0").unwrap();
        let b = engine.compile("%0").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(engine.cached_formulas(), 0);
    }

    #[test]
    fn test_full_cache_still_evaluates() {
        let engine = FormulaEngine::<f64>::new(EngineConfig {
            cache_capacity: 1,
            ..Default::default()
        })
        .unwrap();
        let t = vector(&[1.0, 2.0]);
        engine.calculate(&t, "%0 + 1", &[]).unwrap();
        let r = engine.calculate(&t, "%0 * 10", &[]).unwrap();
        assert_eq!(r.content(), &[10.0, 20.0]);
        assert_eq!(engine.cached_formulas(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = FormulaEngine::<f32>::new(EngineConfig {
            leaky_slope: f64::NAN,
            ..Default::default()
        });
        assert!(matches!(result, Err(FormulaError::Config(_))));
    }

    #[test]
    fn test_configured_leaky_slope() {
        let engine = FormulaEngine::<f64>::new(EngineConfig {
            leaky_slope: 0.5,
            ..Default::default()
        })
        .unwrap();
        let t = vector(&[-2.0, 2.0]);
        let r = engine.calculate(&t, "leakyReLu(%0)", &[]).unwrap();
        assert_eq!(r.content(), &[-1.0, 2.0]);
    }

    #[test]
    fn test_calculate_binds_receiver_first() {
        let engine = FormulaEngine::<f64>::default();
        let a = vector(&[10.0]);
        let b = vector(&[3.0]);
        let r = engine.calculate(&a, "%0 - %1", &[&b]).unwrap();
        assert_eq!(r.content(), &[7.0]);
    }

    #[test]
    fn test_calculate_assign_replaces_receiver() {
        let mut t = Tensor::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        t.calculate_assign("sumAbs(%0)", &[]).unwrap();
        assert_eq!(t.shape(), &Shape::scalar());
        assert_eq!(t.content(), &[10.0]);
    }

    #[test]
    fn test_calculate_assign_keeps_receiver_on_error() {
        let mut t = vector(&[1.0, 2.0]);
        assert!(t.calculate_assign("%0 + %1", &[]).is_err());
        assert_eq!(t.content(), &[1.0, 2.0]);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = Arc::new(FormulaEngine::<f32>::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    let t = Tensor::from_vec(Shape::vector(3), vec![1.0f32, 2.0, 3.0]).unwrap();
                    let r = engine.calculate(&t, "sumSqr(%0)", &[]).unwrap();
                    (i, r.content()[0])
                })
            })
            .collect();
        for handle in handles {
            let (_, sum) = handle.join().unwrap();
            assert_eq!(sum, 14.0);
        }
    }
}
