// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `tensor-calc eval`: evaluate a formula against JSON tensors.
//!
//! A tensor argument is either inline JSON or `@path` to a JSON file. The
//! JSON is a `{"sizes": [...], "content": [...]}` object, or a bare array
//! of numbers taken as a vector.

use anyhow::Context;
use formula::{EngineConfig, FormulaEngine};
use serde::de::DeserializeOwned;
use tensor_core::{Element, Shape, Tensor};

pub struct Request {
    pub formula: String,
    pub receiver: String,
    pub operands: Vec<String>,
    pub pretty: bool,
}

pub fn execute<E>(config: EngineConfig, request: &Request) -> anyhow::Result<()>
where
    E: Element + DeserializeOwned,
{
    let engine = FormulaEngine::<E>::new(config)?;

    let receiver = load_tensor::<E>(&request.receiver).context("receiver (%0)")?;
    let operands = request
        .operands
        .iter()
        .enumerate()
        .map(|(i, arg)| load_tensor::<E>(arg).with_context(|| format!("operand %{}", i + 1)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let bound: Vec<&Tensor<E>> = operands.iter().collect();

    tracing::info!(
        "evaluating '{}' in {} with receiver {}",
        request.formula,
        E::DTYPE.as_str(),
        receiver.shape()
    );
    let result = engine
        .calculate(&receiver, &request.formula, &bound)
        .with_context(|| format!("failed to evaluate '{}'", request.formula))?;

    let json = if request.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}

fn load_tensor<E>(arg: &str) -> anyhow::Result<Tensor<E>>
where
    E: Element + DeserializeOwned,
{
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read tensor file '{path}'"))?,
        None => arg.to_owned(),
    };
    parse_tensor(&text)
}

fn parse_tensor<E>(text: &str) -> anyhow::Result<Tensor<E>>
where
    E: Element + DeserializeOwned,
{
    if text.trim_start().starts_with('[') {
        let values: Vec<E> = serde_json::from_str(text).context("invalid JSON array")?;
        return Ok(Tensor::from_vec(Shape::vector(values.len()), values)?);
    }
    serde_json::from_str(text).context("invalid tensor JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tensor_object() {
        let t: Tensor<f32> = parse_tensor(r#"{"sizes":[2,2],"content":[1,2,3,4]}"#).unwrap();
        assert_eq!(t.shape(), &Shape::matrix(2, 2));
    }

    #[test]
    fn test_parse_bare_array_as_vector() {
        let t: Tensor<f64> = parse_tensor("[1.5, 2.5, 3.5]").unwrap();
        assert_eq!(t.shape(), &Shape::vector(3));
        assert_eq!(t.content(), &[1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_size_content_mismatch_rejected() {
        let err = parse_tensor::<f32>(r#"{"sizes":[2,2],"content":[1,2,3]}"#).unwrap_err();
        assert!(format!("{err:#}").contains("invalid tensor JSON"));
    }
}
