// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Engine configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! cache_formulas = true
//! cache_capacity = 256
//! leaky_slope = 0.1
//! ```

use crate::FormulaError;
use std::path::Path;

/// Configuration for a [`crate::FormulaEngine`].
///
/// Every field is optional in TOML; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether parsed formulas are memoised by their text.
    pub cache_formulas: bool,
    /// Maximum number of cached formulas. Once reached, new formulas are
    /// still evaluated but not inserted.
    pub cache_capacity: usize,
    /// Slope used by `leakyReLu` / `DleakyReLu` when no second argument is given.
    pub leaky_slope: f64,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, FormulaError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FormulaError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, FormulaError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| FormulaError::Config(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, FormulaError> {
        toml::to_string_pretty(self)
            .map_err(|e| FormulaError::Config(format!("TOML serialise error: {e}")))
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), FormulaError> {
        if !self.leaky_slope.is_finite() || self.leaky_slope == 0.0 {
            return Err(FormulaError::Config(format!(
                "leaky_slope must be finite and non-zero, got {}",
                self.leaky_slope
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_formulas: true,
            cache_capacity: 256,
            leaky_slope: 0.1,
        }
    }
}
