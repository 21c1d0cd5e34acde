// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! model_path = "./models/rr_classifier.safetensors"
//! pool_size = "32K"
//! pool_alignment = 16
//! feature_length = 40
//! decision_threshold = 0.5
//! ```
//!
//! Every key is optional; missing keys take their default.

use crate::{RuntimeError, DEFAULT_DECISION_THRESHOLD, FEATURE_LENGTH};
use memory_manager::{PoolBudget, POOL_ALIGNMENT};
use std::path::{Path, PathBuf};

/// Alignments a pool may be configured with.
pub const SUPPORTED_ALIGNMENTS: [usize; 3] = [4, 8, 16];

/// Configuration for the inference runtime.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Model artifact to load; the embedded reference model when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    /// Pool capacity (human-readable, e.g. `"32K"`).
    pub pool_size: String,
    /// Alignment of every carved region in bytes.
    pub pool_alignment: usize,
    /// Samples per feature vector.
    pub feature_length: usize,
    /// Scores strictly above this are positive.
    pub decision_threshold: f32,
}

impl RuntimeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        toml::from_str(toml_str)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Parses the pool size string into a [`PoolBudget`].
    pub fn parse_pool_size(&self) -> Result<PoolBudget, RuntimeError> {
        PoolBudget::parse(&self.pool_size)
            .map_err(|e| RuntimeError::ConfigError(format!("invalid pool size: {e}")))
    }

    /// Checks every field for a usable value.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        let budget = self.parse_pool_size()?;
        if budget.as_bytes() == 0 {
            return Err(RuntimeError::ConfigError("pool size must be non-zero".into()));
        }
        if !SUPPORTED_ALIGNMENTS.contains(&self.pool_alignment) {
            return Err(RuntimeError::ConfigError(format!(
                "pool alignment {} is not one of {SUPPORTED_ALIGNMENTS:?}",
                self.pool_alignment
            )));
        }
        if self.feature_length == 0 {
            return Err(RuntimeError::ConfigError("feature length must be positive".into()));
        }
        if !self.decision_threshold.is_finite() {
            return Err(RuntimeError::ConfigError(format!(
                "decision threshold {} is not finite",
                self.decision_threshold
            )));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            pool_size: "32K".to_string(),
            pool_alignment: POOL_ALIGNMENT,
            feature_length: FEATURE_LENGTH,
            decision_threshold: DEFAULT_DECISION_THRESHOLD,
        }
    }
}
