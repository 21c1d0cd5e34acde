// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON graph manifest.
//!
//! The manifest is stored as the `graph` metadata entry of the model
//! container. It declares every tensor, the operators in execution order,
//! and which tensors are the graph's inputs and outputs.
//!
//! # Format
//! ```json
//! {
//!   "name": "rr-classifier",
//!   "tensors": [
//!     { "name": "input", "dtype": "f32", "shape": [1, 40] },
//!     { "name": "fc1.weight", "dtype": "f32", "shape": [8, 40], "constant": true },
//!     ...
//!   ],
//!   "operators": [
//!     { "op": "fully_connected", "inputs": [0, 1, 2], "outputs": [3] },
//!     ...
//!   ],
//!   "inputs": [0],
//!   "outputs": [8]
//! }
//! ```

use crate::{Graph, ModelError, OpKind, OperatorDef};
use std::collections::HashSet;
use tensor_core::{DType, Shape, TensorDescriptor};

/// Top-level graph manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GraphManifest {
    /// Human-readable model name.
    pub name: String,
    /// Every tensor the graph declares, addressed by position.
    pub tensors: Vec<ManifestTensor>,
    /// Operators in execution order.
    pub operators: Vec<ManifestOperator>,
    /// Graph input tensor indices.
    pub inputs: Vec<usize>,
    /// Graph output tensor indices.
    pub outputs: Vec<usize>,
}

/// A tensor entry in the manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManifestTensor {
    pub name: String,
    pub dtype: String,
    pub shape: Vec<usize>,
    /// Constant tensors carry their data in the container.
    #[serde(default)]
    pub constant: bool,
}

/// An operator entry in the manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManifestOperator {
    pub op: String,
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
}

impl GraphManifest {
    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialises the manifest to compact JSON.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validates the manifest and resolves it into a [`Graph`].
    ///
    /// Checks:
    /// - At least one tensor; names are non-empty and unique; dtypes known;
    ///   every declared byte size fits in `usize`.
    /// - Operator kinds are known; every tensor index is in range; every
    ///   operator writes at least one tensor and never a constant.
    /// - No tensor is written by more than one operator.
    /// - Exactly one graph input, which is not constant; at least one output.
    pub fn into_graph(self) -> Result<Graph, ModelError> {
        if self.tensors.is_empty() {
            return Err(ModelError::InvalidGraph("graph declares no tensors".into()));
        }

        let mut seen = HashSet::new();
        let mut tensors = Vec::with_capacity(self.tensors.len());
        for t in &self.tensors {
            if t.name.is_empty() {
                return Err(ModelError::InvalidTensor {
                    tensor: format!("#{}", tensors.len()),
                    detail: "empty name".into(),
                });
            }
            if !seen.insert(t.name.as_str()) {
                return Err(ModelError::InvalidTensor {
                    tensor: t.name.clone(),
                    detail: "duplicate tensor name".into(),
                });
            }
            let dtype = DType::from_str_loose(&t.dtype).ok_or_else(|| ModelError::InvalidTensor {
                tensor: t.name.clone(),
                detail: format!("unsupported dtype '{}'", t.dtype),
            })?;
            let desc = TensorDescriptor {
                name: t.name.clone(),
                dtype,
                shape: Shape::new(t.shape.clone()),
                constant: t.constant,
            };
            if desc.checked_size_bytes().is_none() {
                return Err(ModelError::InvalidTensor {
                    tensor: t.name.clone(),
                    detail: format!("declared size of {} {} overflows", desc.shape, desc.dtype),
                });
            }
            tensors.push(desc);
        }

        let n = tensors.len();
        let in_range = |i: &usize| *i < n;

        let mut written = vec![false; n];
        let mut operators = Vec::with_capacity(self.operators.len());
        for (index, op) in self.operators.iter().enumerate() {
            let kind = OpKind::from_str_loose(&op.op).ok_or_else(|| ModelError::InvalidOperator {
                index,
                detail: format!("unknown operator '{}'", op.op),
            })?;
            if let Some(bad) = op.inputs.iter().chain(&op.outputs).find(|i| !in_range(i)) {
                return Err(ModelError::InvalidOperator {
                    index,
                    detail: format!("tensor index {bad} out of range (graph has {n} tensors)"),
                });
            }
            if op.outputs.is_empty() {
                return Err(ModelError::InvalidOperator {
                    index,
                    detail: "operator writes no tensor".into(),
                });
            }
            for &out in &op.outputs {
                if tensors[out].constant {
                    return Err(ModelError::InvalidOperator {
                        index,
                        detail: format!("writes constant tensor '{}'", tensors[out].name),
                    });
                }
                if std::mem::replace(&mut written[out], true) {
                    return Err(ModelError::InvalidGraph(format!(
                        "tensor '{}' is written by more than one operator",
                        tensors[out].name
                    )));
                }
            }
            operators.push(OperatorDef {
                index,
                kind,
                inputs: op.inputs.clone(),
                outputs: op.outputs.clone(),
            });
        }

        if self.inputs.len() != 1 {
            return Err(ModelError::InvalidGraph(format!(
                "expected exactly one graph input, found {}",
                self.inputs.len()
            )));
        }
        if self.outputs.is_empty() {
            return Err(ModelError::InvalidGraph("graph declares no outputs".into()));
        }
        if let Some(bad) = self.inputs.iter().chain(&self.outputs).find(|i| !in_range(i)) {
            return Err(ModelError::InvalidGraph(format!(
                "graph input/output index {bad} out of range (graph has {n} tensors)"
            )));
        }
        let input = self.inputs[0];
        if tensors[input].constant || written[input] {
            return Err(ModelError::InvalidGraph(format!(
                "graph input '{}' must be a non-constant tensor no operator writes",
                tensors[input].name
            )));
        }

        Ok(Graph {
            name: self.name,
            tensors,
            operators,
            inputs: self.inputs,
            outputs: self.outputs,
        })
    }
}
