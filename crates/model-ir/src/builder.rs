// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Programmatic construction of model artifacts.
//!
//! [`ModelBuilder`] assembles a graph manifest plus constant tensor data
//! and serialises both into the SafeTensors container that
//! [`ModelHandle`](crate::ModelHandle) reads.

use crate::loader::{to_safetensors_dtype, GRAPH_KEY, SCHEMA_VERSION_KEY};
use crate::manifest::{ManifestOperator, ManifestTensor};
use crate::{GraphManifest, ModelError, OpKind, SUPPORTED_SCHEMA_VERSION};
use safetensors::tensor::TensorView;
use std::collections::HashMap;
use tensor_core::{DType, Shape};

/// Builds a model artifact tensor by tensor.
///
/// Tensor-adding methods return the new tensor's index, which operators
/// and graph inputs/outputs refer to.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    schema_version: u32,
    tensors: Vec<ManifestTensor>,
    data: Vec<Option<Vec<u8>>>,
    operators: Vec<ManifestOperator>,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_version: SUPPORTED_SCHEMA_VERSION,
            tensors: Vec::new(),
            data: Vec::new(),
            operators: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Overrides the schema version written to the artifact.
    pub fn schema_version(mut self, version: u32) -> Self {
        self.schema_version = version;
        self
    }

    /// Adds an `f32` arena tensor and marks it as the graph input.
    pub fn input(&mut self, name: impl Into<String>, shape: Shape) -> usize {
        let index = self.activation(name, shape);
        self.inputs.push(index);
        index
    }

    /// Adds an arena tensor of any element type and marks it as the graph
    /// input.
    pub fn input_typed(&mut self, name: impl Into<String>, dtype: DType, shape: Shape) -> usize {
        let index = self.activation_typed(name, dtype, shape);
        self.inputs.push(index);
        index
    }

    /// Adds an `f32` arena tensor.
    pub fn activation(&mut self, name: impl Into<String>, shape: Shape) -> usize {
        self.activation_typed(name, DType::F32, shape)
    }

    /// Adds an arena tensor of any element type.
    pub fn activation_typed(&mut self, name: impl Into<String>, dtype: DType, shape: Shape) -> usize {
        self.push(name.into(), dtype, shape, None)
    }

    /// Adds an `f32` constant tensor stored little-endian in the artifact.
    pub fn constant_f32(&mut self, name: impl Into<String>, shape: Shape, values: &[f32]) -> usize {
        let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(name.into(), DType::F32, shape, Some(bytes))
    }

    /// Appends an operator. Operators run in the order they are added.
    pub fn operator(&mut self, kind: OpKind, inputs: &[usize], outputs: &[usize]) -> &mut Self {
        self.operators.push(ManifestOperator {
            op: kind.as_str().to_string(),
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        });
        self
    }

    /// Marks a tensor as a graph output.
    pub fn output(&mut self, index: usize) -> &mut Self {
        self.outputs.push(index);
        self
    }

    fn push(&mut self, name: String, dtype: DType, shape: Shape, data: Option<Vec<u8>>) -> usize {
        self.tensors.push(ManifestTensor {
            name,
            dtype: dtype.as_str().to_string(),
            shape: shape.dims().to_vec(),
            constant: data.is_some(),
        });
        self.data.push(data);
        self.tensors.len() - 1
    }

    /// Returns the manifest as it will be embedded.
    pub fn manifest(&self) -> GraphManifest {
        GraphManifest {
            name: self.name.clone(),
            tensors: self.tensors.clone(),
            operators: self.operators.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
        }
    }

    /// Validates the graph and serialises the artifact.
    ///
    /// Fails if the manifest does not resolve into a valid graph or a
    /// constant's data length disagrees with its declared shape.
    pub fn build(&self) -> Result<Vec<u8>, ModelError> {
        let manifest = self.manifest();
        let json = manifest.to_json()?;
        let graph = manifest.into_graph()?;

        let mut views = Vec::new();
        for ((tensor, data), desc) in self.tensors.iter().zip(&self.data).zip(&graph.tensors) {
            let Some(bytes) = data else { continue };
            if bytes.len() != desc.size_bytes() {
                return Err(ModelError::InvalidTensor {
                    tensor: tensor.name.clone(),
                    detail: format!(
                        "{} data bytes for shape {} ({} expected)",
                        bytes.len(),
                        desc.shape,
                        desc.size_bytes()
                    ),
                });
            }
            let view = TensorView::new(
                to_safetensors_dtype(desc.dtype),
                tensor.shape.clone(),
                bytes.as_slice(),
            )
            .map_err(|e| ModelError::Serialise(format!("{e:?}")))?;
            views.push((tensor.name.clone(), view));
        }

        let metadata = HashMap::from([
            (SCHEMA_VERSION_KEY.to_string(), self.schema_version.to_string()),
            (GRAPH_KEY.to_string(), json),
        ]);
        safetensors::serialize(views, &Some(metadata))
            .map_err(|e| ModelError::Serialise(format!("{e:?}")))
    }
}
