// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Model handle: a validated, borrowed view over model artifact bytes.
//!
//! # Type-State Pattern
//!
//! ```text
//! ModelHandle<Parsed>    — container and graph are structurally valid.
//!       │  .verify_schema(SUPPORTED_SCHEMA_VERSION)
//!       ▼
//! ModelHandle<Verified>  — schema version matches, ready to bind.
//! ```
//!
//! Only a `Verified` handle can be bound to an execution context, so a
//! schema mismatch can never reach allocation. The markers are zero-sized.

use crate::loader::{parse_container, ParsedContainer};
use crate::{Graph, ModelError, OperatorDef, SUPPORTED_SCHEMA_VERSION};
use std::fmt;
use tensor_core::TensorDescriptor;

/// Marker: bytes parsed, schema version not yet checked.
#[derive(Debug, Clone, Copy)]
pub struct Parsed;

/// Marker: schema version matches the runtime.
#[derive(Debug, Clone, Copy)]
pub struct Verified;

/// Sealed trait for handle states.
pub trait HandleState: fmt::Debug + Copy + private::Sealed {}
impl HandleState for Parsed {}
impl HandleState for Verified {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Parsed {}
    impl Sealed for super::Verified {}
}

/// An immutable view over a model artifact.
///
/// The handle borrows the artifact bytes for `'a`; constant tensor data is
/// served straight from them.
#[derive(Debug, Clone)]
pub struct ModelHandle<'a, S: HandleState = Parsed> {
    bytes: &'a [u8],
    schema_version: u32,
    graph: Graph,
    constants: Vec<Option<&'a [u8]>>,
    _state: std::marker::PhantomData<S>,
}

impl<'a> ModelHandle<'a, Parsed> {
    /// Parses the container structure and the graph manifest.
    ///
    /// Any failure here means the bytes are not a usable model.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ModelError> {
        let ParsedContainer {
            schema_version,
            graph,
            constants,
        } = parse_container(bytes)?;
        Ok(Self {
            bytes,
            schema_version,
            graph,
            constants,
            _state: std::marker::PhantomData,
        })
    }

    /// Checks the embedded schema version against `supported` and
    /// transitions to the `Verified` state.
    pub fn verify_schema(self, supported: u32) -> Result<ModelHandle<'a, Verified>, ModelError> {
        if self.schema_version != supported {
            return Err(ModelError::SchemaMismatch {
                found: self.schema_version,
                supported,
            });
        }
        Ok(ModelHandle {
            bytes: self.bytes,
            schema_version: self.schema_version,
            graph: self.graph,
            constants: self.constants,
            _state: std::marker::PhantomData,
        })
    }

    /// Parses `bytes` and verifies them against [`SUPPORTED_SCHEMA_VERSION`].
    ///
    /// # Example
    /// ```
    /// use model_ir::{ModelBuilder, ModelHandle};
    /// use tensor_core::Shape;
    ///
    /// let mut b = ModelBuilder::new("identity");
    /// let x = b.input("x", Shape::vector(4));
    /// let y = b.activation("y", Shape::vector(4));
    /// b.operator(model_ir::OpKind::Relu, &[x], &[y]);
    /// b.output(y);
    /// let bytes = b.build().unwrap();
    ///
    /// let handle = ModelHandle::load(&bytes).unwrap();
    /// assert_eq!(handle.num_tensors(), 2);
    /// ```
    pub fn load(bytes: &'a [u8]) -> Result<ModelHandle<'a, Verified>, ModelError> {
        Self::parse(bytes)?.verify_schema(SUPPORTED_SCHEMA_VERSION)
    }
}

impl<'a, S: HandleState> ModelHandle<'a, S> {
    /// Schema version embedded in the artifact.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Model name from the manifest.
    pub fn name(&self) -> &str {
        &self.graph.name
    }

    /// Size of the underlying artifact in bytes.
    pub fn artifact_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn num_tensors(&self) -> usize {
        self.graph.tensors.len()
    }

    /// Tensor metadata by tensor index.
    pub fn tensor(&self, index: usize) -> Option<&TensorDescriptor> {
        self.graph.tensors.get(index)
    }

    /// Graph input tensor indices.
    pub fn inputs(&self) -> &[usize] {
        &self.graph.inputs
    }

    /// Graph output tensor indices.
    pub fn outputs(&self) -> &[usize] {
        &self.graph.outputs
    }

    /// Metadata of the `i`-th graph input.
    pub fn input_descriptor(&self, i: usize) -> Option<&TensorDescriptor> {
        self.graph.inputs.get(i).and_then(|&t| self.tensor(t))
    }

    /// Metadata of the `i`-th graph output.
    pub fn output_descriptor(&self, i: usize) -> Option<&TensorDescriptor> {
        self.graph.outputs.get(i).and_then(|&t| self.tensor(t))
    }

    /// Operators in execution order.
    pub fn operators(&self) -> &[OperatorDef] {
        &self.graph.operators
    }

    /// Stored bytes of a constant tensor; `None` for arena tensors or an
    /// out-of-range index.
    pub fn constant_data(&self, index: usize) -> Option<&'a [u8]> {
        self.constants.get(index).copied().flatten()
    }

    /// Arena bytes needed to hold every non-constant tensor at `alignment`.
    pub fn arena_bytes_required(&self, alignment: usize) -> usize {
        self.graph.arena_bytes_required(alignment)
    }

    /// Returns a one-line summary of the model.
    pub fn summary(&self) -> String {
        format!(
            "Model '{}': schema v{}, {} tensors, {} operators, {} constant bytes, artifact {} bytes",
            self.graph.name,
            self.schema_version,
            self.graph.tensors.len(),
            self.graph.operators.len(),
            self.graph.constant_bytes(),
            self.bytes.len(),
        )
    }
}

impl<S: HandleState> fmt::Display for ModelHandle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModelBuilder, OpKind};
    use tensor_core::{DType, Shape};

    fn build(version: u32) -> Vec<u8> {
        let mut b = ModelBuilder::new("tiny").schema_version(version);
        let x = b.input("x", Shape::matrix(1, 2));
        let w = b.constant_f32("w", Shape::matrix(1, 2), &[1.0, 2.0]);
        let y = b.activation("y", Shape::matrix(1, 1));
        b.operator(OpKind::FullyConnected, &[x, w], &[y]);
        b.output(y);
        b.build().unwrap()
    }

    #[test]
    fn test_load_supported_version() {
        let bytes = build(SUPPORTED_SCHEMA_VERSION);
        let handle = ModelHandle::load(&bytes).unwrap();
        assert_eq!(handle.schema_version(), 3);
        assert_eq!(handle.name(), "tiny");
        assert_eq!(handle.num_tensors(), 3);
        assert_eq!(handle.inputs(), &[0]);
        assert_eq!(handle.outputs(), &[2]);
        assert_eq!(handle.operators().len(), 1);
        assert_eq!(handle.artifact_len(), bytes.len());
    }

    #[test]
    fn test_version_mismatch_keeps_metadata_out() {
        let bytes = build(2);
        let parsed = ModelHandle::parse(&bytes).unwrap();
        assert_eq!(parsed.schema_version(), 2);
        let err = parsed.verify_schema(SUPPORTED_SCHEMA_VERSION).unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(matches!(
            err,
            ModelError::SchemaMismatch { found: 2, supported: 3 }
        ));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let bytes = build(4);
        assert!(ModelHandle::load(&bytes).unwrap_err().is_schema_mismatch());
    }

    #[test]
    fn test_descriptors() {
        let bytes = build(3);
        let handle = ModelHandle::load(&bytes).unwrap();
        let input = handle.input_descriptor(0).unwrap();
        assert_eq!(input.name, "x");
        assert_eq!(input.dtype, DType::F32);
        assert_eq!(input.size_bytes(), 8);
        assert_eq!(handle.output_descriptor(0).unwrap().name, "y");
        assert!(handle.input_descriptor(1).is_none());
        assert!(handle.output_descriptor(5).is_none());
        assert!(handle.tensor(3).is_none());
    }

    #[test]
    fn test_constant_data_borrows_artifact() {
        let bytes = build(3);
        let handle = ModelHandle::load(&bytes).unwrap();
        let w = handle.constant_data(1).unwrap();
        assert_eq!(w.len(), 8);
        assert_eq!(f32::from_le_bytes([w[4], w[5], w[6], w[7]]), 2.0);
        let range = bytes.as_ptr_range();
        assert!(range.contains(&w.as_ptr()));
        assert!(handle.constant_data(0).is_none());
        assert!(handle.constant_data(9).is_none());
    }

    #[test]
    fn test_summary_and_arena_estimate() {
        let bytes = build(3);
        let handle = ModelHandle::load(&bytes).unwrap();
        assert!(handle.summary().contains("'tiny'"));
        assert!(handle.to_string().contains("3 tensors"));
        // x: 8 bytes at 0, y: 4 bytes at 16.
        assert_eq!(handle.arena_bytes_required(16), 20);
    }

    #[test]
    fn test_invalid_bytes() {
        assert!(!ModelHandle::parse(&[]).unwrap_err().is_schema_mismatch());
        assert!(ModelHandle::load(&[0u8; 3]).is_err());
    }
}
