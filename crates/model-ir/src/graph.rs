// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The resolved tensor graph.

use crate::OperatorDef;
use tensor_core::TensorDescriptor;

/// A structurally valid tensor graph, produced by
/// [`GraphManifest::into_graph`](crate::GraphManifest::into_graph).
///
/// Every index stored here is in range for `tensors`.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Human-readable model name.
    pub name: String,
    /// Tensor metadata, addressed by tensor index.
    pub tensors: Vec<TensorDescriptor>,
    /// Operators in execution order.
    pub operators: Vec<OperatorDef>,
    /// Graph input tensor indices (exactly one).
    pub inputs: Vec<usize>,
    /// Graph output tensor indices (at least one).
    pub outputs: Vec<usize>,
}

impl Graph {
    /// Bytes the arena must provide for every non-constant tensor when each
    /// one is placed at a multiple of `alignment`.
    ///
    /// Saturates at `usize::MAX`, which no pool can satisfy.
    pub fn arena_bytes_required(&self, alignment: usize) -> usize {
        let alignment = alignment.max(1);
        self.tensors
            .iter()
            .filter(|t| !t.constant)
            .try_fold(0usize, |offset, t| {
                offset
                    .checked_next_multiple_of(alignment)?
                    .checked_add(t.checked_size_bytes()?)
            })
            .unwrap_or(usize::MAX)
    }

    /// Bytes of constant data (weights, biases) the artifact carries.
    pub fn constant_bytes(&self) -> usize {
        self.tensors
            .iter()
            .filter(|t| t.constant)
            .map(|t| t.size_bytes())
            .fold(0, usize::saturating_add)
    }
}
