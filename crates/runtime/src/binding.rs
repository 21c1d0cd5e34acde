// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Execution-engine binding: a verified model, the pool that backs its
//! tensors, and the kernels that run its operators.
//!
//! ```text
//! ModelHandle<Verified> ──┐
//! &mut ResourcePool ──────┼── bind() ──► ExecutionContext
//! &OperationRegistry ─────┘                 │ write_input / invoke / read_output
//!                                           ▼
//!                               pool regions, one per arena tensor
//! ```
//!
//! Binding is all-or-nothing: on any failure the pool is reset and no
//! region stays claimed.

use crate::registry::{Kernel, MAX_OPERANDS};
use crate::{features, BindFailure, OperationRegistry, RuntimeError};
use memory_manager::{PoolReader, Region, ResourcePool};
use model_ir::{ModelHandle, OperatorDef, Verified};
use tensor_core::{DType, Operand, TensorDescriptor};

/// Where a tensor's data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Stored in the model artifact.
    Constant,
    /// A byte range in the pool.
    Arena(Region),
    /// Not backed by anything.
    Unallocated,
}

/// A model bound to a pool, ready to run.
///
/// Holds the pool by exclusive borrow for its whole lifetime.
pub struct ExecutionContext<'a> {
    model: &'a ModelHandle<'a, Verified>,
    pool: &'a mut ResourcePool,
    placements: Vec<Placement>,
    kernels: Vec<Kernel>,
}

impl<'a> ExecutionContext<'a> {
    /// Binds `model` to `pool` using the kernels in `registry`.
    ///
    /// Steps:
    /// 1. Reset the pool.
    /// 2. Resolve every operator to a registered kernel and check its arity.
    /// 3. Carve one region per non-constant tensor, in tensor order.
    ///
    /// # Errors
    /// [`RuntimeError::Bind`] with the reason; the pool is left reset.
    pub fn bind(
        model: &'a ModelHandle<'a, Verified>,
        pool: &'a mut ResourcePool,
        registry: &OperationRegistry,
    ) -> Result<Self, RuntimeError> {
        pool.reset();

        let kernels = resolve_kernels(model.operators(), registry)?;

        let mut placements = Vec::with_capacity(model.num_tensors());
        for tensor in &model.graph().tensors {
            if tensor.constant {
                placements.push(Placement::Constant);
                continue;
            }
            match pool.carve(tensor.size_bytes()) {
                Ok(region) => {
                    tracing::trace!(tensor = %tensor.name, %region, "tensor placed");
                    placements.push(Placement::Arena(region));
                }
                Err(source) => {
                    pool.reset();
                    return Err(BindFailure::Pool {
                        tensor: tensor.name.clone(),
                        source,
                    }
                    .into());
                }
            }
        }

        tracing::debug!(
            model = model.name(),
            used = pool.used_bytes(),
            capacity = pool.capacity(),
            "tensors bound to pool"
        );

        Ok(Self {
            model,
            pool,
            placements,
            kernels,
        })
    }

    pub fn model(&self) -> &'a ModelHandle<'a, Verified> {
        self.model
    }

    /// Metadata of the `i`-th graph input.
    pub fn input(&self, i: usize) -> Option<&'a TensorDescriptor> {
        self.model.input_descriptor(i)
    }

    /// Metadata of the `i`-th graph output.
    pub fn output(&self, i: usize) -> Option<&'a TensorDescriptor> {
        self.model.output_descriptor(i)
    }

    /// Placement of tensor `index`.
    pub fn placement(&self, index: usize) -> Placement {
        self.placements
            .get(index)
            .copied()
            .unwrap_or(Placement::Unallocated)
    }

    /// Pool bytes claimed by this binding, alignment padding included.
    pub fn arena_used_bytes(&self) -> usize {
        self.pool.used_bytes()
    }

    pub fn pool_capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Mutable `f32` view of the `i`-th graph input.
    ///
    /// # Errors
    /// [`RuntimeError::InputMismatch`] if the input is absent or not `f32`.
    pub fn input_f32_mut(&mut self, i: usize) -> Result<&mut [f32], RuntimeError> {
        let model = self.model;
        let (index, desc) = model
            .inputs()
            .get(i)
            .and_then(|&t| Some((t, model.tensor(t)?)))
            .ok_or_else(|| RuntimeError::InputMismatch(format!("model has no input {i}")))?;
        if desc.dtype != DType::F32 {
            return Err(RuntimeError::InputMismatch(format!(
                "input '{}' is {}, expected f32",
                desc.name, desc.dtype
            )));
        }
        let region = self.arena_region(index).ok_or_else(|| {
            RuntimeError::InputMismatch(format!("input '{}' has no arena storage", desc.name))
        })?;
        Ok(self.pool.f32_slice_mut(region)?)
    }

    /// Widens `samples` into the `i`-th graph input.
    ///
    /// # Errors
    /// [`RuntimeError::InputMismatch`] if the input is not `f32` or its
    /// element count differs from `samples.len()`.
    pub fn write_input(&mut self, i: usize, samples: &[u8]) -> Result<(), RuntimeError> {
        let input = self.input_f32_mut(i)?;
        features::widen_samples(samples, input)
    }

    /// `f32` view of the `i`-th graph output.
    ///
    /// # Errors
    /// [`RuntimeError::OutputMismatch`] if the output is absent or not `f32`.
    pub fn read_output(&self, i: usize) -> Result<&[f32], RuntimeError> {
        let model = self.model;
        let (index, desc) = model
            .outputs()
            .get(i)
            .and_then(|&t| Some((t, model.tensor(t)?)))
            .ok_or_else(|| RuntimeError::OutputMismatch(format!("model has no output {i}")))?;
        if desc.dtype != DType::F32 {
            return Err(RuntimeError::OutputMismatch(format!(
                "output '{}' is {}, expected f32",
                desc.name, desc.dtype
            )));
        }
        let region = self.arena_region(index).ok_or_else(|| {
            RuntimeError::OutputMismatch(format!("output '{}' has no arena storage", desc.name))
        })?;
        Ok(self.pool.f32_slice(region)?)
    }

    /// Runs every operator once, in graph order.
    ///
    /// # Errors
    /// The first kernel or operand failure; later operators do not run.
    pub fn invoke(&mut self) -> Result<(), RuntimeError> {
        let model = self.model;
        for (op, kernel) in model.operators().iter().zip(&self.kernels) {
            let out_index = op.outputs[0];
            let out_region = match self.placements[out_index] {
                Placement::Arena(region) if model.graph().tensors[out_index].dtype == DType::F32 => {
                    region
                }
                _ => {
                    return Err(unsupported(op, format!("cannot write tensor {out_index} as f32")));
                }
            };

            let (reader, output) = self.pool.split_for_write(out_region)?;
            let mut operands = [Operand::Activation(&[]); MAX_OPERANDS];
            for (slot, &t) in operands.iter_mut().zip(&op.inputs) {
                *slot = resolve_operand(model, &self.placements, &reader, op, t)?;
            }

            kernel(&operands[..op.inputs.len()], output).map_err(|source| {
                RuntimeError::Kernel {
                    index: op.index,
                    kind: op.kind,
                    source,
                }
            })?;
        }
        Ok(())
    }

    fn arena_region(&self, index: usize) -> Option<Region> {
        match self.placements.get(index) {
            Some(Placement::Arena(region)) => Some(*region),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("model", &self.model.name())
            .field("pool", &self.pool)
            .field("placements", &self.placements)
            .finish()
    }
}

fn resolve_kernels(
    operators: &[OperatorDef],
    registry: &OperationRegistry,
) -> Result<Vec<Kernel>, BindFailure> {
    operators
        .iter()
        .map(|op| {
            let reg = registry.get(op.kind).ok_or(BindFailure::UnregisteredOp {
                index: op.index,
                kind: op.kind,
            })?;
            let (inputs, outputs) = (op.inputs.len(), op.outputs.len());
            if !reg.accepts(inputs, outputs) || inputs > MAX_OPERANDS {
                return Err(BindFailure::Arity {
                    index: op.index,
                    kind: op.kind,
                    inputs,
                    outputs,
                    expected: reg.describe_arity(),
                });
            }
            Ok(reg.kernel)
        })
        .collect()
}

fn resolve_operand<'r>(
    model: &'r ModelHandle<'r, Verified>,
    placements: &[Placement],
    reader: &PoolReader<'r>,
    op: &OperatorDef,
    tensor: usize,
) -> Result<Operand<'r>, RuntimeError> {
    let desc = &model.graph().tensors[tensor];
    if desc.dtype != DType::F32 {
        return Err(unsupported(
            op,
            format!("operand '{}' is {}, kernels read f32", desc.name, desc.dtype),
        ));
    }
    match placements[tensor] {
        Placement::Constant => model
            .constant_data(tensor)
            .map(Operand::Constant)
            .ok_or_else(|| unsupported(op, format!("constant '{}' has no data", desc.name))),
        Placement::Arena(region) => Ok(Operand::Activation(reader.f32_slice(region)?)),
        Placement::Unallocated => Err(unsupported(
            op,
            format!("operand '{}' is not allocated", desc.name),
        )),
    }
}

fn unsupported(op: &OperatorDef, detail: String) -> RuntimeError {
    RuntimeError::UnsupportedOperand {
        index: op.index,
        kind: op.kind,
        detail,
    }
}
