// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operation registry: which operator kinds a binding may execute, and
//! the kernel that runs each one.

use model_ir::OpKind;
use std::collections::HashMap;
use tensor_core::{Operand, TensorError};

/// Largest number of inputs any operator takes.
pub const MAX_OPERANDS: usize = 3;

/// A kernel entry point: reads `inputs`, writes `output`.
pub type Kernel = fn(&[Operand<'_>], &mut [f32]) -> Result<(), TensorError>;

/// A registered operator.
#[derive(Clone, Copy)]
pub struct OpRegistration {
    pub kernel: Kernel,
    pub min_inputs: usize,
    pub max_inputs: usize,
}

impl OpRegistration {
    /// The built-in kernel for `kind`.
    pub fn builtin(kind: OpKind) -> Self {
        let (kernel, min_inputs, max_inputs) = match kind {
            OpKind::FullyConnected => (fully_connected_kernel as Kernel, 2, 3),
            OpKind::Add => (add_kernel as Kernel, 2, 2),
            OpKind::Relu => (relu_kernel as Kernel, 1, 1),
            OpKind::Logistic => (logistic_kernel as Kernel, 1, 1),
            OpKind::Tanh => (tanh_kernel as Kernel, 1, 1),
            OpKind::Softmax => (softmax_kernel as Kernel, 1, 1),
        };
        Self {
            kernel,
            min_inputs,
            max_inputs,
        }
    }

    /// Whether an operator with these operand counts can be run.
    pub fn accepts(&self, inputs: usize, outputs: usize) -> bool {
        (self.min_inputs..=self.max_inputs).contains(&inputs) && outputs == 1
    }

    /// Human-readable arity, e.g. `"expects 2..=3 inputs and 1 output"`.
    pub fn describe_arity(&self) -> String {
        if self.min_inputs == self.max_inputs {
            format!("expects {} inputs and 1 output", self.min_inputs)
        } else {
            format!(
                "expects {}..={} inputs and 1 output",
                self.min_inputs, self.max_inputs
            )
        }
    }
}

impl std::fmt::Debug for OpRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpRegistration")
            .field("min_inputs", &self.min_inputs)
            .field("max_inputs", &self.max_inputs)
            .finish_non_exhaustive()
    }
}

/// The set of operators available to a binding.
///
/// # Example
/// ```
/// use model_ir::OpKind;
/// use runtime::OperationRegistry;
///
/// let all = OperationRegistry::all_ops();
/// assert!(all.contains(OpKind::Softmax));
///
/// let dense_only = OperationRegistry::new().with_op(OpKind::FullyConnected);
/// assert!(!dense_only.contains(OpKind::Relu));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    ops: HashMap<OpKind, OpRegistration>,
}

impl OperationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in operator.
    pub fn all_ops() -> Self {
        OpKind::ALL
            .into_iter()
            .fold(Self::new(), |registry, kind| registry.with_op(kind))
    }

    /// Adds the built-in kernel for `kind`.
    pub fn with_op(mut self, kind: OpKind) -> Self {
        self.register(kind, OpRegistration::builtin(kind));
        self
    }

    /// Registers (or replaces) the kernel for `kind`.
    pub fn register(&mut self, kind: OpKind, registration: OpRegistration) {
        self.ops.insert(kind, registration);
    }

    pub fn get(&self, kind: OpKind) -> Option<&OpRegistration> {
        self.ops.get(&kind)
    }

    pub fn contains(&self, kind: OpKind) -> bool {
        self.ops.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

fn fully_connected_kernel(inputs: &[Operand<'_>], output: &mut [f32]) -> Result<(), TensorError> {
    match *inputs {
        [x, w] => tensor_core::fully_connected(x, w, None, output),
        [x, w, b] => tensor_core::fully_connected(x, w, Some(b), output),
        _ => Err(arity("fully_connected", "2 or 3", inputs.len())),
    }
}

fn add_kernel(inputs: &[Operand<'_>], output: &mut [f32]) -> Result<(), TensorError> {
    match *inputs {
        [a, b] => tensor_core::add(a, b, output),
        _ => Err(arity("add", "2", inputs.len())),
    }
}

macro_rules! unary_kernel {
    ($name:ident, $op:path, $label:literal) => {
        fn $name(inputs: &[Operand<'_>], output: &mut [f32]) -> Result<(), TensorError> {
            match *inputs {
                [x] => $op(x, output),
                _ => Err(arity($label, "1", inputs.len())),
            }
        }
    };
}

unary_kernel!(relu_kernel, tensor_core::relu, "relu");
unary_kernel!(logistic_kernel, tensor_core::logistic, "logistic");
unary_kernel!(tanh_kernel, tensor_core::tanh, "tanh");
unary_kernel!(softmax_kernel, tensor_core::softmax, "softmax");

fn arity(op: &'static str, expected: &'static str, actual: usize) -> TensorError {
    TensorError::ArityMismatch {
        op,
        expected,
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ops() {
        let r = OperationRegistry::all_ops();
        assert_eq!(r.len(), OpKind::ALL.len());
        for kind in OpKind::ALL {
            assert!(r.contains(kind));
        }
    }

    #[test]
    fn test_subset() {
        let r = OperationRegistry::new()
            .with_op(OpKind::FullyConnected)
            .with_op(OpKind::Logistic);
        assert_eq!(r.len(), 2);
        assert!(r.get(OpKind::Tanh).is_none());
        assert!(OperationRegistry::new().is_empty());
    }

    #[test]
    fn test_arity() {
        let fc = OpRegistration::builtin(OpKind::FullyConnected);
        assert!(fc.accepts(2, 1));
        assert!(fc.accepts(3, 1));
        assert!(!fc.accepts(1, 1));
        assert!(!fc.accepts(3, 2));
        assert_eq!(fc.describe_arity(), "expects 2..=3 inputs and 1 output");

        let relu = OpRegistration::builtin(OpKind::Relu);
        assert!(relu.accepts(1, 1));
        assert!(!relu.accepts(2, 1));
        assert_eq!(relu.describe_arity(), "expects 1 inputs and 1 output");
    }

    #[test]
    fn test_kernels_dispatch() {
        let x = [1.0f32, -2.0];
        let mut out = [0.0f32; 2];
        let relu = OpRegistration::builtin(OpKind::Relu).kernel;
        relu(&[Operand::Activation(&x)], &mut out).unwrap();
        assert_eq!(out, [1.0, 0.0]);

        let add = OpRegistration::builtin(OpKind::Add).kernel;
        add(&[Operand::Activation(&x), Operand::Activation(&x)], &mut out).unwrap();
        assert_eq!(out, [2.0, -4.0]);
    }

    #[test]
    fn test_kernel_arity_error() {
        let mut out = [0.0f32; 1];
        let add = OpRegistration::builtin(OpKind::Add).kernel;
        let err = add(&[Operand::Activation(&[1.0])], &mut out).unwrap_err();
        assert!(matches!(err, TensorError::ArityMismatch { op: "add", .. }));
    }

    #[test]
    fn test_fully_connected_with_constant_bias() {
        let x = [1.0f32, 2.0];
        let w: Vec<u8> = [0.5f32, 0.25].iter().flat_map(|v| v.to_le_bytes()).collect();
        let b: Vec<u8> = 1.0f32.to_le_bytes().to_vec();
        let mut out = [0.0f32; 1];
        let fc = OpRegistration::builtin(OpKind::FullyConnected).kernel;
        fc(
            &[Operand::Activation(&x), Operand::Constant(&w), Operand::Constant(&b)],
            &mut out,
        )
        .unwrap();
        assert_eq!(out[0], 2.0);
    }
}
