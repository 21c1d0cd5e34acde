// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the inference runtime.

use crate::LifecycleState;
use model_ir::OpKind;
use std::fmt;

/// Why an execution context could not be bound.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindFailure {
    /// The graph uses an operator the registry does not provide.
    #[error("operator {index} ({kind}) is not registered")]
    UnregisteredOp { index: usize, kind: OpKind },

    /// An operator has the wrong number of inputs or outputs.
    #[error("operator {index} ({kind}) has {inputs} inputs and {outputs} outputs; {expected}")]
    Arity {
        index: usize,
        kind: OpKind,
        inputs: usize,
        outputs: usize,
        expected: String,
    },

    /// The tensors do not fit the pool.
    #[error("tensor '{tensor}' does not fit the pool: {source}")]
    Pool {
        tensor: String,
        #[source]
        source: memory_manager::MemoryError,
    },
}

/// Errors that can occur while binding or running a model.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The model artifact could not be parsed or verified.
    #[error("model error: {0}")]
    Model(#[from] model_ir::ModelError),

    /// Binding the model to the pool failed.
    #[error("binding failed: {0}")]
    Bind(#[from] BindFailure),

    /// A kernel rejected its operands.
    #[error("operator {index} ({kind}) failed: {source}")]
    Kernel {
        index: usize,
        kind: OpKind,
        #[source]
        source: tensor_core::TensorError,
    },

    /// A pool view could not be produced.
    #[error("memory error: {0}")]
    Memory(#[from] memory_manager::MemoryError),

    /// An operator reads or writes a tensor the kernels cannot handle.
    #[error("operator {index} ({kind}): {detail}")]
    UnsupportedOperand {
        index: usize,
        kind: OpKind,
        detail: String,
    },

    /// The input tensor cannot take the feature vector.
    #[error("input mismatch: {0}")]
    InputMismatch(String),

    /// The output tensor cannot produce a score.
    #[error("output mismatch: {0}")]
    OutputMismatch(String),

    /// A feature file could not be parsed.
    #[error("invalid features: {0}")]
    InvalidFeatures(String),

    /// The controller already failed; failures are terminal.
    #[error("controller is in terminal state {0}")]
    Terminated(LifecycleState),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// The stage at which a lifecycle run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidModel,
    SchemaMismatch,
    AllocationFailed,
    InvocationError,
    InputMismatch,
    OutputMismatch,
}

impl FailureKind {
    /// Process exit code for this failure; `0` is success, `1` is reserved
    /// for failures outside the lifecycle.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::InvalidModel => 2,
            Self::SchemaMismatch => 3,
            Self::AllocationFailed => 4,
            Self::InvocationError => 5,
            Self::InputMismatch => 6,
            Self::OutputMismatch => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidModel => "invalid model",
            Self::SchemaMismatch => "schema mismatch",
            Self::AllocationFailed => "allocation failed",
            Self::InvocationError => "invocation error",
            Self::InputMismatch => "input mismatch",
            Self::OutputMismatch => "output mismatch",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed lifecycle stage together with its cause.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {source}")]
pub struct LifecycleError {
    pub kind: FailureKind,
    #[source]
    pub source: RuntimeError,
}

impl LifecycleError {
    pub fn new(kind: FailureKind, source: impl Into<RuntimeError>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let kinds = [
            FailureKind::InvalidModel,
            FailureKind::SchemaMismatch,
            FailureKind::AllocationFailed,
            FailureKind::InvocationError,
            FailureKind::InputMismatch,
            FailureKind::OutputMismatch,
        ];
        let mut codes: Vec<u8> = kinds.iter().map(|k| k.exit_code()).collect();
        assert_eq!(codes, vec![2, 3, 4, 5, 6, 7]);
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_lifecycle_error_display() {
        let err = LifecycleError::new(
            FailureKind::SchemaMismatch,
            model_ir::ModelError::SchemaMismatch {
                found: 2,
                supported: 3,
            },
        );
        assert_eq!(err.exit_code(), 3);
        let msg = err.to_string();
        assert!(msg.starts_with("schema mismatch:"));
        assert!(msg.contains("version 2"));
    }

    #[test]
    fn test_bind_failure_converts() {
        let err: RuntimeError = BindFailure::UnregisteredOp {
            index: 1,
            kind: OpKind::Softmax,
        }
        .into();
        assert!(err.to_string().contains("softmax"));
    }
}
