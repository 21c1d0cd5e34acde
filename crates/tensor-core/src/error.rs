// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor operations.

/// Errors that can occur while executing a kernel.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// An operand does not hold the number of elements the operation needs.
    #[error("length mismatch in {op} ({operand}): expected {expected} elements, got {actual}")]
    LengthMismatch {
        op: &'static str,
        operand: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The operation was called with the wrong number of operands.
    #[error("{op} takes {expected} operands, got {actual}")]
    ArityMismatch {
        op: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// The requested data type is not supported for this operation.
    #[error("unsupported dtype {dtype:?} for operation {op}")]
    UnsupportedDType {
        op: &'static str,
        dtype: crate::DType,
    },

    /// A numeric computation failed.
    #[error("numeric error in {op}: {detail}")]
    Numeric {
        op: &'static str,
        detail: String,
    },
}
