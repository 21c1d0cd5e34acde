// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reference kernels.
//!
//! Every kernel reads [`Operand`]s and writes a pre-allocated `f32` output
//! slice. Length checks happen up front so that a malformed graph fails with
//! a [`crate::TensorError`] instead of a panic.

mod elementwise;
mod fully_connected_op;
mod operand;
mod softmax_op;

pub use elementwise::{add, logistic, relu, tanh};
pub use fully_connected_op::fully_connected;
pub use operand::{Operand, OperandIter};
pub use softmax_op::softmax;

use crate::TensorError;

/// Fails unless `operand` holds exactly `expected` elements.
pub(crate) fn check_len(
    op: &'static str,
    operand: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), TensorError> {
    if expected != actual {
        return Err(TensorError::LengthMismatch {
            op,
            operand,
            expected,
            actual,
        });
    }
    Ok(())
}
