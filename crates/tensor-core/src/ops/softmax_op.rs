// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Softmax activation operation.

use super::check_len;
use crate::{Operand, TensorError};

/// Computes `output[i] = exp(x[i] - max) / sum(exp(x - max))` over the whole
/// operand (batch size 1).
///
/// Uses the numerically stable variant that subtracts the maximum value
/// before exponentiation to prevent overflow.
///
/// # Errors
/// Returns [`TensorError::LengthMismatch`] if input and output lengths differ,
/// and [`TensorError::Numeric`] if the exponent sum is not a positive finite
/// number (e.g. the input contains NaN).
pub fn softmax(input: Operand<'_>, output: &mut [f32]) -> Result<(), TensorError> {
    check_len("softmax", "input", output.len(), input.len())?;
    if output.is_empty() {
        return Ok(());
    }

    let max_val = input.iter().fold(f32::NEG_INFINITY, f32::max);

    let mut sum = 0.0f32;
    for (d, s) in output.iter_mut().zip(input.iter()) {
        let e = (s - max_val).exp();
        *d = e;
        sum += e;
    }

    if !(sum.is_finite() && sum > 0.0) {
        return Err(TensorError::Numeric {
            op: "softmax",
            detail: format!("exponent sum is {sum}"),
        });
    }

    let inv_sum = 1.0 / sum;
    output.iter_mut().for_each(|d| *d *= inv_sum);
    Ok(())
}
