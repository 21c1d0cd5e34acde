// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fully connected (dense) layer.

use super::check_len;
use crate::{Operand, TensorError};

/// Computes `output[n] = bias[n] + Σ_k input[k] · weights[n, k]`.
///
/// `weights` is row-major `[N, K]` (one row per output unit), where `K` is
/// the input length and `N` the output length. `bias`, when present, holds
/// `N` elements.
///
/// # Errors
/// Returns [`TensorError::LengthMismatch`] if `weights` or `bias` disagree
/// with the input/output lengths.
pub fn fully_connected(
    input: Operand<'_>,
    weights: Operand<'_>,
    bias: Option<Operand<'_>>,
    output: &mut [f32],
) -> Result<(), TensorError> {
    let k = input.len();
    let n = output.len();

    check_len("fully_connected", "weights", n * k, weights.len())?;
    if let Some(b) = &bias {
        check_len("fully_connected", "bias", n, b.len())?;
    }

    for (row, out) in output.iter_mut().enumerate() {
        let mut acc = bias.map_or(0.0, |b| b.get(row));
        let base = row * k;
        for (col, x) in input.iter().enumerate() {
            acc += x * weights.get(base + col);
        }
        *out = acc;
    }

    Ok(())
}
