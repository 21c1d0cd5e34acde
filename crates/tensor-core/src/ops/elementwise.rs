// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-wise activations and addition.

use super::check_len;
use crate::{Operand, TensorError};

fn unary(
    op: &'static str,
    input: Operand<'_>,
    output: &mut [f32],
    f: impl Fn(f32) -> f32,
) -> Result<(), TensorError> {
    check_len(op, "input", output.len(), input.len())?;
    for (d, x) in output.iter_mut().zip(input.iter()) {
        *d = f(x);
    }
    Ok(())
}

/// `output[i] = max(input[i], 0)`.
pub fn relu(input: Operand<'_>, output: &mut [f32]) -> Result<(), TensorError> {
    unary("relu", input, output, |x| x.max(0.0))
}

/// `output[i] = 1 / (1 + exp(-input[i]))`.
pub fn logistic(input: Operand<'_>, output: &mut [f32]) -> Result<(), TensorError> {
    unary("logistic", input, output, |x| 1.0 / (1.0 + (-x).exp()))
}

/// `output[i] = tanh(input[i])`.
pub fn tanh(input: Operand<'_>, output: &mut [f32]) -> Result<(), TensorError> {
    unary("tanh", input, output, f32::tanh)
}

/// `output[i] = lhs[i] + rhs[i]`. Both operands must match the output length.
pub fn add(lhs: Operand<'_>, rhs: Operand<'_>, output: &mut [f32]) -> Result<(), TensorError> {
    check_len("add", "lhs", output.len(), lhs.len())?;
    check_len("add", "rhs", output.len(), rhs.len())?;
    for (i, d) in output.iter_mut().enumerate() {
        *d = lhs.get(i) + rhs.get(i);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu() {
        let x = [-1.0f32, 0.0, 2.5];
        let mut out = [9.0f32; 3];
        relu(Operand::Activation(&x), &mut out).unwrap();
        assert_eq!(out, [0.0, 0.0, 2.5]);
    }

    #[test]
    fn test_logistic_midpoint_and_bounds() {
        let x = [0.0f32, 40.0, -40.0];
        let mut out = [0.0f32; 3];
        logistic(Operand::Activation(&x), &mut out).unwrap();
        assert_eq!(out[0], 0.5);
        assert!(out[1] > 0.999 && out[1] <= 1.0);
        assert!(out[2] >= 0.0 && out[2] < 0.001);
    }

    #[test]
    fn test_tanh_is_odd() {
        let x = [0.7f32, -0.7];
        let mut out = [0.0f32; 2];
        tanh(Operand::Activation(&x), &mut out).unwrap();
        assert!((out[0] + out[1]).abs() < 1e-6);
    }

    #[test]
    fn test_add_constant() {
        let x = [1.0f32, 2.0];
        let c: Vec<u8> = [0.5f32, -2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut out = [0.0f32; 2];
        add(Operand::Activation(&x), Operand::Constant(&c), &mut out).unwrap();
        assert_eq!(out, [1.5, 0.0]);
    }

    #[test]
    fn test_unary_length_mismatch() {
        let x = [1.0f32; 3];
        let mut out = [0.0f32; 2];
        assert!(matches!(
            relu(Operand::Activation(&x), &mut out),
            Err(TensorError::LengthMismatch { op: "relu", .. })
        ));
    }
}
