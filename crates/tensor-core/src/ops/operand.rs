// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Kernel input operands.

/// A read-only kernel input.
///
/// Activations are `f32` slices carved from the resource pool. Constants are
/// the raw little-endian bytes stored in the model artifact; they carry no
/// alignment guarantee, so they are decoded per element instead of being
/// reinterpreted as `&[f32]`.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// An arena-backed activation tensor.
    Activation(&'a [f32]),
    /// Little-endian `f32` data embedded in the model artifact.
    Constant(&'a [u8]),
}

impl<'a> Operand<'a> {
    /// Number of `f32` elements.
    pub fn len(&self) -> usize {
        match self {
            Operand::Activation(s) => s.len(),
            Operand::Constant(b) => b.len() / 4,
        }
    }

    /// Returns `true` if the operand holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns element `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`. Kernels check lengths before reading.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        match self {
            Operand::Activation(s) => s[index],
            Operand::Constant(b) => {
                let i = index * 4;
                f32::from_le_bytes([b[i], b[i + 1], b[i + 2], b[i + 3]])
            }
        }
    }

    /// Iterates over all elements in order.
    pub fn iter(&self) -> OperandIter<'a> {
        OperandIter {
            operand: *self,
            pos: 0,
        }
    }
}

/// Iterator over the elements of an [`Operand`].
#[derive(Debug, Clone)]
pub struct OperandIter<'a> {
    operand: Operand<'a>,
    pos: usize,
}

impl Iterator for OperandIter<'_> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.operand.len() {
            return None;
        }
        let v = self.operand.get(self.pos);
        self.pos += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.operand.len() - self.pos;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for OperandIter<'_> {}
