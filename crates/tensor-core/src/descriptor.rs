// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Structured tensor metadata and its diagnostic rendering.
//!
//! A [`TensorDescriptor`] carries everything needed to explain a tensor in a
//! log line (type tag, byte length, dimensions) without touching the bytes
//! that back it. Descriptors come from the model artifact, so they remain
//! available even when the arena could not be carved.

use crate::{DType, Shape};

/// Metadata of one tensor declared by a model graph.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TensorDescriptor {
    /// Tensor name as declared in the graph.
    pub name: String,
    /// Element type.
    pub dtype: DType,
    /// Dimension sizes.
    pub shape: Shape,
    /// `true` if the tensor's data ships inside the model artifact
    /// (weights, biases) instead of living in the arena.
    pub constant: bool,
}

impl TensorDescriptor {
    /// Creates a descriptor for an arena-backed (non-constant) tensor.
    pub fn activation(name: impl Into<String>, dtype: DType, shape: Shape) -> Self {
        Self {
            name: name.into(),
            dtype,
            shape,
            constant: false,
        }
    }

    /// Creates a descriptor for a constant tensor.
    pub fn constant(name: impl Into<String>, dtype: DType, shape: Shape) -> Self {
        Self {
            name: name.into(),
            dtype,
            shape,
            constant: true,
        }
    }

    /// Number of elements.
    pub fn num_elements(&self) -> usize {
        self.shape.num_elements()
    }

    /// Byte length of the tensor's data, saturating at `usize::MAX`.
    pub fn size_bytes(&self) -> usize {
        self.shape.size_bytes(self.dtype)
    }

    /// Byte length of the tensor's data, or `None` if the declared shape
    /// overflows `usize`.
    pub fn checked_size_bytes(&self) -> Option<usize> {
        self.shape.checked_size_bytes(self.dtype)
    }
}

/// Renders the diagnostic line for the tensor at `index`.
///
/// `None` stands for a tensor slot the graph declares but the engine could
/// not resolve.
///
/// # Examples
/// ```
/// use tensor_core::{describe_tensor, DType, Shape, TensorDescriptor};
///
/// let t = TensorDescriptor::activation("input", DType::F32, Shape::matrix(1, 40));
/// assert_eq!(
///     describe_tensor(0, Some(&t)),
///     "Tensor 0 - Type: f32 (1), Size: 160, Dimensions: [1, 40]"
/// );
/// assert_eq!(describe_tensor(3, None), "Tensor 3 is null");
/// ```
pub fn describe_tensor(index: usize, tensor: Option<&TensorDescriptor>) -> String {
    match tensor {
        None => format!("Tensor {index} is null"),
        Some(t) => format!(
            "Tensor {index} - Type: {} ({}), Size: {}, Dimensions: {}",
            t.dtype,
            t.dtype.type_code(),
            t.size_bytes(),
            t.shape,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bytes() {
        let t = TensorDescriptor::constant("fc1.weight", DType::F32, Shape::matrix(8, 40));
        assert_eq!(t.size_bytes(), 8 * 40 * 4);
        assert!(t.constant);
    }

    #[test]
    fn test_describe_scalar_output() {
        let t = TensorDescriptor::activation("score", DType::F32, Shape::scalar());
        assert_eq!(
            describe_tensor(1, Some(&t)),
            "Tensor 1 - Type: f32 (1), Size: 4, Dimensions: []"
        );
    }

    #[test]
    fn test_describe_uint8_input() {
        let t = TensorDescriptor::activation("raw", DType::U8, Shape::vector(40));
        assert_eq!(
            describe_tensor(0, Some(&t)),
            "Tensor 0 - Type: u8 (3), Size: 40, Dimensions: [40]"
        );
    }

    #[test]
    fn test_describe_overflowing_tensor() {
        let t = TensorDescriptor::activation("y", DType::F32, Shape::matrix(1 << 62, 8));
        assert_eq!(t.checked_size_bytes(), None);
        assert_eq!(
            describe_tensor(0, Some(&t)),
            format!(
                "Tensor 0 - Type: f32 (1), Size: {}, Dimensions: [{}, 8]",
                usize::MAX,
                1usize << 62
            )
        );
    }

    #[test]
    fn test_describe_absent() {
        assert_eq!(describe_tensor(7, None), "Tensor 7 is null");
    }
}
