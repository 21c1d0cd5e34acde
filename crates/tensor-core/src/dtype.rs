// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Supported tensor element data types.

use std::fmt;

/// Enumerates the element types a tensor in a model artifact can declare.
///
/// Only [`DType::F32`] is executable by the reference kernels; the other
/// variants exist so that artifacts declaring them can still be parsed,
/// described in diagnostics, and rejected with a precise error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// 32-bit IEEE 754 floating point.
    F32,
    /// 16-bit IEEE 754 floating point.
    F16,
    /// 32-bit signed integer.
    I32,
    /// 8-bit unsigned integer (raw sample magnitudes).
    U8,
    /// 8-bit signed integer (quantised tensors).
    I8,
}

impl DType {
    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            DType::F32 | DType::I32 => 4,
            DType::F16 => 2,
            DType::U8 | DType::I8 => 1,
        }
    }

    /// Returns a human-readable label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F16 => "f16",
            DType::I32 => "i32",
            DType::U8 => "u8",
            DType::I8 => "i8",
        }
    }

    /// Numeric type tag printed in tensor diagnostics.
    ///
    /// The values follow the numbering used by common micro-interpreter
    /// schemas so that logs can be cross-checked against converter output.
    pub fn type_code(self) -> u8 {
        match self {
            DType::F32 => 1,
            DType::I32 => 2,
            DType::U8 => 3,
            DType::I8 => 9,
            DType::F16 => 10,
        }
    }

    /// Parses a dtype string. Case-insensitive; accepts a few aliases.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "f32" | "float32" | "float" => Some(DType::F32),
            "f16" | "float16" | "half" => Some(DType::F16),
            "i32" | "int32" => Some(DType::I32),
            "u8" | "uint8" => Some(DType::U8),
            "i8" | "int8" => Some(DType::I8),
            _ => None,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(DType::F32.size_bytes(), 4);
        assert_eq!(DType::F16.size_bytes(), 2);
        assert_eq!(DType::U8.size_bytes(), 1);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(DType::from_str_loose("F32"), Some(DType::F32));
        assert_eq!(DType::from_str_loose("float32"), Some(DType::F32));
        assert_eq!(DType::from_str_loose("uint8"), Some(DType::U8));
        assert_eq!(DType::from_str_loose("bf16"), None);
    }

    #[test]
    fn test_type_codes_are_distinct() {
        let all = [DType::F32, DType::F16, DType::I32, DType::U8, DType::I8];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.type_code(), b.type_code());
            }
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&DType::F32).unwrap(), "\"f32\"");
        let d: DType = serde_json::from_str("\"u8\"").unwrap();
        assert_eq!(d, DType::U8);
    }
}
