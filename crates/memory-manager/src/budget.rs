// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pool size configuration and parsing.
//!
//! A [`PoolBudget`] is the fixed byte capacity of the resource pool. It
//! supports human-readable string parsing for config files and the CLI.

use crate::MemoryError;
use std::fmt;

/// Default pool capacity: 32 KiB.
pub const DEFAULT_POOL_BYTES: usize = 32 * 1024;

/// The fixed byte capacity of a [`crate::ResourcePool`].
///
/// # Parsing
/// - `"32K"` or `"32KB"` → 32 × 1024 bytes
/// - `"1M"` or `"1MB"` → 1 × 1024² bytes
/// - `"512B"` or `"512"` → raw byte count
///
/// # Examples
/// ```
/// use memory_manager::PoolBudget;
///
/// let b = PoolBudget::parse("32K").unwrap();
/// assert_eq!(b.as_bytes(), 32768);
/// assert_eq!(b, PoolBudget::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PoolBudget {
    bytes: usize,
}

impl PoolBudget {
    /// Creates a budget from a byte count.
    pub fn from_bytes(bytes: usize) -> Self {
        Self { bytes }
    }

    /// Creates a budget from kibibytes.
    pub fn from_kb(kb: usize) -> Self {
        Self { bytes: kb * 1024 }
    }

    /// Returns the budget in bytes.
    pub fn as_bytes(&self) -> usize {
        self.bytes
    }

    /// Returns the budget in kibibytes (truncated).
    pub fn as_kb(&self) -> usize {
        self.bytes / 1024
    }

    /// Parses a human-readable size string. Case-insensitive.
    pub fn parse(s: &str) -> Result<Self, MemoryError> {
        let trimmed = s.trim();
        let invalid = |detail: &str| MemoryError::InvalidBudget {
            input: s.to_string(),
            detail: detail.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("empty string"));
        }

        let upper = trimmed.to_uppercase();
        let (num_str, multiplier) = if let Some(n) = upper.strip_suffix("MB") {
            (n, 1024 * 1024)
        } else if let Some(n) = upper.strip_suffix('M') {
            (n, 1024 * 1024)
        } else if let Some(n) = upper.strip_suffix("KB") {
            (n, 1024)
        } else if let Some(n) = upper.strip_suffix('K') {
            (n, 1024)
        } else if let Some(n) = upper.strip_suffix('B') {
            (n, 1)
        } else {
            (upper.as_str(), 1)
        };

        let value: usize = num_str
            .trim()
            .parse()
            .map_err(|_| invalid("expected a number followed by an optional suffix (B, K, M)"))?;

        let bytes = value
            .checked_mul(multiplier)
            .ok_or_else(|| invalid("size overflows usize"))?;

        if bytes == 0 {
            return Err(MemoryError::ZeroCapacity);
        }

        Ok(Self { bytes })
    }
}

impl Default for PoolBudget {
    fn default() -> Self {
        Self::from_bytes(DEFAULT_POOL_BYTES)
    }
}

impl fmt::Display for PoolBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bytes >= 1024 * 1024 && self.bytes % (1024 * 1024) == 0 {
            write!(f, "{} MB", self.bytes / (1024 * 1024))
        } else if self.bytes >= 1024 && self.bytes % 1024 == 0 {
            write!(f, "{} KB", self.bytes / 1024)
        } else {
            write!(f, "{} B", self.bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kilobytes() {
        assert_eq!(PoolBudget::parse("32K").unwrap().as_bytes(), 32768);
        assert_eq!(PoolBudget::parse("32kb").unwrap().as_bytes(), 32768);
        assert_eq!(PoolBudget::parse("  64K ").unwrap().as_kb(), 64);
    }

    #[test]
    fn test_parse_megabytes() {
        assert_eq!(PoolBudget::parse("1M").unwrap().as_bytes(), 1024 * 1024);
        assert_eq!(PoolBudget::parse("2MB").unwrap().as_kb(), 2048);
    }

    #[test]
    fn test_parse_raw_bytes() {
        assert_eq!(PoolBudget::parse("4096").unwrap().as_bytes(), 4096);
        assert_eq!(PoolBudget::parse("300B").unwrap().as_bytes(), 300);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(PoolBudget::parse(""), Err(MemoryError::InvalidBudget { .. })));
        assert!(matches!(PoolBudget::parse("abc"), Err(MemoryError::InvalidBudget { .. })));
        assert!(matches!(PoolBudget::parse("0K"), Err(MemoryError::ZeroCapacity)));
    }

    #[test]
    fn test_default_is_32k() {
        assert_eq!(PoolBudget::default().as_bytes(), 32 * 1024);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PoolBudget::from_kb(32)), "32 KB");
        assert_eq!(format!("{}", PoolBudget::from_bytes(1024 * 1024)), "1 MB");
        assert_eq!(format!("{}", PoolBudget::from_bytes(100)), "100 B");
    }

    #[test]
    fn test_serde_roundtrip() {
        let b = PoolBudget::from_kb(32);
        let json = serde_json::to_string(&b).unwrap();
        let back: PoolBudget = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
