// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Byte ranges inside the resource pool.

use std::fmt;

/// A byte range `[offset, offset + len)` carved from a [`crate::ResourcePool`].
///
/// Regions are plain offsets rather than borrowed slices so that a binding
/// can hold many of them while still lending the pool out mutably during
/// execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Start offset from the pool base.
    pub offset: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Region {
    /// Creates a region.
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// One past the last byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Returns `true` if the two regions share at least one byte.
    /// Empty regions never overlap anything.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.len > 0 && other.len > 0 && self.offset < other.end() && other.offset < self.end()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.offset, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Region::new(0, 16);
        assert!(a.overlaps(&Region::new(15, 4)));
        assert!(!a.overlaps(&Region::new(16, 4)));
        assert!(!a.overlaps(&Region::new(4, 0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Region::new(32, 16)), "[32..48)");
    }
}
