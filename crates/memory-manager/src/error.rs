// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the resource pool.

use crate::Region;

/// Errors that can occur while carving or accessing the resource pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    /// The requested region does not fit in the remaining pool space.
    #[error("pool exhausted: requested {requested_bytes} bytes at offset {offset}, but only {available_bytes} available (capacity: {capacity_bytes})")]
    PoolExhausted {
        requested_bytes: usize,
        offset: usize,
        available_bytes: usize,
        capacity_bytes: usize,
    },

    /// The alignment is not a power of two, is smaller than one `f32`, or
    /// exceeds what the pool's backing storage guarantees.
    #[error("unsupported alignment {alignment} (must be a power of two between {min} and {max})")]
    UnsupportedAlignment {
        alignment: usize,
        min: usize,
        max: usize,
    },

    /// A pool with zero capacity was requested.
    #[error("cannot create a zero-sized pool")]
    ZeroCapacity,

    /// A pool size string could not be parsed.
    #[error("invalid pool size '{input}': {detail}")]
    InvalidBudget { input: String, detail: String },

    /// A region lies (partly) outside the pool.
    #[error("region {region} is outside the pool (capacity: {capacity_bytes})")]
    OutOfBounds {
        region: Region,
        capacity_bytes: usize,
    },

    /// A region cannot be viewed as `f32` because of its offset or length.
    #[error("region {region} is not f32-aligned")]
    MisalignedView { region: Region },

    /// Two regions that must be disjoint overlap.
    #[error("region {read} overlaps region {write}")]
    Overlap { read: Region, write: Region },
}
