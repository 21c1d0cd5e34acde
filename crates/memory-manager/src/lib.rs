// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-manager
//!
//! The fixed-size, alignment-constrained memory arena that backs every
//! intermediate tensor during inference on a memory-constrained device.
//!
//! # Key Components
//!
//! - [`PoolBudget`] — the pool capacity, with human-readable parsing
//!   (`"32K"`, `"1M"`, etc.).
//! - [`ResourcePool`] — the arena: allocated once, 16-byte aligned, carved
//!   with a bump pointer, never resized.
//! - [`Region`] — a byte range inside the pool.
//! - [`PoolReader`] — disjoint read access while one region is written.
//!
//! # Ownership Model
//!
//! ```text
//! ResourcePool (owned by the caller)
//!       │  &mut borrow for the binding's lifetime
//!       ▼
//!   ExecutionContext ── carve() ──► Region { offset, len }  (one per tensor)
//!       │
//!       │  split_for_write(out)
//!       ▼
//!   (PoolReader, &mut [f32])  ──► kernel
//! ```
//!
//! There is no global buffer: whoever owns the pool decides its lifetime,
//! and the borrow checker guarantees a single writer.
//!
//! # Example
//! ```
//! use memory_manager::{PoolBudget, ResourcePool};
//!
//! let mut pool = ResourcePool::new(PoolBudget::parse("32K").unwrap()).unwrap();
//! let input = pool.carve(40 * 4).unwrap();
//! pool.f32_slice_mut(input).unwrap()[0] = 174.0;
//! assert_eq!(pool.f32_slice(input).unwrap()[0], 174.0);
//! ```

mod budget;
mod error;
pub mod pool;
mod region;

pub use budget::{PoolBudget, DEFAULT_POOL_BYTES};
pub use error::MemoryError;
pub use pool::{PoolReader, ResourcePool, MIN_POOL_ALIGNMENT, POOL_ALIGNMENT};
pub use region::Region;
