// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-capacity, alignment-constrained resource pool.
//!
//! The [`ResourcePool`] is the only backing store for intermediate tensors.
//! It:
//!
//! 1. Allocates its storage once, at construction, and never grows.
//! 2. Guarantees a 16-byte aligned base address, so every region carved at
//!    an aligned offset is aligned in memory too.
//! 3. Hands out [`Region`]s with a bump pointer. Checkpoints let a caller
//!    roll back a sequence of carves that must succeed or fail as a unit.
//!
//! # Ownership
//! The pool is an ordinary owned value. A binding borrows it `&mut` for its
//! whole lifetime, so nothing else can touch the bytes while tensors live
//! in it.

use crate::{MemoryError, PoolBudget, Region};
use std::marker::PhantomData;

/// Alignment of the pool's base address, and the largest region alignment
/// the pool can honour.
pub const POOL_ALIGNMENT: usize = 16;

/// Smallest region alignment a pool accepts: one `f32` element, so every
/// carved region can be viewed as `f32`.
pub const MIN_POOL_ALIGNMENT: usize = std::mem::size_of::<f32>();

/// One aligned block of backing storage.
#[derive(Clone, Copy)]
#[repr(C, align(16))]
struct Block([u8; POOL_ALIGNMENT]);

/// The fixed memory arena backing all tensor storage.
///
/// # Example
/// ```
/// use memory_manager::{PoolBudget, ResourcePool};
///
/// let mut pool = ResourcePool::new(PoolBudget::from_kb(32)).unwrap();
/// let a = pool.carve(160).unwrap();
/// let b = pool.carve(4).unwrap();
/// assert_eq!(a.offset, 0);
/// assert_eq!(b.offset, 160);
/// assert_eq!(pool.used_bytes(), 164);
///
/// pool.reset();
/// assert_eq!(pool.used_bytes(), 0);
/// ```
pub struct ResourcePool {
    blocks: Box<[Block]>,
    capacity: usize,
    alignment: usize,
    offset: usize,
    high_water: usize,
}

impl ResourcePool {
    /// Creates a pool of `budget` bytes with the default 16-byte alignment.
    pub fn new(budget: PoolBudget) -> Result<Self, MemoryError> {
        Self::with_alignment(budget, POOL_ALIGNMENT)
    }

    /// Creates a pool whose carved regions start at multiples of `alignment`.
    ///
    /// `alignment` must be a power of two between [`MIN_POOL_ALIGNMENT`] and
    /// [`POOL_ALIGNMENT`].
    pub fn with_alignment(budget: PoolBudget, alignment: usize) -> Result<Self, MemoryError> {
        if !alignment.is_power_of_two()
            || !(MIN_POOL_ALIGNMENT..=POOL_ALIGNMENT).contains(&alignment)
        {
            return Err(MemoryError::UnsupportedAlignment {
                alignment,
                min: MIN_POOL_ALIGNMENT,
                max: POOL_ALIGNMENT,
            });
        }
        let capacity = budget.as_bytes();
        if capacity == 0 {
            return Err(MemoryError::ZeroCapacity);
        }

        let num_blocks = capacity.div_ceil(POOL_ALIGNMENT);
        tracing::debug!(capacity, alignment, "resource pool created");

        Ok(Self {
            blocks: vec![Block([0; POOL_ALIGNMENT]); num_blocks].into_boxed_slice(),
            capacity,
            alignment,
            offset: 0,
            high_water: 0,
        })
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Alignment applied to every carved region.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Bytes currently claimed (including alignment padding).
    pub fn used_bytes(&self) -> usize {
        self.offset
    }

    /// Bytes remaining before the pool is exhausted.
    pub fn available_bytes(&self) -> usize {
        self.capacity.saturating_sub(self.offset)
    }

    /// Largest `used_bytes` value observed since construction.
    pub fn high_water_bytes(&self) -> usize {
        self.high_water
    }

    /// Carves a region of `len` bytes at the next aligned offset.
    ///
    /// Fails without changing the pool if the region does not fit.
    pub fn carve(&mut self, len: usize) -> Result<Region, MemoryError> {
        let start = align_up(self.offset, self.alignment);
        let end = start.checked_add(len).filter(|&end| end <= self.capacity);

        let Some(end) = end else {
            return Err(MemoryError::PoolExhausted {
                requested_bytes: len,
                offset: start,
                available_bytes: self.capacity.saturating_sub(start),
                capacity_bytes: self.capacity,
            });
        };

        self.offset = end;
        self.high_water = self.high_water.max(end);
        Ok(Region::new(start, len))
    }

    /// Returns the current bump offset, to be passed to [`restore`](Self::restore).
    pub fn checkpoint(&self) -> usize {
        self.offset
    }

    /// Releases every region carved after `checkpoint`.
    ///
    /// Released bytes are zeroed so that a later carve never observes data
    /// from a failed or finished binding.
    pub fn restore(&mut self, checkpoint: usize) {
        if checkpoint < self.offset {
            let end = self.offset;
            self.as_bytes_mut()[checkpoint..end].fill(0);
            self.offset = checkpoint;
        }
    }

    /// Releases every region and zeroes the pool.
    pub fn reset(&mut self) {
        self.restore(0);
    }

    /// Borrows the bytes of `region`.
    pub fn bytes(&self, region: Region) -> Result<&[u8], MemoryError> {
        self.check_bounds(region)?;
        Ok(&self.as_bytes()[region.offset..region.end()])
    }

    /// Mutably borrows the bytes of `region`.
    pub fn bytes_mut(&mut self, region: Region) -> Result<&mut [u8], MemoryError> {
        self.check_bounds(region)?;
        Ok(&mut self.as_bytes_mut()[region.offset..region.end()])
    }

    /// Views `region` as `f32` elements.
    pub fn f32_slice(&self, region: Region) -> Result<&[f32], MemoryError> {
        self.check_f32(region)?;
        // SAFETY: bounds and 4-byte alignment of offset and length were
        // checked; the base address is 16-byte aligned; every bit pattern
        // is a valid f32.
        Ok(unsafe {
            std::slice::from_raw_parts(
                self.base_ptr().add(region.offset) as *const f32,
                region.len / 4,
            )
        })
    }

    /// Mutably views `region` as `f32` elements.
    pub fn f32_slice_mut(&mut self, region: Region) -> Result<&mut [f32], MemoryError> {
        self.check_f32(region)?;
        // SAFETY: as in `f32_slice`; `&mut self` guarantees exclusivity.
        Ok(unsafe {
            std::slice::from_raw_parts_mut(
                self.base_mut_ptr().add(region.offset) as *mut f32,
                region.len / 4,
            )
        })
    }

    /// Splits the pool into a mutable `f32` view of `output` and a reader
    /// for every other region.
    ///
    /// The reader refuses regions that overlap `output`, so a kernel can read
    /// its inputs and write its output in the same pool without copying.
    pub fn split_for_write(
        &mut self,
        output: Region,
    ) -> Result<(PoolReader<'_>, &mut [f32]), MemoryError> {
        self.check_f32(output)?;
        let base = self.base_mut_ptr();
        let reader = PoolReader {
            base: base as *const u8,
            capacity: self.capacity,
            excluded: output,
            _pool: PhantomData,
        };
        // SAFETY: `output` is in bounds and f32-aligned. The reader never
        // yields a slice overlapping `output`, and both borrow `self`
        // mutably, so no other access to the pool exists while they live.
        let out = unsafe {
            std::slice::from_raw_parts_mut(base.add(output.offset) as *mut f32, output.len / 4)
        };
        Ok((reader, out))
    }

    // ── Private helpers ────────────────────────────────────────

    fn base_ptr(&self) -> *const u8 {
        self.blocks.as_ptr() as *const u8
    }

    fn base_mut_ptr(&mut self) -> *mut u8 {
        self.blocks.as_mut_ptr() as *mut u8
    }

    fn as_bytes(&self) -> &[u8] {
        // SAFETY: `blocks` holds at least `capacity` initialised bytes.
        unsafe { std::slice::from_raw_parts(self.base_ptr(), self.capacity) }
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        let capacity = self.capacity;
        // SAFETY: as above, with exclusive access through `&mut self`.
        unsafe { std::slice::from_raw_parts_mut(self.base_mut_ptr(), capacity) }
    }

    fn check_bounds(&self, region: Region) -> Result<(), MemoryError> {
        check_bounds(region, self.capacity)
    }

    fn check_f32(&self, region: Region) -> Result<(), MemoryError> {
        self.check_bounds(region)?;
        check_f32_layout(region)
    }
}

impl std::fmt::Debug for ResourcePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePool")
            .field("capacity", &self.capacity)
            .field("alignment", &self.alignment)
            .field("used_bytes", &self.offset)
            .field("high_water_bytes", &self.high_water)
            .finish()
    }
}

/// Read-only access to every pool region except the one being written.
///
/// Obtained from [`ResourcePool::split_for_write`].
pub struct PoolReader<'a> {
    base: *const u8,
    capacity: usize,
    excluded: Region,
    _pool: PhantomData<&'a [u8]>,
}

impl<'a> PoolReader<'a> {
    /// Views `region` as `f32` elements.
    pub fn f32_slice(&self, region: Region) -> Result<&'a [f32], MemoryError> {
        check_bounds(region, self.capacity)?;
        check_f32_layout(region)?;
        if region.overlaps(&self.excluded) {
            return Err(MemoryError::Overlap {
                read: region,
                write: self.excluded,
            });
        }
        // SAFETY: in bounds, aligned, and disjoint from the only mutable
        // view handed out alongside this reader.
        Ok(unsafe {
            std::slice::from_raw_parts(self.base.add(region.offset) as *const f32, region.len / 4)
        })
    }
}

fn check_bounds(region: Region, capacity: usize) -> Result<(), MemoryError> {
    match region.offset.checked_add(region.len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(MemoryError::OutOfBounds {
            region,
            capacity_bytes: capacity,
        }),
    }
}

fn check_f32_layout(region: Region) -> Result<(), MemoryError> {
    if region.offset % 4 != 0 || region.len % 4 != 0 {
        return Err(MemoryError::MisalignedView { region });
    }
    Ok(())
}

/// Rounds `offset` up to the next multiple of `alignment` (a power of two).
fn align_up(offset: usize, alignment: usize) -> usize {
    (offset + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(bytes: usize) -> ResourcePool {
        ResourcePool::new(PoolBudget::from_bytes(bytes)).unwrap()
    }

    #[test]
    fn test_base_is_aligned() {
        let p = pool(64);
        assert_eq!(p.base_ptr() as usize % POOL_ALIGNMENT, 0);
    }

    #[test]
    fn test_carve_respects_alignment() {
        let mut p = pool(256);
        let a = p.carve(4).unwrap();
        let b = p.carve(40).unwrap();
        let c = p.carve(1).unwrap();
        assert_eq!(a.offset, 0);
        assert_eq!(b.offset, 16);
        assert_eq!(c.offset, 64);
        assert!(!a.overlaps(&b) && !b.overlaps(&c));
    }

    #[test]
    fn test_smaller_alignment() {
        let mut p = ResourcePool::with_alignment(PoolBudget::from_bytes(64), 4).unwrap();
        p.carve(4).unwrap();
        assert_eq!(p.carve(8).unwrap().offset, 4);
    }

    #[test]
    fn test_unsupported_alignment() {
        for alignment in [0, 1, 2, 3, 32] {
            assert!(matches!(
                ResourcePool::with_alignment(PoolBudget::from_bytes(64), alignment),
                Err(MemoryError::UnsupportedAlignment { .. })
            ));
        }
    }

    #[test]
    fn test_sub_f32_alignment_rejected() {
        let err = ResourcePool::with_alignment(PoolBudget::from_bytes(64), 2)
            .err()
            .unwrap();
        assert_eq!(
            err,
            MemoryError::UnsupportedAlignment {
                alignment: 2,
                min: 4,
                max: 16
            }
        );
        assert!(err.to_string().contains("between 4 and 16"));
    }

    #[test]
    fn test_zero_capacity() {
        assert!(matches!(
            ResourcePool::new(PoolBudget::from_bytes(0)),
            Err(MemoryError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_exhaustion_leaves_pool_untouched() {
        let mut p = pool(64);
        p.carve(40).unwrap();
        let err = p.carve(20).unwrap_err();
        assert_eq!(
            err,
            MemoryError::PoolExhausted {
                requested_bytes: 20,
                offset: 48,
                available_bytes: 16,
                capacity_bytes: 64,
            }
        );
        assert_eq!(p.used_bytes(), 40);
    }

    #[test]
    fn test_exact_fit() {
        let mut p = pool(32);
        p.carve(16).unwrap();
        p.carve(16).unwrap();
        assert_eq!(p.available_bytes(), 0);
    }

    #[test]
    fn test_checkpoint_restore_zeroes() {
        let mut p = pool(64);
        let keep = p.carve(16).unwrap();
        let cp = p.checkpoint();
        let tmp = p.carve(16).unwrap();
        p.bytes_mut(tmp).unwrap().fill(0xAB);
        p.restore(cp);
        assert_eq!(p.used_bytes(), 16);
        let again = p.carve(16).unwrap();
        assert_eq!(again, tmp);
        assert!(p.bytes(again).unwrap().iter().all(|&b| b == 0));
        assert_eq!(p.bytes(keep).unwrap().len(), 16);
    }

    #[test]
    fn test_high_water_survives_reset() {
        let mut p = pool(128);
        p.carve(100).unwrap();
        p.reset();
        assert_eq!(p.used_bytes(), 0);
        assert_eq!(p.high_water_bytes(), 100);
    }

    #[test]
    fn test_f32_roundtrip() {
        let mut p = pool(64);
        let r = p.carve(16).unwrap();
        p.f32_slice_mut(r).unwrap().copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(p.f32_slice(r).unwrap(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_f32_misaligned() {
        let p = pool(64);
        assert!(matches!(
            p.f32_slice(Region::new(2, 8)),
            Err(MemoryError::MisalignedView { .. })
        ));
        assert!(matches!(
            p.f32_slice(Region::new(0, 6)),
            Err(MemoryError::MisalignedView { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds() {
        let p = pool(64);
        assert!(matches!(
            p.bytes(Region::new(60, 8)),
            Err(MemoryError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_split_for_write() {
        let mut p = pool(64);
        let input = p.carve(8).unwrap();
        let output = p.carve(8).unwrap();
        p.f32_slice_mut(input).unwrap().copy_from_slice(&[2.0, 3.0]);

        let (reader, out) = p.split_for_write(output).unwrap();
        let src = reader.f32_slice(input).unwrap();
        out[0] = src[0] * 10.0;
        out[1] = src[1] * 10.0;
        assert!(matches!(
            reader.f32_slice(output),
            Err(MemoryError::Overlap { .. })
        ));

        assert_eq!(p.f32_slice(output).unwrap(), &[20.0, 30.0]);
    }

    #[test]
    fn test_debug_format() {
        let debug = format!("{:?}", pool(64));
        assert!(debug.contains("ResourcePool"));
        assert!(debug.contains("capacity"));
    }
}
