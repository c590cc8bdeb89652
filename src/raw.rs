// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

//! Untyped slot storage for sequences.
//!
//! A [`RawStorage`] owns a buffer with room for `capacity` values of `T`, but never constructs or
//! drops any of them. Tracking which slots hold live values is left to the owner.

use alloc::alloc::{alloc, dealloc};
use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::mem::{self, MaybeUninit};
use core::ops::{Index, IndexMut};
use core::ptr::NonNull;
use core::slice;
use crate::error::{AllocError, Result};
use crate::internal::TypeSize;

/// A buffer of uninitialized slots for values of `T`.
///
/// A storage with zero capacity holds no allocation; its pointer is dangling but well-aligned.
/// Storage for zero-sized types never allocates, whatever its capacity.
pub struct RawStorage<T> {
	ptr: NonNull<T>,
	cap: usize,
	_t: PhantomData<T>,
}

// Safety: the storage uniquely owns its buffer, like `Box<[MaybeUninit<T>]>`.
unsafe impl<T: Send> Send for RawStorage<T> { }
// Safety: shared access only hands out shared slot references.
unsafe impl<T: Sync> Sync for RawStorage<T> { }

impl<T> RawStorage<T> {
	/// Creates an empty storage without allocating.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			ptr: NonNull::dangling(),
			cap: 0,
			_t: PhantomData,
		}
	}

	/// Allocates storage for `capacity` slots.
	///
	/// # Panics
	///
	/// Panics if the capacity exceeds `isize::MAX` bytes. Aborts through the global allocation
	/// error handler if the allocator fails.
	#[must_use]
	#[track_caller]
	pub fn with_capacity(capacity: usize) -> Self {
		match Self::try_with_capacity(capacity) {
			Ok(storage) => storage,
			Err(err) => err.handle()
		}
	}

	/// Allocates storage for `capacity` slots, returning an error if the allocation fails.
	///
	/// # Errors
	///
	/// Returns [`AllocError::CapacityOverflow`] if the capacity exceeds `isize::MAX` bytes, or
	/// [`AllocError::Alloc`] if the allocator returns null.
	pub fn try_with_capacity(capacity: usize) -> Result<Self> {
		if capacity == 0 {
			return Ok(Self::new())
		}

		let layout = layout::<T>(capacity)?;
		if T::IS_ZST {
			return Ok(Self { ptr: NonNull::dangling(), cap: capacity, _t: PhantomData })
		}

		// Safety: the layout has a non-zero size, as `T` is sized and `capacity` is non-zero.
		let ptr = unsafe { alloc(layout) };
		let Some(ptr) = NonNull::new(ptr.cast::<T>()) else {
			return Err(AllocError::Alloc { layout })
		};

		Ok(Self { ptr, cap: capacity, _t: PhantomData })
	}

	/// Returns the number of slots.
	pub const fn capacity(&self) -> usize {
		self.cap
	}

	/// Returns `true` if the slots are backed by an allocation.
	pub const fn is_allocated(&self) -> bool {
		self.cap != 0 && !T::IS_ZST
	}

	/// Returns a pointer to the first slot. The pointer dangles if nothing is allocated.
	pub const fn as_ptr(&self) -> *const T {
		self.ptr.as_ptr()
	}

	/// Returns a mutable pointer to the first slot. The pointer dangles if nothing is allocated.
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.ptr.as_ptr()
	}

	pub(crate) const fn as_non_null(&self) -> NonNull<T> {
		self.ptr
	}

	/// Returns a pointer to the slot at `offset`. The one-past-the-end slot, `offset == capacity`,
	/// may be addressed but not dereferenced.
	///
	/// # Safety
	///
	/// `offset` must be at most [`capacity`](Self::capacity).
	pub unsafe fn offset(&self, offset: usize) -> NonNull<T> {
		debug_assert!(offset <= self.cap, "slot offset (is {offset}) should be <= capacity (is {})", self.cap);
		self.ptr.add(offset)
	}

	/// Returns all slots as a slice of possibly uninitialized values.
	pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
		// Safety: the buffer holds `cap` slots, and `MaybeUninit` places no requirement on
		//  their contents.
		unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.cap) }
	}

	/// Returns all slots as a mutable slice of possibly uninitialized values.
	pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
		// Safety: the buffer holds `cap` slots, and `MaybeUninit` places no requirement on
		//  their contents.
		unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.cap) }
	}

	/// Exchanges the buffer and capacity with another storage.
	pub fn swap(&mut self, other: &mut Self) {
		mem::swap(self, other);
	}

	/// Moves the buffer out, leaving an empty storage behind.
	#[must_use]
	pub fn take(&mut self) -> Self {
		mem::take(self)
	}
}

/// Computes the buffer layout for `capacity` slots of `T`.
pub(crate) fn layout<T>(capacity: usize) -> Result<Layout> {
	let layout = Layout::array::<T>(capacity)?;
	check_size(layout.size())?;
	Ok(layout)
}

pub(crate) fn check_size(size: usize) -> Result {
	if usize::BITS < 64 && size > isize::MAX as usize {
		Err(AllocError::CapacityOverflow)
	} else {
		Ok(())
	}
}

impl<T> Drop for RawStorage<T> {
	fn drop(&mut self) {
		if !self.is_allocated() { return }

		// Safety: the layout was computed from this capacity when the buffer was allocated.
		unsafe {
			let layout = Layout::array::<T>(self.cap).unwrap_unchecked();
			dealloc(self.ptr.as_ptr().cast(), layout);
		}
	}
}

impl<T> Default for RawStorage<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Index<usize> for RawStorage<T> {
	type Output = MaybeUninit<T>;

	fn index(&self, index: usize) -> &MaybeUninit<T> {
		&self.as_uninit_slice()[index]
	}
}

impl<T> IndexMut<usize> for RawStorage<T> {
	fn index_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
		&mut self.as_uninit_slice_mut()[index]
	}
}

impl<T> fmt::Debug for RawStorage<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RawStorage")
		 .field("ptr", &self.ptr)
		 .field("capacity", &self.cap)
		 .finish()
	}
}

#[cfg(test)]
mod tests {
	use core::cell::Cell;
	use super::RawStorage;
	use crate::error::AllocError;

	#[test]
	fn default_is_empty() {
		let storage = RawStorage::<u32>::default();
		assert_eq!(storage.capacity(), 0);
		assert!(!storage.is_allocated());
		assert!(storage.as_uninit_slice().is_empty());
	}

	#[test]
	fn zero_capacity_does_not_allocate() {
		let storage = RawStorage::<String>::with_capacity(0);
		assert_eq!(storage.capacity(), 0);
		assert!(!storage.is_allocated());
	}

	#[test]
	fn slots_are_writable() {
		let mut storage = RawStorage::<u64>::with_capacity(4);
		assert_eq!(storage.capacity(), 4);
		assert!(storage.is_allocated());
		assert_eq!(storage.as_ptr() as usize % align_of::<u64>(), 0);

		for i in 0..4 {
			storage[i].write(i as u64 * 10);
		}
		// Safety: every slot was just written.
		let values: Vec<u64> = (0..4).map(|i| unsafe { storage[i].assume_init() }).collect();
		assert_eq!(values, [0, 10, 20, 30]);
	}

	#[test]
	fn offset_addresses_slots() {
		let storage = RawStorage::<u16>::with_capacity(3);
		// Safety: both offsets are within `0..=capacity`.
		let (first, end) = unsafe { (storage.offset(0), storage.offset(3)) };
		assert_eq!(first.as_ptr().cast_const(), storage.as_ptr());
		assert_eq!(end.as_ptr() as usize - first.as_ptr() as usize, 3 * size_of::<u16>());
	}

	#[test]
	#[should_panic]
	fn index_past_capacity_panics() {
		let storage = RawStorage::<u8>::with_capacity(2);
		let _ = &storage[2];
	}

	#[test]
	fn take_leaves_empty() {
		let mut a = RawStorage::<i32>::with_capacity(8);
		let ptr = a.as_ptr();
		let b = a.take();
		assert_eq!(a.capacity(), 0);
		assert!(!a.is_allocated());
		assert_eq!(b.capacity(), 8);
		assert_eq!(b.as_ptr(), ptr);
	}

	#[test]
	fn swap_exchanges_buffers() {
		let mut a = RawStorage::<i32>::with_capacity(2);
		let mut b = RawStorage::<i32>::with_capacity(5);
		let (pa, pb) = (a.as_ptr(), b.as_ptr());
		a.swap(&mut b);
		assert_eq!((a.capacity(), a.as_ptr()), (5, pb));
		assert_eq!((b.capacity(), b.as_ptr()), (2, pa));
	}

	#[test]
	fn zero_sized_slots() {
		let storage = RawStorage::<()>::with_capacity(usize::MAX);
		assert_eq!(storage.capacity(), usize::MAX);
		assert!(!storage.is_allocated());
	}

	#[test]
	fn overflow_is_reported() {
		assert_eq!(
			RawStorage::<u64>::try_with_capacity(usize::MAX).unwrap_err(),
			AllocError::CapacityOverflow
		);
		assert_eq!(
			RawStorage::<u8>::try_with_capacity(isize::MAX as usize + 1).unwrap_err(),
			AllocError::CapacityOverflow
		);
	}

	#[test]
	fn never_drops_slot_contents() {
		struct Loud<'a>(&'a Cell<usize>);

		impl Drop for Loud<'_> {
			fn drop(&mut self) {
				self.0.set(self.0.get() + 1);
			}
		}

		let drops = Cell::new(0);
		let mut storage = RawStorage::with_capacity(2);
		storage[0].write(Loud(&drops));
		storage[1].write(Loud(&drops));
		drop(storage);
		assert_eq!(drops.get(), 0);
	}
}
