// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::ptr::{self, NonNull};
use crate::error::{AllocError, Result};
use crate::internal::relocate;
use crate::raw::RawStorage;
use super::Sequence;

impl<T> Sequence<T> {
	/// Writes `value` into the first raw slot and increments the length.
	///
	/// # Safety
	///
	/// The sequence must not be full.
	pub(super) unsafe fn push_unchecked(&mut self, value: T) {
		debug_assert!(self.len < self.capacity(), "sequence should not be full");
		self.storage.offset(self.len).write(value);
		self.len += 1;
	}

	/// Appends `count` values returned by `fill` into raw slots. If `fill` panics, the values
	/// appended so far are dropped and the length is restored.
	///
	/// The capacity must already fit `count` more values.
	pub(super) fn extend_with<F: FnMut() -> T>(&mut self, count: usize, mut fill: F) {
		struct DropGuard<'a, T> {
			seq: &'a mut Sequence<T>,
			original_len: usize,
		}

		impl<T> Drop for DropGuard<'_, T> {
			fn drop(&mut self) {
				self.seq.truncate(self.original_len);
			}
		}

		assert!(
			count <= self.capacity() - self.len,
			"extension of {count} values should fit the spare capacity"
		);

		let mut g = DropGuard { original_len: self.len, seq: self };
		for _ in 0..count {
			// Safety: the spare capacity was checked to fit `count` values.
			unsafe {
				g.seq.push_unchecked(fill());
			}
		}
		// Commit the new values.
		g.original_len = g.seq.len;
	}

	/// The capacity to grow to when appending to a full sequence.
	fn grown_capacity(&self) -> Result<usize> {
		match self.len {
			0 => Ok(1),
			len => len.checked_mul(2).ok_or(AllocError::CapacityOverflow)
		}
	}

	/// Moves the values into a new buffer of exactly `new_capacity` slots.
	pub(super) fn reallocate(&mut self, new_capacity: usize) -> Result {
		debug_assert!(new_capacity >= self.len, "reallocation should not drop values");
		let mut storage = RawStorage::try_with_capacity(new_capacity)?;
		// Safety: the new buffer has room for all live values, and does not overlap the old one.
		unsafe {
			relocate(self.storage.as_non_null(), self.len, storage.as_non_null());
		}
		log::trace!(
			"relocated {} values from {} to {new_capacity} slots",
			self.len,
			self.capacity(),
		);
		// The old buffer is released with `storage`, its slots now logically uninitialized.
		self.storage.swap(&mut storage);
		Ok(())
	}

	/// Inserts the value returned by `f` at `index` into a new, larger buffer.
	///
	/// The value is written into the new buffer before any value is relocated, so `f` sees the
	/// current values intact. If allocation fails or `f` panics, the sequence is unchanged.
	pub(super) fn grow_emplace<F: FnOnce(&[T]) -> T>(&mut self, index: usize, f: F) -> Result<NonNull<T>> {
		let len = self.len;
		let mut storage = RawStorage::try_with_capacity(self.grown_capacity()?)?;

		// Safety: `index <= len`, which is less than the grown capacity.
		let slot = unsafe { storage.offset(index) };
		let value = f(self.as_slice());

		// Safety: `slot` is a raw slot in the new buffer. The values before `index` land in front
		//  of it, the rest immediately after it. The buffers do not overlap.
		unsafe {
			slot.write(value);
			let src = self.storage.as_non_null();
			relocate(src, index, storage.as_non_null());
			relocate(src.add(index), len - index, slot.add(1));
		}

		log::trace!(
			"grew from {} to {} slots inserting at {index} of {len}",
			self.capacity(),
			storage.capacity(),
		);
		self.storage.swap(&mut storage);
		self.len = len + 1;
		Ok(slot)
	}

	/// Inserts the value returned by `f` at `index` into spare capacity.
	///
	/// The value is produced before the tail is shifted, so `f` may read any current value.
	pub(super) fn emplace_in_place<F: FnOnce(&[T]) -> T>(&mut self, index: usize, f: F) -> NonNull<T> {
		let len = self.len;
		debug_assert!(len < self.capacity(), "sequence should not be full");
		let value = f(self.as_slice());

		// Safety: `index <= len < capacity`. The tail `index..len` moves one slot toward the back,
		//  into the raw slot at `len`, leaving a stale duplicate at `index` which is overwritten.
		unsafe {
			let slot = self.storage.offset(index);
			if index < len {
				ptr::copy(slot.as_ptr(), slot.as_ptr().add(1), len - index);
			}
			slot.write(value);
			self.len = len + 1;
			slot
		}
	}
}
