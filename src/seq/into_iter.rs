// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::{fmt, ptr, slice};
use core::iter::FusedIterator;
use crate::raw::RawStorage;

/// An iterator yielding the values of a [`Sequence`](super::Sequence) by value.
///
/// Values not yet yielded are dropped with the iterator, which then releases the buffer.
pub struct IntoIter<T> {
	storage: RawStorage<T>,
	start: usize,
	end: usize,
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
	}
}

impl<T> IntoIter<T> {
	/// Takes ownership of `storage`, whose slots `0..len` hold live values.
	pub(super) fn new(storage: RawStorage<T>, len: usize) -> Self {
		Self { storage, start: 0, end: len }
	}

	/// Returns the remaining values as a slice.
	pub fn as_slice(&self) -> &[T] {
		// Safety: slots `start..end` hold live values.
		unsafe {
			slice::from_raw_parts(self.storage.offset(self.start).as_ptr(), self.len())
		}
	}

	/// Returns the remaining values as a mutable slice.
	pub fn as_mut_slice(&mut self) -> &mut [T] {
		// Safety: slots `start..end` hold live values.
		unsafe {
			slice::from_raw_parts_mut(self.storage.offset(self.start).as_ptr(), self.len())
		}
	}
}

impl<T> AsRef<[T]> for IntoIter<T> {
	fn as_ref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<T> Iterator for IntoIter<T> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		if self.start == self.end {
			return None
		}

		let index = self.start;
		// Advance first, so the value is never read twice.
		self.start += 1;
		// Safety: the slot was within the remaining live values, and is now out of range.
		unsafe {
			Some(self.storage.offset(index).read())
		}
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.len();
		(len, Some(len))
	}

	fn count(self) -> usize {
		self.len()
	}
}

impl<T> DoubleEndedIterator for IntoIter<T> {
	fn next_back(&mut self) -> Option<T> {
		if self.start == self.end {
			return None
		}

		self.end -= 1;
		// Safety: the slot was within the remaining live values, and is now out of range.
		unsafe {
			Some(self.storage.offset(self.end).read())
		}
	}
}

impl<T> ExactSizeIterator for IntoIter<T> {
	fn len(&self) -> usize {
		self.end - self.start
	}
}

impl<T> FusedIterator for IntoIter<T> { }

impl<T> Drop for IntoIter<T> {
	fn drop(&mut self) {
		let remaining = ptr::slice_from_raw_parts_mut(
			self.as_mut_slice().as_mut_ptr(),
			self.len()
		);
		// Even if a destructor panics, the storage field is still dropped, releasing the buffer.
		// Safety: the remaining values are live and never touched again.
		unsafe {
			ptr::drop_in_place(remaining);
		}
	}
}
