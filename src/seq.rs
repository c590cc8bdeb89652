// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

//! # Storage and Element Lifetimes
//!
//! A [`Sequence`] separates *having room* for values from *holding* values. Its [`RawStorage`]
//! owns `capacity` raw slots; the sequence itself tracks a length, `len`, and guarantees that
//! exactly the slots `0..len` hold live values. Growing the capacity moves live values into a new
//! buffer without constructing or dropping anything else.
//!
//! ```text
//!  0                len           capacity
//! |-----------------|-----------------|
//! |   live values   |    raw slots    |
//! |-----------------|-----------------|
//! ```
//!
//! # Growth
//!
//! Appending or inserting into a full sequence reallocates to double its length, or to a single
//! slot when empty. Values are relocated by moving, which cannot fail, so growth never clones and
//! works for any element type. If the new value is produced by a closure, it is produced before
//! anything is relocated: a panicking closure leaves the sequence as it was.
//!
//! [`RawStorage`]: crate::raw::RawStorage

use core::fmt;
use core::mem::{self, ManuallyDrop};
use core::ops::{Deref, DerefMut, Range};
use core::ptr;
use core::slice::{self, Iter, IterMut};
use crate::error::Result;
use crate::macros::bounds_check;
use crate::raw::RawStorage;
use into_iter::IntoIter;

pub mod into_iter;
mod internal;

/// A contiguous, growable sequence of values.
pub struct Sequence<T> {
	storage: RawStorage<T>,
	len: usize,
}

impl<T> Sequence<T> {
	/// Creates a new, empty sequence. No memory is allocated until values are added.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let seq: Sequence<i32> = Sequence::new();
	/// assert_eq!(seq.len(), 0);
	/// assert_eq!(seq.capacity(), 0);
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			storage: RawStorage::new(),
			len: 0,
		}
	}

	/// Creates an empty sequence with room for exactly `capacity` values.
	///
	/// # Panics
	///
	/// Panics if the capacity exceeds `isize::MAX` bytes.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::with_capacity(10);
	/// assert_eq!(seq.capacity(), 10);
	///
	/// for i in 0..10 {
	///     seq.push(i);
	/// }
	/// // No reallocation was needed
	/// assert_eq!(seq.capacity(), 10);
	/// ```
	#[must_use]
	#[track_caller]
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			storage: RawStorage::with_capacity(capacity),
			len: 0,
		}
	}

	/// Creates an empty sequence with room for exactly `capacity` values, returning an error if
	/// the allocation fails.
	///
	/// # Errors
	///
	/// Returns an error if the capacity exceeds `isize::MAX` bytes or the allocator fails.
	pub fn try_with_capacity(capacity: usize) -> Result<Self> {
		Ok(Self {
			storage: RawStorage::try_with_capacity(capacity)?,
			len: 0,
		})
	}

	/// Creates a sequence of `len` default values, with a capacity of exactly `len`.
	///
	/// If a default constructor panics, the values already constructed are dropped and the memory
	/// is released before the panic continues.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let seq: Sequence<u8> = Sequence::with_len(3);
	/// assert_eq!(*seq, [0, 0, 0]);
	/// assert_eq!(seq.capacity(), 3);
	/// ```
	#[must_use]
	#[track_caller]
	pub fn with_len(len: usize) -> Self
	where
		T: Default
	{
		Self::from_fn(len, |_| T::default())
	}

	/// Creates a sequence of `len` values, each returned by `f` called with its index.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let seq = Sequence::from_fn(4, |i| i * i);
	/// assert_eq!(*seq, [0, 1, 4, 9]);
	/// ```
	#[must_use]
	#[track_caller]
	pub fn from_fn<F: FnMut(usize) -> T>(len: usize, mut f: F) -> Self {
		let mut seq = Self::with_capacity(len);
		// If `f` panics, dropping `seq` drops the prefix built so far and frees the buffer.
		for i in 0..len {
			// Safety: the capacity is `len`, so there is always a free slot.
			unsafe {
				seq.push_unchecked(f(i));
			}
		}
		seq
	}

	/// Returns the number of values in the sequence.
	pub const fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the sequence holds no values.
	pub const fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Returns the number of values the sequence can hold without reallocating.
	pub const fn capacity(&self) -> usize {
		self.storage.capacity()
	}

	/// Returns a slice of the values.
	pub fn as_slice(&self) -> &[T] {
		// Safety: slots `0..len` hold live values.
		unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
	}

	/// Returns a mutable slice of the values.
	pub fn as_mut_slice(&mut self) -> &mut [T] {
		// Safety: slots `0..len` hold live values.
		unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
	}

	/// Returns a pointer to the first slot. The pointer dangles if nothing is allocated, and is
	/// invalidated by any reallocation.
	pub const fn as_ptr(&self) -> *const T {
		self.storage.as_ptr()
	}

	/// Returns a mutable pointer to the first slot. The pointer dangles if nothing is allocated,
	/// and is invalidated by any reallocation.
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.storage.as_mut_ptr()
	}

	/// Returns the half-open range of pointers spanning the values, from the first slot to one
	/// past the last value.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let seq = Sequence::from([1u32, 2, 3]);
	/// let range = seq.as_ptr_range();
	/// assert_eq!(range.start, seq.as_ptr());
	/// // Safety: both pointers are derived from the same buffer.
	/// assert_eq!(unsafe { range.end.offset_from(range.start) }, 3);
	/// ```
	pub fn as_ptr_range(&self) -> Range<*const T> {
		self.as_slice().as_ptr_range()
	}

	/// Ensures the capacity is at least `new_capacity`, reallocating to exactly `new_capacity` if
	/// it is currently smaller. Unlike [`Vec::reserve`], the argument is the total capacity, not an
	/// additional count. Nothing happens if the capacity is already large enough.
	///
	/// # Panics
	///
	/// Panics if the new capacity exceeds `isize::MAX` bytes.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::from([1]);
	/// seq.reserve(10);
	/// assert_eq!(seq.capacity(), 10);
	/// // Smaller requests are ignored
	/// seq.reserve(4);
	/// assert_eq!(seq.capacity(), 10);
	/// ```
	///
	/// [`Vec::reserve`]: alloc::vec::Vec::reserve
	#[track_caller]
	pub fn reserve(&mut self, new_capacity: usize) {
		if let Err(err) = self.try_reserve(new_capacity) {
			err.handle();
		}
	}

	/// Ensures the capacity is at least `new_capacity`, returning an error if the allocation
	/// fails. The sequence is unchanged on error.
	///
	/// # Errors
	///
	/// Returns an error if the new capacity exceeds `isize::MAX` bytes or the allocator fails.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	/// use seqvec::error::AllocError;
	///
	/// let mut seq = Sequence::from([1u64, 2]);
	/// assert_eq!(seq.try_reserve(usize::MAX), Err(AllocError::CapacityOverflow));
	/// assert_eq!(*seq, [1, 2]);
	/// ```
	pub fn try_reserve(&mut self, new_capacity: usize) -> Result {
		if new_capacity <= self.capacity() {
			return Ok(())
		}
		self.reallocate(new_capacity)
	}

	/// Resizes the sequence to `new_len`, dropping values past the new length or appending default
	/// values to fill it.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::from([1, 2, 3]);
	/// seq.resize(5);
	/// assert_eq!(*seq, [1, 2, 3, 0, 0]);
	/// seq.resize(2);
	/// assert_eq!(*seq, [1, 2]);
	/// ```
	#[track_caller]
	pub fn resize(&mut self, new_len: usize)
	where
		T: Default
	{
		self.resize_with(new_len, T::default);
	}

	/// Resizes the sequence to `new_len`, dropping values past the new length or filling it with
	/// values returned by `fill`.
	///
	/// When growing, the capacity is first raised to at least `new_len`. If `fill` panics, the
	/// values appended so far are dropped and the length is restored.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::new();
	/// let mut next = 0;
	/// seq.resize_with(3, || { next += 1; next });
	/// assert_eq!(*seq, [1, 2, 3]);
	/// ```
	#[track_caller]
	pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, fill: F) {
		if new_len <= self.len {
			self.truncate(new_len);
			return
		}

		self.reserve(new_len);
		self.extend_with(new_len - self.len, fill);
	}

	/// Shortens the sequence to `len`, dropping the values past it. Has no effect if `len` is not
	/// less than the current length. The capacity is unchanged.
	pub fn truncate(&mut self, len: usize) {
		if len >= self.len {
			return
		}

		let count = self.len - len;
		// Safety: `len` is less than the current length, which is at most the capacity.
		let tail = unsafe { self.storage.offset(len) };
		// Set the length first, so a panicking destructor cannot cause a double drop.
		self.len = len;
		// Safety: the slots `len..len + count` held live values, which are no longer reachable.
		unsafe {
			ptr::drop_in_place(ptr::slice_from_raw_parts_mut(tail.as_ptr(), count));
		}
	}

	/// Drops all values. The capacity is unchanged.
	pub fn clear(&mut self) {
		self.truncate(0);
	}

	/// Appends a value to the back of the sequence.
	///
	/// # Panics
	///
	/// Panics if the grown capacity exceeds `isize::MAX` bytes.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::new();
	/// seq.push(1);
	/// seq.push(2);
	/// seq.push(3);
	/// assert_eq!(*seq, [1, 2, 3]);
	/// assert_eq!(seq.capacity(), 4);
	/// ```
	#[track_caller]
	pub fn push(&mut self, value: T) {
		self.emplace_back(value);
	}

	/// Appends a clone of `value` to the back of the sequence.
	#[track_caller]
	pub fn push_cloned(&mut self, value: &T)
	where
		T: Clone
	{
		self.push(value.clone());
	}

	/// Appends a value to the back of the sequence, returning a reference to it.
	#[track_caller]
	pub fn emplace_back(&mut self, value: T) -> &mut T {
		self.emplace_with(self.len, |_| value)
	}

	/// Appends the value returned by `f` to the back of the sequence, returning a reference to it.
	///
	/// `f` receives the current values and runs before the sequence is modified, so the new value
	/// may be built from existing ones.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::from([String::from("seven")]);
	/// seq.emplace_back_with(|values| values[0].clone());
	/// assert_eq!(*seq, ["seven", "seven"]);
	/// ```
	#[track_caller]
	pub fn emplace_back_with<F: FnOnce(&[T]) -> T>(&mut self, f: F) -> &mut T {
		self.emplace_with(self.len, f)
	}

	/// Removes the last value and returns it, or `None` if the sequence is empty.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::from([1, 2]);
	/// assert_eq!(seq.pop(), Some(2));
	/// assert_eq!(seq.pop(), Some(1));
	/// assert_eq!(seq.pop(), None);
	/// ```
	pub fn pop(&mut self) -> Option<T> {
		if self.len == 0 {
			return None
		}

		self.len -= 1;
		// Safety: the slot at the old last index held a live value, which is now unreachable.
		unsafe {
			Some(self.storage.offset(self.len).read())
		}
	}

	/// Inserts `value` at `index`, shifting all values after it toward the back. Returns a
	/// reference to the inserted value.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::from(['a', 'c']);
	/// seq.emplace(1, 'b');
	/// assert_eq!(*seq, ['a', 'b', 'c']);
	/// seq.emplace(3, 'd');
	/// assert_eq!(*seq, ['a', 'b', 'c', 'd']);
	/// ```
	#[track_caller]
	pub fn emplace(&mut self, index: usize, value: T) -> &mut T {
		self.emplace_with(index, |_| value)
	}

	/// Inserts the value returned by `f` at `index`, shifting all values after it toward the back.
	/// Returns a reference to the inserted value.
	///
	/// `f` receives the current values and runs before any value is moved, so the new value may
	/// be built from existing ones. If `f` panics, the sequence is unchanged.
	///
	/// # Panics
	///
	/// Panics if `index > len`, or if the grown capacity exceeds `isize::MAX` bytes.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::from([1, 3]);
	/// seq.emplace_with(1, |values| values[0] + values[1] - 2);
	/// assert_eq!(*seq, [1, 2, 3]);
	/// ```
	#[track_caller]
	pub fn emplace_with<F: FnOnce(&[T]) -> T>(&mut self, index: usize, f: F) -> &mut T {
		match self.try_emplace_with(index, f) {
			Ok(value) => value,
			Err(err) => err.handle()
		}
	}

	/// Inserts the value returned by `f` at `index`, returning an error if growing the sequence
	/// fails. On error, `f` is not called and the sequence is unchanged.
	///
	/// # Errors
	///
	/// Returns an error if the grown capacity exceeds `isize::MAX` bytes or the allocator fails.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	#[track_caller]
	pub fn try_emplace_with<F: FnOnce(&[T]) -> T>(&mut self, index: usize, f: F) -> Result<&mut T> {
		let len = self.len;
		bounds_check!(index <= len, "insertion index (is {index}) should be <= len (is {len})", index, len);

		let mut slot = if len == self.capacity() {
			self.grow_emplace(index, f)?
		} else {
			self.emplace_in_place(index, f)
		};
		// Safety: the slot now holds the inserted value, borrowed for as long as `self`.
		unsafe {
			Ok(slot.as_mut())
		}
	}

	/// Inserts `value` at `index`, shifting all values after it toward the back. Returns a
	/// reference to the inserted value.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	#[track_caller]
	pub fn insert(&mut self, index: usize, value: T) -> &mut T {
		self.emplace(index, value)
	}

	/// Inserts a clone of `value` at `index`, shifting all values after it toward the back.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	#[track_caller]
	pub fn insert_cloned(&mut self, index: usize, value: &T) -> &mut T
	where
		T: Clone
	{
		self.emplace(index, value.clone())
	}

	/// Removes and returns the value at `index`, shifting all values after it toward the front.
	///
	/// # Panics
	///
	/// Panics if `index >= len`.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::from([1, 2, 3]);
	/// assert_eq!(seq.remove(1), 2);
	/// assert_eq!(*seq, [1, 3]);
	/// ```
	#[track_caller]
	pub fn remove(&mut self, index: usize) -> T {
		let len = self.len;
		bounds_check!(index < len, "removal index (is {index}) should be < len (is {len})", index, len);

		// Safety: `index` is within the live values. The value is read out, then the tail is
		//  shifted over its slot, leaving the last slot as a stale duplicate outside the length.
		unsafe {
			let slot = self.storage.offset(index);
			let value = slot.read();
			ptr::copy(slot.as_ptr().add(1), slot.as_ptr(), len - index - 1);
			self.len = len - 1;
			value
		}
	}

	/// Drops the value at `index`, shifting all values after it toward the front. Returns the
	/// index of the value which took its place, equal to the new length if the last value was
	/// erased.
	///
	/// # Panics
	///
	/// Panics if `index >= len`.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut seq = Sequence::from([10, 20, 30, 40]);
	/// let next = seq.erase(2);
	/// assert_eq!(*seq, [10, 20, 40]);
	/// assert_eq!(seq[next], 40);
	/// assert_eq!(seq.erase(2), seq.len());
	/// ```
	#[track_caller]
	pub fn erase(&mut self, index: usize) -> usize {
		drop(self.remove(index));
		index
	}

	/// Exchanges the contents and capacity with another sequence.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut a = Sequence::from([1, 2]);
	/// let mut b = Sequence::with_capacity(8);
	/// a.swap_with(&mut b);
	/// assert!(a.is_empty());
	/// assert_eq!(a.capacity(), 8);
	/// assert_eq!(*b, [1, 2]);
	/// ```
	pub fn swap_with(&mut self, other: &mut Self) {
		self.storage.swap(&mut other.storage);
		mem::swap(&mut self.len, &mut other.len);
	}

	/// Moves the contents and storage out, leaving an empty sequence without capacity.
	///
	/// # Examples
	///
	/// ```
	/// use seqvec::Sequence;
	///
	/// let mut a = Sequence::from([1, 2, 3]);
	/// let b = a.take();
	/// assert_eq!(*b, [1, 2, 3]);
	/// assert!(a.is_empty());
	/// assert_eq!(a.capacity(), 0);
	/// ```
	#[must_use]
	pub fn take(&mut self) -> Self {
		mem::take(self)
	}
}

impl<T> Drop for Sequence<T> {
	fn drop(&mut self) {
		// Safety: slots `0..len` hold live values. The storage frees itself afterward.
		unsafe {
			ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.storage.as_mut_ptr(), self.len));
		}
	}
}

impl<T> Default for Sequence<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Clone> Clone for Sequence<T> {
	/// Clones the values into a new sequence with a capacity equal to the length.
	///
	/// If a clone panics, the clones made so far are dropped and the new buffer is released.
	fn clone(&self) -> Self {
		let mut seq = Self::with_capacity(self.len);
		for value in self {
			// Safety: the capacity is the source length, so there is always a free slot.
			unsafe {
				seq.push_unchecked(value.clone());
			}
		}
		seq
	}

	/// Clones the values of `source` into this sequence, reusing its storage when it can hold them.
	///
	/// When the capacity is too small, a full clone is made first and swapped in, leaving this
	/// sequence unchanged if a clone panics. Otherwise the existing values are overwritten with
	/// [`Clone::clone_from`], extra values are dropped, and missing ones are cloned into raw slots.
	fn clone_from(&mut self, source: &Self) {
		if source.len > self.capacity() {
			let mut copy = source.clone();
			self.swap_with(&mut copy);
			return
		}

		let shared = self.len.min(source.len);
		for (target, value) in self[..shared].iter_mut().zip(&source[..shared]) {
			target.clone_from(value);
		}

		if source.len < self.len {
			self.truncate(source.len);
		} else {
			for value in &source[shared..] {
				// Safety: the capacity is at least the source length.
				unsafe {
					self.push_unchecked(value.clone());
				}
			}
		}
	}
}

impl<T> Deref for Sequence<T> {
	type Target = [T];

	fn deref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<T> DerefMut for Sequence<T> {
	fn deref_mut(&mut self) -> &mut [T] {
		self.as_mut_slice()
	}
}

impl<T> AsRef<[T]> for Sequence<T> {
	fn as_ref(&self) -> &[T] {
		self
	}
}

impl<T> AsMut<[T]> for Sequence<T> {
	fn as_mut(&mut self) -> &mut [T] {
		self
	}
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl<T> FromIterator<T> for Sequence<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut seq = Self::new();
		seq.extend(iter);
		seq
	}
}

impl<T> Extend<T> for Sequence<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for value in iter {
			self.push(value);
		}
	}
}

impl<'a, T: Clone + 'a> Extend<&'a T> for Sequence<T> {
	fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
		for value in iter {
			self.push_cloned(value);
		}
	}
}

impl<T, const N: usize> From<[T; N]> for Sequence<T> {
	fn from(values: [T; N]) -> Self {
		let mut seq = Self::with_capacity(N);
		for value in values {
			// Safety: the capacity is `N`, so there is always a free slot.
			unsafe {
				seq.push_unchecked(value);
			}
		}
		seq
	}
}

impl<T> IntoIterator for Sequence<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	/// Consumes the sequence into an iterator yielding values by value.
	fn into_iter(self) -> IntoIter<T> {
		let mut seq = ManuallyDrop::new(self);
		let len = seq.len;
		IntoIter::new(seq.storage.take(), len)
	}
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Iter<'a, T> {
		self.iter()
	}
}

impl<'a, T> IntoIterator for &'a mut Sequence<T> {
	type Item = &'a mut T;
	type IntoIter = IterMut<'a, T>;

	fn into_iter(self) -> IterMut<'a, T> {
		self.iter_mut()
	}
}
