// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use core::ptr::{self, NonNull};

pub trait TypeSize: Sized {
	const IS_ZST: bool = size_of::<Self>() == 0;
}

impl<T> TypeSize for T { }

/// Relocates `count` live elements from `src` into the raw slots at `dst`.
///
/// Moves in Rust are bitwise and cannot fail, so relocation never needs to fall back to cloning:
/// the source slots are left logically uninitialized and must not be dropped afterward.
///
/// # Safety
///
/// `src` must point to `count` live elements, `dst` to `count` raw slots, and the two ranges must
/// not overlap.
pub unsafe fn relocate<T>(src: NonNull<T>, count: usize, dst: NonNull<T>) {
	ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), count);
}
