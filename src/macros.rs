// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

/// Checks an index precondition, panicking through an outlined cold function on failure so the
/// formatting machinery stays out of the hot path.
macro_rules! bounds_check {
	($cond:expr, $msg:literal, $index:expr, $len:expr) => {
		if !$cond {
			#[allow(clippy::panic)]
			#[cold]
			#[inline(never)]
			#[track_caller]
			fn assert_failed(index: usize, len: usize) -> ! {
				panic!($msg, index = index, len = len);
			}

			assert_failed($index, $len);
		}
	};
}

pub(crate) use bounds_check;
