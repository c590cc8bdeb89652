// Copyright 2025 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::alloc::handle_alloc_error;
use core::alloc::{Layout, LayoutError};
use thiserror::Error;

pub type Result<T = (), E = AllocError> = core::result::Result<T, E>;

/// An error returned when raw storage could not be obtained.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum AllocError {
	/// The requested capacity does not fit in `isize::MAX` bytes, or computing it overflowed.
	#[error("capacity overflow")]
	CapacityOverflow,
	/// The allocator refused to provide memory for `layout`.
	#[error("memory allocation of {} bytes failed", .layout.size())]
	Alloc {
		layout: Layout
	},
}

impl AllocError {
	/// Escalates the error, either panicking on overflow or calling the global allocation error
	/// handler.
	#[allow(clippy::panic)]
	#[cold]
	#[inline(never)]
	#[track_caller]
	pub fn handle(self) -> ! {
		log::error!("unrecoverable storage error: {self}");
		match self {
			Self::CapacityOverflow => panic!("capacity overflow"),
			Self::Alloc { layout } => handle_alloc_error(layout)
		}
	}
}

impl From<LayoutError> for AllocError {
	fn from(_: LayoutError) -> Self {
		Self::CapacityOverflow
	}
}

#[cfg(test)]
mod tests {
	use alloc::string::ToString;
	use core::alloc::Layout;
	use super::AllocError;

	#[test]
	fn display() {
		assert_eq!(AllocError::CapacityOverflow.to_string(), "capacity overflow");
		let layout = Layout::new::<[u64; 4]>();
		assert_eq!(
			AllocError::Alloc { layout }.to_string(),
			"memory allocation of 32 bytes failed"
		);
	}

	#[test]
	fn layout_error_is_overflow() {
		let err = Layout::array::<u64>(usize::MAX).unwrap_err();
		assert_eq!(AllocError::from(err), AllocError::CapacityOverflow);
	}

	#[test]
	#[should_panic = "capacity overflow"]
	fn overflow_handler_panics() {
		AllocError::CapacityOverflow.handle();
	}
}
