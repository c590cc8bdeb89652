// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(
	clippy::alloc_instead_of_core,
	clippy::as_pointer_underscore,
	clippy::as_underscore,
	clippy::assertions_on_result_states,
	clippy::clone_on_ref_ptr,
	clippy::deref_by_slicing,
	clippy::else_if_without_else,
	clippy::empty_drop,
	clippy::empty_enum_variants_with_brackets,
	clippy::empty_structs_with_brackets,
	clippy::exhaustive_enums,
	clippy::if_then_some_else_none,
	clippy::infinite_loop,
	clippy::map_err_ignore,
	clippy::mem_forget,
	clippy::missing_assert_message,
	clippy::missing_errors_doc,
	clippy::missing_safety_doc,
	clippy::panic,
	clippy::partial_pub_fields,
	clippy::redundant_type_annotations,
	clippy::ref_patterns,
	clippy::renamed_function_params,
	clippy::semicolon_inside_block,
	clippy::std_instead_of_alloc,
	clippy::std_instead_of_core,
	clippy::undocumented_unsafe_blocks,
	clippy::unwrap_used,
)]

//! # `seqvec`
//!
//! `seqvec` provides [`Sequence<T>`], a contiguous, growable sequence, built on an explicit
//! [`RawStorage<T>`] of uninitialized slots. The storage only allocates and releases memory; the
//! sequence constructs and drops values at well-defined indices, so growing the capacity never
//! constructs or drops values needlessly.
//!
//! | Operation | Complexity | On failure |
//! |-----------|------------|------------|
//! | [`push`], [`emplace_back`]          | amortized *O*(1) | unchanged |
//! | indexing, [`pop`], [`swap_with`]    | *O*(1)           | cannot fail |
//! | [`emplace`], [`insert`], [`erase`]  | *O*(*n*)         | unchanged |
//! | [`reserve`], [`resize`]             | *O*(*n*)         | unchanged |
//! | [`clone`], [`with_len`]             | *O*(*n*)         | nothing leaked |
//!
//! Allocation failures are reported by the `try_*` methods as [`AllocError`], and escalated by the
//! others: capacity overflow panics, and allocator failure calls the global allocation error
//! handler.
//!
//! ```
//! use seqvec::Sequence;
//!
//! let mut seq = Sequence::new();
//! seq.push(10);
//! seq.push(20);
//! seq.push(30);
//! seq.insert(1, 15);
//! assert_eq!(*seq, [10, 15, 20, 30]);
//!
//! seq.erase(2);
//! assert_eq!(*seq, [10, 15, 30]);
//! assert_eq!(seq.capacity(), 4);
//! ```
//!
//! [`RawStorage<T>`]: raw::RawStorage
//! [`AllocError`]: error::AllocError
//! [`push`]: Sequence::push
//! [`emplace_back`]: Sequence::emplace_back
//! [`pop`]: Sequence::pop
//! [`swap_with`]: Sequence::swap_with
//! [`emplace`]: Sequence::emplace
//! [`insert`]: Sequence::insert
//! [`erase`]: Sequence::erase
//! [`reserve`]: Sequence::reserve
//! [`resize`]: Sequence::resize
//! [`clone`]: Clone::clone
//! [`with_len`]: Sequence::with_len

extern crate alloc;

pub mod error;
mod internal;
mod macros;
pub mod raw;
pub mod seq;

pub use seq::Sequence;

pub mod prelude {
	pub use crate::error::AllocError;
	pub use crate::raw::RawStorage;
	pub use crate::seq::Sequence;
	pub use crate::seq::into_iter::IntoIter;
}
