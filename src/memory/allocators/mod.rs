//! # Memory Allocators
//!
//! One allocator is enough here: a bump allocator that reclaims the whole
//! region once every allocation has been returned. Fast, simple, and all the
//! kernel currently needs.

pub mod bump;

pub use bump::LockedBumpAllocator;
