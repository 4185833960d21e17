//! # Bitrank
//!
//! A succinct static bit vector with constant-time access, rank, and select.
//!
//! The structure wraps an immutable sequence of bits and layers a compact
//! hierarchical index on top of it: 128-bit packed superblock descriptors
//! (one per 4096 bits), two sampled select caches, and a pair of L0 spans
//! for sequences beyond 2^43 bits. The index adds a few percent of overhead
//! on top of the raw bit payload and resolves every query inside a single
//! 512-bit block using hardware popcount.
//!
//! ## Quick Start
//!
//! ```
//! use bitrank::BitVec;
//!
//! // Parse a bit string ('0'/'1' bytes, anything else skipped)
//! let bv = BitVec::from_ascii(b"1000100010").build_index();
//!
//! // rank1(p): count of 1-bits in [0, p)
//! assert_eq!(bv.rank1(5), 2);
//!
//! // select1(i): position of the i-th 1-bit (1-based)
//! assert_eq!(bv.select1(2), Some(4));
//! ```
//!
//! ## Lifecycle
//!
//! [`BitVec`] is the raw payload: bits packed into 64-bit words, only
//! `access` available. [`BitVec::build_index`] consumes it and runs a single
//! linear pass that produces an [`RsVec`], on which the full rank/select
//! surface is valid. The indexed vector is immutable and may be shared
//! freely across threads.
//!
//! ## Features
//!
//! - `std` (default) - use the standard library
//! - `serde` - enable serialization/deserialization support
//! - `portable-popcount` - portable bitwise popcount (no intrinsics)
//! - `cli` - build the `bitrank` command-line tool

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

// When using std, re-export alloc types from std for compatibility
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

mod bitvec;
mod broadword;
mod descriptor;
mod popcount;
mod rank;
mod rsvec;
mod select;

pub use bitvec::BitVec;
pub use broadword::select_in_word;
pub use popcount::{popcount_word, popcount_words};
pub use rsvec::RsVec;

/// Trait for rank/select operations on indexed bitvectors.
///
/// Rank and select are the fundamental operations of succinct data
/// structures:
/// - `rank1(p)`: count 1-bits in positions `[0, p)`
/// - `select1(i)`: find the position of the i-th 1-bit (1-based)
///
/// Rank and select are inverse to each other: for every position `p`
/// holding a 1-bit, `select1(rank1(p) + 1) == p`.
pub trait RankSelect {
    /// Count 1-bits in positions `[0, p)`.
    ///
    /// Returns 0 if `p == 0`; positions past the end are clamped.
    fn rank1(&self, p: u64) -> u64;

    /// Count 0-bits in positions `[0, p)`.
    fn rank0(&self, p: u64) -> u64;

    /// Position of the i-th 1-bit (1-based).
    ///
    /// Returns `None` if `i == 0` or fewer than `i` ones exist.
    fn select1(&self, i: u64) -> Option<u64>;

    /// Position of the i-th 0-bit (1-based).
    ///
    /// Returns `None` if `i == 0` or fewer than `i` zeros exist.
    fn select0(&self, i: u64) -> Option<u64>;
}
