//! Indexed bitvector: the one-pass index builder and its storage.
//!
//! [`RsVec`] owns the raw payload plus everything rank and select need:
//! the packed superblock descriptor table, the two select caches, the L0
//! split marker, and the cached totals and last-bit positions. It is built
//! in a single linear pass over the words and never mutated afterwards,
//! so any number of readers can share one instance.

#[cfg(not(test))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::RankSelect;
use crate::bitvec::BitVec;
use crate::descriptor::Descriptor;
use crate::popcount::popcount_word;

/// Number of 64-bit words per block (512 bits).
pub(crate) const WORDS_PER_BLOCK: usize = 8;

/// Number of blocks per superblock (4096 bits).
pub(crate) const BLOCKS_PER_SUPERBLOCK: usize = 8;

/// Bits covered by one superblock.
pub(crate) const BITS_PER_SUPERBLOCK: u64 = 4096;

/// Superblocks per L0 span (2^43 bits). The 44-bit descriptor prefix is
/// scoped to one span and restarts at this boundary; at most two spans are
/// supported.
pub(crate) const SUPERBLOCKS_PER_L0: u64 = 1 << 31;

/// Select cache sampling distance: the superblock number of every
/// `SELECT_SAMPLE`-th one (and zero) is recorded during the build.
pub(crate) const SELECT_SAMPLE: u64 = 8192;

/// Prefix-1 count of superblock `superblock`, lifted from span-local to
/// global by adding the L0 split total for superblocks in the second span.
#[inline]
pub(crate) fn span_prefix(prefix: u64, superblock: u64, l0_split_ones: u64) -> u64 {
    if superblock >= SUPERBLOCKS_PER_L0 {
        prefix + l0_split_ones
    } else {
        prefix
    }
}

/// A bitvector with O(1) rank and select support.
///
/// Produced by [`BitVec::build_index`]. The index overhead is 128 bits per
/// 4096 payload bits (~3%) plus two sparse select caches.
///
/// # Example
///
/// ```
/// use bitrank::BitVec;
///
/// let bv = BitVec::from_ascii(b"1111111100000000").build_index();
/// assert_eq!(bv.rank1(16), 8);
/// assert_eq!(bv.select1(8), Some(7));
/// assert_eq!(bv.select0(1), Some(8));
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RsVec {
    /// Raw bit payload
    pub(crate) bits: BitVec,
    /// One packed descriptor per started superblock, plus a trailing
    /// sentinel holding the span's closing prefix count
    pub(crate) superblocks: Vec<Descriptor>,
    /// Superblock number of every 8192-th one
    pub(crate) select_one: Vec<u32>,
    /// Superblock number of every 8192-th zero
    pub(crate) select_zero: Vec<u32>,
    /// Total ones at the moment the build crossed into the second L0 span
    pub(crate) l0_split_ones: u64,
    /// Total number of 1-bits
    pub(crate) ones: u64,
    /// Total number of 0-bits
    pub(crate) zeros: u64,
    /// Position of the last 1-bit (meaningless while `ones == 0`)
    pub(crate) last_one: u64,
    /// Position of the last 0-bit (meaningless while `zeros == 0`)
    pub(crate) last_zero: u64,
}

impl RsVec {
    /// Build the full index from a raw payload in one linear pass.
    ///
    /// Per word: update the totals and last-bit positions, accumulate the
    /// in-superblock counter, write a 12-bit descriptor slot at block
    /// boundaries, commit the descriptor at superblock boundaries, and
    /// append a select cache entry whenever a running count crosses a
    /// sampling threshold. The trailing partial descriptor is flushed at
    /// the end so the table covers the entire payload.
    pub(crate) fn build(bits: BitVec) -> Self {
        let words = bits.words();
        let word_count = words.len();
        let len = bits.len();

        let mut superblocks: Vec<Descriptor> = Vec::with_capacity(word_count / 64 + 1);
        let mut select_one: Vec<u32> = Vec::new();
        let mut select_zero: Vec<u32> = Vec::new();

        let mut desc = Descriptor::default();
        let mut word_in_block = 0usize;
        let mut block = 0usize;
        let mut sb_ones = 0u64; // ones so far in the current superblock
        let mut span_ones = 0u64; // ones so far in the current L0 span
        let mut ones = 0u64;
        let mut zeros = 0u64;
        let mut last_one = 0u64;
        let mut last_zero = 0u64;
        let mut l0_split_ones = 0u64;
        let mut next_one_sample = SELECT_SAMPLE;
        let mut next_zero_sample = SELECT_SAMPLE;

        for (idx, &word) in words.iter().enumerate() {
            let base = (idx as u64) * 64;
            // Bits of the final word(s) past `len` are padding, not zeros
            let valid = len.saturating_sub(base).min(64);
            let pop = u64::from(popcount_word(word));

            sb_ones += pop;
            span_ones += pop;
            ones += pop;
            zeros += valid - pop;

            if word != 0 {
                last_one = base + 63 - u64::from(word.leading_zeros());
            }
            let inverted = if valid == 64 {
                !word
            } else {
                !word & (1u64 << valid).wrapping_sub(1)
            };
            if inverted != 0 {
                last_zero = base + 63 - u64::from(inverted.leading_zeros());
            }

            // A 64-bit word can cross at most one 8192-bit threshold
            if ones >= next_one_sample {
                next_one_sample += SELECT_SAMPLE;
                select_one.push(superblocks.len() as u32);
            }
            if zeros >= next_zero_sample {
                next_zero_sample += SELECT_SAMPLE;
                select_zero.push(superblocks.len() as u32);
            }

            word_in_block += 1;
            if word_in_block == WORDS_PER_BLOCK || idx == word_count - 1 {
                word_in_block = 0;
                if block == BLOCKS_PER_SUPERBLOCK - 1 {
                    superblocks.push(desc);
                    if superblocks.len() as u64 == SUPERBLOCKS_PER_L0 {
                        // Crossing into the second L0 span: record the
                        // split and restart the span-local prefix counter
                        l0_split_ones = ones;
                        span_ones = 0;
                    }
                    desc = Descriptor::with_prefix(span_ones);
                    sb_ones = 0;
                    block = 0;
                } else {
                    desc.set_ones_before_block(block + 1, sb_ones);
                    block += 1;
                }
            }
        }

        // Flush the in-progress descriptor so the table covers the whole
        // payload; it doubles as the sentinel read by select's superblock
        // search
        superblocks.push(desc);

        Self {
            bits,
            superblocks,
            select_one,
            select_zero,
            l0_split_ones,
            ones,
            zeros,
            last_one,
            last_zero,
        }
    }

    /// Number of bits in the bitvector.
    #[inline]
    pub fn len(&self) -> u64 {
        self.bits.len()
    }

    /// Returns true if the bitvector holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Total number of 1-bits.
    #[inline]
    pub fn count_ones(&self) -> u64 {
        self.ones
    }

    /// Total number of 0-bits.
    #[inline]
    pub fn count_zeros(&self) -> u64 {
        self.zeros
    }

    /// The bit at position `p` as 0 or 1; caller guarantees `p < len`.
    #[inline]
    pub fn access(&self, p: u64) -> u64 {
        self.bits.access(p)
    }

    /// Returns true if the bit at position `p` is set.
    ///
    /// # Panics
    ///
    /// Panics if `p >= len`.
    #[inline]
    pub fn get(&self, p: u64) -> bool {
        self.bits.get(p)
    }

    /// All backing words.
    #[inline]
    pub fn words(&self) -> &[u64] {
        self.bits.words()
    }

    /// Total storage footprint in bits: payload, descriptor table, select
    /// caches, and the scalar bookkeeping fields.
    pub fn size_bits(&self) -> u64 {
        320 + self.bits.capacity_bits()
            + (self.superblocks.capacity() as u64) * 128
            + (self.select_one.capacity() as u64) * 32
            + (self.select_zero.capacity() as u64) * 32
    }

    /// Global count of 1-bits before superblock `s` (the monotone key of
    /// select's superblock search).
    #[inline]
    pub(crate) fn ones_before_superblock(&self, s: u64) -> u64 {
        span_prefix(self.superblocks[s as usize].prefix_ones(), s, self.l0_split_ones)
    }

    /// Global count of 0-bits before superblock `s`.
    #[inline]
    pub(crate) fn zeros_before_superblock(&self, s: u64) -> u64 {
        s * BITS_PER_SUPERBLOCK - self.ones_before_superblock(s)
    }
}

impl RankSelect for RsVec {
    #[inline]
    fn rank1(&self, p: u64) -> u64 {
        RsVec::rank1(self, p)
    }

    #[inline]
    fn rank0(&self, p: u64) -> u64 {
        RsVec::rank0(self, p)
    }

    #[inline]
    fn select1(&self, i: u64) -> Option<u64> {
        RsVec::select1(self, i)
    }

    #[inline]
    fn select0(&self, i: u64) -> Option<u64> {
        RsVec::select0(self, i)
    }
}
