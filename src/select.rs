//! Select engine.
//!
//! A select query runs in four stages: a fast path for the last bit of
//! each value, superblock location via the select cache plus a binary
//! search over descriptor prefix counts, block location via the seven
//! packed per-block counts, and finally a bounded word walk with an
//! in-word scan.

use crate::broadword::select_in_word;
use crate::popcount::popcount_word;
use crate::rsvec::{BLOCKS_PER_SUPERBLOCK, RsVec, SELECT_SAMPLE, WORDS_PER_BLOCK};

impl RsVec {
    /// Position of the i-th (1-based) bit equal to `bit`.
    #[inline]
    pub fn select(&self, i: u64, bit: bool) -> Option<u64> {
        if bit { self.select1(i) } else { self.select0(i) }
    }

    /// Position of the i-th 1-bit (1-based).
    ///
    /// Returns `None` if `i == 0` or fewer than `i` ones exist.
    pub fn select1(&self, i: u64) -> Option<u64> {
        if i == 0 || i > self.ones {
            return None;
        }
        // The final one is cached; this sidesteps the tail's off-by-one
        // hazards entirely
        if i == self.ones {
            return Some(self.last_one);
        }

        let s = self.locate_superblock(i, true);
        let desc = self.superblocks[s as usize];
        let mut r = i - self.ones_before_superblock(s);

        // Cumulative one counts of blocks [0..b] stop the scan at the
        // block holding the r-th one; r is then re-expressed relative to
        // that block's start
        let mut block = BLOCKS_PER_SUPERBLOCK - 1;
        let mut prev = 0u64;
        for b in 0..BLOCKS_PER_SUPERBLOCK - 1 {
            let cum = desc.ones_before_block(b + 1);
            if cum >= r {
                block = b;
                break;
            }
            prev = cum;
        }
        r -= prev;

        let words = self.words();
        let w0 = (s as usize) * 64 + block * WORDS_PER_BLOCK;
        let w_end = words.len().min(w0 + WORDS_PER_BLOCK);
        for w in w0..w_end {
            let word = words[w];
            let count = u64::from(popcount_word(word));
            if r <= count {
                let bit = select_in_word(word, (r - 1) as u32);
                return Some((w as u64) * 64 + u64::from(bit));
            }
            r -= count;
        }
        None
    }

    /// Position of the i-th 0-bit (1-based).
    ///
    /// Returns `None` if `i == 0` or fewer than `i` zeros exist.
    pub fn select0(&self, i: u64) -> Option<u64> {
        if i == 0 || i > self.zeros {
            return None;
        }
        if i == self.zeros {
            return Some(self.last_zero);
        }

        let s = self.locate_superblock(i, false);
        let desc = self.superblocks[s as usize];
        let mut r = i - self.zeros_before_superblock(s);

        // The descriptor stores one counts only; each block holds 512
        // bits, so the zero cumulative is the complement
        let mut block = BLOCKS_PER_SUPERBLOCK - 1;
        let mut prev = 0u64;
        for b in 0..BLOCKS_PER_SUPERBLOCK - 1 {
            let cum = desc.zeros_before_block(b + 1);
            if cum >= r {
                block = b;
                break;
            }
            prev = cum;
        }
        r -= prev;

        let words = self.words();
        let len = self.len();
        let w0 = (s as usize) * 64 + block * WORDS_PER_BLOCK;
        let w_end = words.len().min(w0 + WORDS_PER_BLOCK);
        for w in w0..w_end {
            let base = (w as u64) * 64;
            // Padding past `len` inverts to ones; mask it out of the scan
            let valid = len.saturating_sub(base).min(64);
            let inverted = if valid == 64 {
                !words[w]
            } else {
                !words[w] & (1u64 << valid).wrapping_sub(1)
            };
            let count = u64::from(popcount_word(inverted));
            if r <= count {
                let bit = select_in_word(inverted, (r - 1) as u32);
                return Some(base + u64::from(bit));
            }
            r -= count;
        }
        None
    }

    /// Largest superblock with fewer than `i` bits of value `bit` before
    /// it; the i-th such bit lies inside it.
    fn locate_superblock(&self, i: u64, bit: bool) -> u64 {
        let last = (self.superblocks.len() - 1) as u64;
        let count_before = |s: u64| {
            if bit { self.ones_before_superblock(s) } else { self.zeros_before_superblock(s) }
        };

        // Single superblock, or the target sits in the first one
        if last == 0 || i <= count_before(1) {
            return 0;
        }
        // Beyond the final recorded prefix the target can only be in the
        // last superblock
        if i > count_before(last) {
            return last;
        }

        // The cache brackets the search to roughly two superblocks; widen
        // by one on each side to absorb the boundary cases
        let cache = if bit { &self.select_one } else { &self.select_zero };
        let k = (i / SELECT_SAMPLE) as usize;
        let mut lo = if k == 0 { 0 } else { u64::from(cache[k - 1]).saturating_sub(1) };
        let mut hi = if k < cache.len() { (u64::from(cache[k]) + 1).min(last) } else { last };

        // First superblock whose prefix reaches i; the target is the one
        // before it
        while lo < hi {
            let mid = (lo + hi) >> 1;
            if count_before(mid) < i {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo - 1
    }
}
