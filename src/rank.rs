//! Rank engine.
//!
//! A rank query resolves in three tiers: the superblock descriptor's
//! prefix-1 count (plus the L0 split for positions in the second span),
//! the packed 12-bit prefix of the 512-bit block inside the superblock,
//! and a bounded popcount tail over at most eight words.

use crate::popcount::popcount_word;
use crate::rsvec::RsVec;

impl RsVec {
    /// Count of bits equal to `bit` in positions `[0, p)`.
    #[inline]
    pub fn rank(&self, p: u64, bit: bool) -> u64 {
        if bit { self.rank1(p) } else { self.rank0(p) }
    }

    /// Count of 1-bits in positions `[0, p)`.
    ///
    /// `rank1(0)` is 0; positions at or past the end clamp to the total.
    pub fn rank1(&self, p: u64) -> u64 {
        if p == 0 {
            return 0;
        }
        if p >= self.len() {
            return self.ones;
        }

        let s = p >> 12;
        let desc = self.superblocks[s as usize];
        let block = ((p >> 9) & 0x7) as usize;
        let mut count = self.ones_before_superblock(s) + desc.ones_before_block(block);

        // Whole words of the block before the one holding `p`, then the
        // masked head of that word
        let words = self.words();
        let block_base = ((p >> 9) << 3) as usize;
        let word_in_block = ((p >> 6) & 0x7) as usize;
        for w in 0..word_in_block {
            count += u64::from(popcount_word(words[block_base + w]));
        }
        let mask = (1u64 << (p & 63)) - 1;
        count + u64::from(popcount_word(words[block_base + word_in_block] & mask))
    }

    /// Count of 0-bits in positions `[0, p)`.
    ///
    /// Bits are either zero or one, so this is `p` minus the ones.
    #[inline]
    pub fn rank0(&self, p: u64) -> u64 {
        if p >= self.len() {
            return self.zeros;
        }
        p - self.rank1(p)
    }
}

#[cfg(test)]
mod tests {
    use crate::BitVec;

    #[test]
    fn test_rank_at_zero() {
        let rv = BitVec::from_ascii(b"1111").build_index();
        assert_eq!(rv.rank1(0), 0);
        assert_eq!(rv.rank0(0), 0);
    }

    #[test]
    fn test_rank_simple() {
        // Ones at positions 0, 4, 8
        let rv = BitVec::from_ascii(b"1000100010").build_index();
        assert_eq!(rv.rank1(1), 1);
        assert_eq!(rv.rank1(4), 1);
        assert_eq!(rv.rank1(5), 2);
        assert_eq!(rv.rank0(5), 3);
        assert_eq!(rv.rank1(10), 3);
        assert_eq!(rv.rank0(10), 7);
    }

    #[test]
    fn test_rank_clamps_past_end() {
        let rv = BitVec::from_ascii(b"1010").build_index();
        assert_eq!(rv.rank1(100), 2);
        assert_eq!(rv.rank0(100), 2);
        assert_eq!(rv.rank1(u64::MAX), 2);
    }

    #[test]
    fn test_rank_word_boundaries() {
        let words = vec![u64::MAX; 4];
        let rv = BitVec::from_words(words, 256).build_index();
        assert_eq!(rv.rank1(63), 63);
        assert_eq!(rv.rank1(64), 64);
        assert_eq!(rv.rank1(65), 65);
        assert_eq!(rv.rank1(256), 256);
    }

    #[test]
    fn test_rank_block_boundaries() {
        // Ones exactly at 511 and 512
        let mut words = vec![0u64; 16];
        words[7] = 1u64 << 63;
        words[8] = 1u64;
        let rv = BitVec::from_words(words, 1024).build_index();
        assert_eq!(rv.rank1(511), 0);
        assert_eq!(rv.rank1(512), 1);
        assert_eq!(rv.rank1(513), 2);
        assert_eq!(rv.rank1(1024), 2);
    }

    #[test]
    fn test_rank_superblock_boundaries() {
        // Alternating 01 pattern over two superblocks
        let words = vec![0xAAAA_AAAA_AAAA_AAAAu64; 128];
        let rv = BitVec::from_words(words, 8192).build_index();
        assert_eq!(rv.rank1(4095), 2047);
        assert_eq!(rv.rank1(4096), 2048);
        assert_eq!(rv.rank1(4097), 2048);
        assert_eq!(rv.rank1(4098), 2049);
        assert_eq!(rv.rank1(8192), 4096);
    }

    #[test]
    fn test_rank_sum_identity() {
        let text: Vec<u8> = (0..1000u32).map(|i| if i % 7 < 3 { b'1' } else { b'0' }).collect();
        let rv = BitVec::from_ascii(&text).build_index();
        for p in 0..=1000u64 {
            assert_eq!(rv.rank1(p) + rv.rank0(p), p, "p={}", p);
        }
    }

    #[test]
    fn test_rank_against_naive() {
        let text: Vec<u8> =
            (0..6000u32).map(|i| if i.wrapping_mul(2654435761) % 5 < 2 { b'1' } else { b'0' }).collect();
        let rv = BitVec::from_ascii(&text).build_index();
        let mut naive = 0u64;
        for p in 0..6000u64 {
            assert_eq!(rv.rank1(p), naive, "p={}", p);
            naive += rv.access(p);
        }
        assert_eq!(rv.rank1(6000), naive);
    }
}
