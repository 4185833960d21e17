//! Raw bit payload: packed words, ASCII construction, and access.
//!
//! [`BitVec`] is the un-indexed state of the structure. It owns the packed
//! bit words and answers `access` only; rank and select become available
//! after [`BitVec::build_index`] turns it into an [`RsVec`](crate::RsVec).

#[cfg(not(test))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rsvec::RsVec;

/// An immutable sequence of bits packed into 64-bit words.
///
/// Bit `p` is stored in word `p / 64` at offset `p % 64`, low bit first,
/// so the i-th character of the input becomes bit `i % 64` of its word.
/// Tail bits past `len` in the final word are always zero.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitVec {
    /// Raw bit storage
    words: Vec<u64>,
    /// Number of valid bits
    len: u64,
}

impl BitVec {
    /// Parse a bitvector from a byte stream of `'0'` and `'1'` glyphs.
    ///
    /// Every other byte is skipped, which tolerates carriage returns and
    /// other line-break remnants in the middle of the stream. One extra
    /// word is reserved past the payload so the final partial word always
    /// exists.
    pub fn from_ascii(text: &[u8]) -> Self {
        let mut words = alloc::vec![0u64; (text.len() >> 6) + 1];

        let mut outer = 0usize;
        let mut inner = 0u32;
        let mut current = 0u64;
        for &byte in text {
            let bit = match byte {
                b'0' => 0u64,
                b'1' => 1u64,
                _ => continue,
            };

            current |= bit << inner;
            inner += 1;
            if inner == 64 {
                words[outer] = current;
                outer += 1;
                inner = 0;
                current = 0;
            }
        }
        words[outer] = current;

        let len = ((outer as u64) << 6) + u64::from(inner);
        Self { words, len }
    }

    /// Create a bitvector from raw u64 words (little-endian bit order).
    ///
    /// Tail bits past `len` in the final word are masked out.
    ///
    /// # Panics
    ///
    /// Panics if `len > words.len() * 64`.
    pub fn from_words(mut words: Vec<u64>, len: u64) -> Self {
        assert!(
            len <= (words.len() as u64).saturating_mul(64),
            "len {} exceeds capacity {}",
            len,
            (words.len() as u64).saturating_mul(64)
        );

        let tail_bits = (len % 64) as u32;
        let used = (len / 64) as usize + usize::from(tail_bits > 0);
        if tail_bits > 0 {
            words[used - 1] &= (1u64 << tail_bits) - 1;
        }
        for word in &mut words[used..] {
            *word = 0;
        }

        Self { words, len }
    }

    /// Number of bits in the bitvector.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the bitvector holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bit at position `p` as 0 or 1.
    ///
    /// One load, one shift, one mask. The caller guarantees `p < len`;
    /// only debug builds check.
    #[inline]
    pub fn access(&self, p: u64) -> u64 {
        debug_assert!(p < self.len, "access({}) out of bounds (len={})", p, self.len);
        (self.words[(p >> 6) as usize] >> (p & 63)) & 1
    }

    /// Returns true if the bit at position `p` is set.
    ///
    /// # Panics
    ///
    /// Panics if `p >= len`.
    #[inline]
    pub fn get(&self, p: u64) -> bool {
        assert!(p < self.len, "index {} out of bounds (len={})", p, self.len);
        (self.words[(p >> 6) as usize] >> (p & 63)) & 1 == 1
    }

    /// The raw word at the given index.
    #[inline]
    pub fn word(&self, idx: usize) -> u64 {
        self.words[idx]
    }

    /// Number of 64-bit words backing the bitvector.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// All backing words.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Heap capacity of the payload in bits.
    #[inline]
    pub(crate) fn capacity_bits(&self) -> u64 {
        (self.words.capacity() as u64) * 64
    }

    /// Build the rank/select index, consuming the raw payload.
    ///
    /// One linear pass over the words; see [`RsVec`](crate::RsVec).
    pub fn build_index(self) -> RsVec {
        RsVec::build(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ascii_empty() {
        let bv = BitVec::from_ascii(b"");
        assert_eq!(bv.len(), 0);
        assert!(bv.is_empty());
        assert_eq!(bv.word_count(), 1);
    }

    #[test]
    fn test_from_ascii_simple() {
        let bv = BitVec::from_ascii(b"10110");
        assert_eq!(bv.len(), 5);
        assert_eq!(bv.access(0), 1);
        assert_eq!(bv.access(1), 0);
        assert_eq!(bv.access(2), 1);
        assert_eq!(bv.access(3), 1);
        assert_eq!(bv.access(4), 0);
    }

    #[test]
    fn test_from_ascii_skips_noise() {
        // Windows line-break remnants and stray bytes are not bits
        let bv = BitVec::from_ascii(b"10\r\n1 0x1");
        assert_eq!(bv.len(), 5);
        assert!(bv.get(0));
        assert!(!bv.get(1));
        assert!(bv.get(2));
        assert!(!bv.get(3));
        assert!(bv.get(4));
    }

    #[test]
    fn test_from_ascii_low_bit_first() {
        // 64 ones followed by a zero: word 0 is all ones, bit 64 is word 1 bit 0
        let mut text = vec![b'1'; 64];
        text.push(b'0');
        let bv = BitVec::from_ascii(&text);
        assert_eq!(bv.len(), 65);
        assert_eq!(bv.word(0), u64::MAX);
        assert_eq!(bv.word(1), 0);
    }

    #[test]
    fn test_from_ascii_word_boundary() {
        let text: Vec<u8> = (0..128u32).map(|i| if i % 3 == 0 { b'1' } else { b'0' }).collect();
        let bv = BitVec::from_ascii(&text);
        assert_eq!(bv.len(), 128);
        for i in 0..128u64 {
            assert_eq!(bv.access(i), u64::from(i % 3 == 0), "bit {}", i);
        }
    }

    #[test]
    fn test_from_words_masks_tail() {
        // Word has all bits set, but only 10 are valid
        let bv = BitVec::from_words(vec![u64::MAX], 10);
        assert_eq!(bv.len(), 10);
        assert_eq!(bv.word(0), 0x3FF);
    }

    #[test]
    fn test_from_words_full_word() {
        let bv = BitVec::from_words(vec![u64::MAX, u64::MAX], 128);
        assert_eq!(bv.word(0), u64::MAX);
        assert_eq!(bv.word(1), u64::MAX);
    }

    #[test]
    #[should_panic(expected = "exceeds capacity")]
    fn test_from_words_len_too_large() {
        BitVec::from_words(vec![0u64], 65);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds() {
        let bv = BitVec::from_words(vec![0xFF], 8);
        bv.get(8);
    }

    #[test]
    fn test_get_all_positions() {
        let bv = BitVec::from_words(vec![0b1100_0011], 8);
        assert!(bv.get(0));
        assert!(bv.get(1));
        assert!(!bv.get(2));
        assert!(!bv.get(3));
        assert!(!bv.get(4));
        assert!(!bv.get(5));
        assert!(bv.get(6));
        assert!(bv.get(7));
    }
}
