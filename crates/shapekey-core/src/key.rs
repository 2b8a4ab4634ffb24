//! Word-level key encoding shared by geometry and style keys.
//!
//! Keys are sequences of `u32` words. Floating point values are stored as the
//! two halves of their `f64` bit pattern, low half first.

use std::ops::{BitOr, BitOrAssign};
use thiserror::Error;

/// Number of key words used to encode one `f64`.
pub const F64_WORDS: usize = 2;

/// Key errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("shape has no stable key")]
    Uncacheable,
    #[error("key buffer too small: need {needed} words, got {provided}")]
    BufferTooSmall { needed: usize, provided: usize },
}

/// Result type for key operations.
pub type KeyResult<T> = Result<T, KeyError>;

/// Flags that change how a style encodes itself into a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyFlags(u32);

impl KeyFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// The geometry the style is applied to is known to have no open contours.
    pub const CLOSED: Self = Self(1);

    /// Check whether all bits of `other` are set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for KeyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for KeyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Sequential writer over a caller-provided key buffer.
///
/// Callers size the buffer from the matching `*_key_size` query before
/// writing; writing past the end is a contract violation.
pub struct KeyWriter<'a> {
    buf: &'a mut [u32],
    pos: usize,
}

impl<'a> KeyWriter<'a> {
    pub fn new(buf: &'a mut [u32]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn push_u32(&mut self, word: u32) {
        match self.buf.get_mut(self.pos) {
            Some(slot) => *slot = word,
            None => debug_assert!(false, "key write past end of {} word buffer", self.buf.len()),
        }
        self.pos += 1;
    }

    /// Push an `f64` as two words. Negative zero is written as positive zero.
    pub fn push_f64(&mut self, value: f64) {
        let value = if value == 0.0 { 0.0 } else { value };
        let bits = value.to_bits();
        self.push_u32(bits as u32);
        self.push_u32((bits >> 32) as u32);
    }

    pub fn push_words(&mut self, words: &[u32]) {
        for &word in words {
            self.push_u32(word);
        }
    }

    /// Number of words written so far.
    pub fn written(&self) -> usize {
        self.pos
    }
}

/// Encode a single `f64` into a fresh pair of words.
pub fn f64_words(value: f64) -> [u32; F64_WORDS] {
    let mut out = [0; F64_WORDS];
    KeyWriter::new(&mut out).push_f64(value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_f64_round_trips_bits() {
        let words = f64_words(1.5);
        let bits = (words[0] as u64) | ((words[1] as u64) << 32);
        assert_eq!(f64::from_bits(bits), 1.5);
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        assert_eq!(f64_words(-0.0), f64_words(0.0));
    }

    #[test]
    fn test_writer_counts_words() {
        let mut buf = [0u32; 4];
        let mut writer = KeyWriter::new(&mut buf);
        writer.push_u32(7);
        writer.push_f64(2.0);
        assert_eq!(writer.written(), 3);
        assert_eq!(buf[0], 7);
    }

    #[test]
    fn test_flags() {
        let mut flags = KeyFlags::NONE;
        assert!(!flags.contains(KeyFlags::CLOSED));
        flags |= KeyFlags::CLOSED;
        assert!(flags.contains(KeyFlags::CLOSED));
        assert_eq!(flags.bits(), 1);
    }
}
