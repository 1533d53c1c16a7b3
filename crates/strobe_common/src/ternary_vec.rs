//! Packed vectors of 3-state logic values for patterns and port vectors.

use crate::ternary::Ternary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A vector of 3-state [`Ternary`] values packed for efficient storage.
///
/// Each value occupies 2 bits, with 32 values packed per `u64` word. The
/// vector is **positional**: index 0 is the leftmost symbol of the textual
/// pattern it was parsed from, and `Display` prints index 0 first. This
/// matches truth-table rows and pin-ordered input vectors, which are symbol
/// sequences rather than numbers; numeric interpretation of a vector is the
/// caller's concern.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TernaryVec {
    width: u32,
    /// Packed storage: 2 bits per value, 32 values per u64.
    data: Vec<u64>,
}

/// Number of ternary values packed per u64 word.
const VALUES_PER_WORD: u32 = 32;

impl TernaryVec {
    /// Creates a new `TernaryVec` of the given width, initialized to all `Zero`.
    pub fn new(width: u32) -> Self {
        Self {
            width,
            data: vec![0; word_count(width)],
        }
    }

    /// Creates a `TernaryVec` with every position set to `X`.
    ///
    /// This is the "unknown output" pattern returned when a table lookup
    /// cannot produce a definite result.
    pub fn all_x(width: u32) -> Self {
        let mut v = Self::new(width);
        for i in 0..width {
            v.set(i, Ternary::X);
        }
        v
    }

    /// Returns the number of values in this vector.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns `true` if the vector holds no values.
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Gets the value at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Ternary {
        assert!(index < self.width, "index {index} out of bounds for width {}", self.width);
        let (word, shift) = locate(index);
        Ternary::from_bits((self.data[word] >> shift) as u8)
    }

    /// Sets the value at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, value: Ternary) {
        assert!(index < self.width, "index {index} out of bounds for width {}", self.width);
        let (word, shift) = locate(index);
        let cleared = self.data[word] & !(0b11u64 << shift);
        self.data[word] = cleared | ((value.to_bits() as u64) << shift);
    }

    /// Appends a value at the end of the vector.
    pub fn push(&mut self, value: Ternary) {
        let index = self.width;
        self.width += 1;
        if word_count(self.width) > self.data.len() {
            self.data.push(0);
        }
        self.set(index, value);
    }

    /// Parses a pattern like `"01x"` into a `TernaryVec`.
    ///
    /// Position 0 is the leftmost character. Parsing is total: any character
    /// other than `'0'` or `'1'` (don't-cares, unknowns, typos) becomes `X`.
    pub fn from_pattern(s: &str) -> Self {
        let mut v = Self::new(s.chars().count() as u32);
        for (i, c) in s.chars().enumerate() {
            v.set(i as u32, Ternary::from_char(c));
        }
        v
    }

    /// Returns `true` if every position is `X`.
    pub fn is_all_x(&self) -> bool {
        (0..self.width).all(|i| self.get(i) == Ternary::X)
    }

    /// Iterates over the values in positional order.
    pub fn iter(&self) -> impl Iterator<Item = Ternary> + '_ {
        (0..self.width).map(move |i| self.get(i))
    }
}

impl FromIterator<Ternary> for TernaryVec {
    fn from_iter<I: IntoIterator<Item = Ternary>>(iter: I) -> Self {
        let mut v = TernaryVec::new(0);
        for value in iter {
            v.push(value);
        }
        v
    }
}

impl fmt::Display for TernaryVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.width {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for TernaryVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TernaryVec(\"{self}\")")
    }
}

impl BitAnd for &TernaryVec {
    type Output = TernaryVec;

    fn bitand(self, rhs: Self) -> TernaryVec {
        assert_eq!(self.width, rhs.width, "TernaryVec width mismatch in AND");
        self.iter().zip(rhs.iter()).map(|(a, b)| a & b).collect()
    }
}

impl BitOr for &TernaryVec {
    type Output = TernaryVec;

    fn bitor(self, rhs: Self) -> TernaryVec {
        assert_eq!(self.width, rhs.width, "TernaryVec width mismatch in OR");
        self.iter().zip(rhs.iter()).map(|(a, b)| a | b).collect()
    }
}

impl BitXor for &TernaryVec {
    type Output = TernaryVec;

    fn bitxor(self, rhs: Self) -> TernaryVec {
        assert_eq!(self.width, rhs.width, "TernaryVec width mismatch in XOR");
        self.iter().zip(rhs.iter()).map(|(a, b)| a ^ b).collect()
    }
}

impl Not for &TernaryVec {
    type Output = TernaryVec;

    fn not(self) -> TernaryVec {
        self.iter().map(|v| !v).collect()
    }
}

/// Word index and bit shift of a position in the packed storage.
fn locate(index: u32) -> (usize, u32) {
    (
        (index / VALUES_PER_WORD) as usize,
        (index % VALUES_PER_WORD) * 2,
    )
}

/// Number of u64 words needed to store `width` ternary values.
fn word_count(width: u32) -> usize {
    width.div_ceil(VALUES_PER_WORD) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_width() {
        let v = TernaryVec::new(8);
        assert_eq!(v.width(), 8);
        assert!(!v.is_empty());
        assert!(TernaryVec::new(0).is_empty());
    }

    #[test]
    fn set_get_roundtrip() {
        let mut v = TernaryVec::new(3);
        v.set(0, Ternary::Zero);
        v.set(1, Ternary::One);
        v.set(2, Ternary::X);
        assert_eq!(v.get(0), Ternary::Zero);
        assert_eq!(v.get(1), Ternary::One);
        assert_eq!(v.get(2), Ternary::X);
    }

    #[test]
    fn new_initializes_to_zero() {
        let v = TernaryVec::new(64);
        for i in 0..64 {
            assert_eq!(v.get(i), Ternary::Zero);
        }
    }

    #[test]
    fn from_pattern_is_positional() {
        let v = TernaryVec::from_pattern("01x");
        assert_eq!(v.width(), 3);
        assert_eq!(v.get(0), Ternary::Zero); // leftmost
        assert_eq!(v.get(1), Ternary::One);
        assert_eq!(v.get(2), Ternary::X);
    }

    #[test]
    fn from_pattern_fails_open() {
        let v = TernaryVec::from_pattern("0-1Z9");
        assert_eq!(format!("{v}"), "0x1xx");
    }

    #[test]
    fn display_roundtrip() {
        let v = TernaryVec::from_pattern("10x01x");
        assert_eq!(format!("{v}"), "10x01x");
    }

    #[test]
    fn debug_format() {
        let v = TernaryVec::from_pattern("0x");
        assert_eq!(format!("{v:?}"), "TernaryVec(\"0x\")");
    }

    #[test]
    fn all_x_and_is_all_x() {
        let v = TernaryVec::all_x(4);
        assert_eq!(format!("{v}"), "xxxx");
        assert!(v.is_all_x());
        assert!(!TernaryVec::from_pattern("0x").is_all_x());
        // Vacuously true for the empty vector
        assert!(TernaryVec::new(0).is_all_x());
    }

    #[test]
    fn push_extends() {
        let mut v = TernaryVec::new(0);
        v.push(Ternary::One);
        v.push(Ternary::X);
        v.push(Ternary::Zero);
        assert_eq!(format!("{v}"), "1x0");
    }

    #[test]
    fn push_across_word_boundary() {
        let mut v = TernaryVec::new(0);
        for i in 0..70 {
            v.push(if i % 2 == 0 { Ternary::One } else { Ternary::X });
        }
        assert_eq!(v.width(), 70);
        assert_eq!(v.get(0), Ternary::One);
        assert_eq!(v.get(63), Ternary::X);
        assert_eq!(v.get(68), Ternary::One);
    }

    #[test]
    fn from_iterator() {
        let v: TernaryVec = [Ternary::Zero, Ternary::X, Ternary::One]
            .into_iter()
            .collect();
        assert_eq!(format!("{v}"), "0x1");
    }

    #[test]
    fn iter_matches_positions() {
        let v = TernaryVec::from_pattern("1x0");
        let collected: Vec<Ternary> = v.iter().collect();
        assert_eq!(collected, vec![Ternary::One, Ternary::X, Ternary::Zero]);
    }

    #[test]
    fn bitwise_and() {
        let a = TernaryVec::from_pattern("1100");
        let b = TernaryVec::from_pattern("1010");
        let r = &a & &b;
        assert_eq!(format!("{r}"), "1000");
    }

    #[test]
    fn bitwise_or() {
        let a = TernaryVec::from_pattern("1100");
        let b = TernaryVec::from_pattern("1010");
        let r = &a | &b;
        assert_eq!(format!("{r}"), "1110");
    }

    #[test]
    fn bitwise_xor() {
        let a = TernaryVec::from_pattern("1100");
        let b = TernaryVec::from_pattern("1010");
        let r = &a ^ &b;
        assert_eq!(format!("{r}"), "0110");
    }

    #[test]
    fn bitwise_not() {
        let a = TernaryVec::from_pattern("10x");
        let r = !&a;
        assert_eq!(format!("{r}"), "01x");
    }

    #[test]
    fn unknowns_propagate_through_ops() {
        let a = TernaryVec::from_pattern("0x1x");
        let b = TernaryVec::from_pattern("xx11");
        assert_eq!(format!("{}", &a & &b), "0xx1"); // 0 dominates AND
        assert_eq!(format!("{}", &a | &b), "xx11"); // 1 dominates OR
    }

    #[test]
    fn large_width_spanning_words() {
        let mut v = TernaryVec::new(100);
        v.set(0, Ternary::One);
        v.set(50, Ternary::X);
        v.set(99, Ternary::One);
        assert_eq!(v.get(0), Ternary::One);
        assert_eq!(v.get(50), Ternary::X);
        assert_eq!(v.get(99), Ternary::One);
        assert_eq!(v.get(1), Ternary::Zero);
    }

    #[test]
    fn serde_roundtrip() {
        let v = TernaryVec::from_pattern("10x01x10");
        let json = serde_json::to_string(&v).unwrap();
        let back: TernaryVec = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
