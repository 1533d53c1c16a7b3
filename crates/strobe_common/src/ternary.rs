//! Three-state logic values with Kleene truth-table operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A single 3-state logic value.
///
/// The three states represent:
/// - `Zero` — logic low (driven 0)
/// - `One` — logic high (driven 1)
/// - `X` — unknown, uninitialized, or indeterminate
///
/// Every conversion into `Ternary` is total: input that does not denote a
/// definite 0 or 1 becomes `X`. Simulation must always have *some* value for
/// every signal at every cycle, so unrecognized input degrades to unknown
/// rather than failing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Ternary {
    /// Logic low (0).
    Zero = 0,
    /// Logic high (1).
    One = 1,
    /// Unknown or uninitialized.
    X = 2,
}

impl Ternary {
    /// Converts a character to a [`Ternary`] value.
    ///
    /// `'0'` and `'1'` map to their definite values; any other character
    /// (conventionally `'x'`, `'X'`, or `'-'` in truth-table sources) maps
    /// to `X`.
    pub fn from_char(c: char) -> Self {
        match c {
            '0' => Ternary::Zero,
            '1' => Ternary::One,
            _ => Ternary::X,
        }
    }

    /// Returns the character form: `'0'`, `'1'`, or `'x'`.
    pub fn to_char(self) -> char {
        match self {
            Ternary::Zero => '0',
            Ternary::One => '1',
            Ternary::X => 'x',
        }
    }

    /// Converts from the signed byte representation used at the toolchain
    /// boundary, where unknown is `-1`.
    ///
    /// `0` and `1` map to their definite values; anything else maps to `X`.
    pub fn from_i8(v: i8) -> Self {
        match v {
            0 => Ternary::Zero,
            1 => Ternary::One,
            _ => Ternary::X,
        }
    }

    /// Returns the signed byte representation: `0`, `1`, or `-1` for `X`.
    pub fn to_i8(self) -> i8 {
        match self {
            Ternary::Zero => 0,
            Ternary::One => 1,
            Ternary::X => -1,
        }
    }

    /// Decodes a 2-bit storage encoding (`0`, `1`, `2`).
    ///
    /// Only the low two bits are inspected. The unused encoding `3` decodes
    /// to `X`, so every bit pattern yields a valid value.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Ternary::Zero,
            1 => Ternary::One,
            _ => Ternary::X,
        }
    }

    /// Returns the 2-bit storage encoding (`0`, `1`, or `2`).
    pub fn to_bits(self) -> u8 {
        self as u8
    }

    /// Converts a boolean to a definite value.
    pub fn from_bool(v: bool) -> Self {
        if v {
            Ternary::One
        } else {
            Ternary::Zero
        }
    }

    /// Returns `true` if the value is a definite `Zero` or `One`.
    pub fn is_known(self) -> bool {
        self != Ternary::X
    }
}

impl fmt::Display for Ternary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Kleene AND truth table:
/// ```text
///     0  1  X
/// 0 | 0  0  0
/// 1 | 0  1  X
/// X | 0  X  X
/// ```
impl BitAnd for Ternary {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        use Ternary::*;
        match (self, rhs) {
            (Zero, _) | (_, Zero) => Zero,
            (One, One) => One,
            _ => X,
        }
    }
}

/// Kleene OR truth table:
/// ```text
///     0  1  X
/// 0 | 0  1  X
/// 1 | 1  1  1
/// X | X  1  X
/// ```
impl BitOr for Ternary {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        use Ternary::*;
        match (self, rhs) {
            (One, _) | (_, One) => One,
            (Zero, Zero) => Zero,
            _ => X,
        }
    }
}

/// Kleene XOR truth table:
/// ```text
///     0  1  X
/// 0 | 0  1  X
/// 1 | 1  0  X
/// X | X  X  X
/// ```
impl BitXor for Ternary {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        use Ternary::*;
        match (self, rhs) {
            (Zero, Zero) | (One, One) => Zero,
            (Zero, One) | (One, Zero) => One,
            _ => X,
        }
    }
}

/// Kleene NOT: `!0 = 1`, `!1 = 0`, `!X = X`.
impl Not for Ternary {
    type Output = Self;

    fn not(self) -> Self {
        use Ternary::*;
        match self {
            Zero => One,
            One => Zero,
            X => X,
        }
    }
}
