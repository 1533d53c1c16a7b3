//! Stable identifiers for the conditions the simulator can report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the simulator a diagnostic code belongs to.
///
/// The category fixes the letter a code renders with, so `S101` is always a
/// runtime simulation condition and `T101` always a table-shape condition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Runtime value conditions observed while cycles advance.
    Simulation,
    /// Truth-table construction and shape conditions.
    Table,
    /// Netlist structure conditions reported by the engine.
    Netlist,
}

impl Category {
    /// One-letter rendering prefix.
    pub const fn letter(self) -> char {
        match self {
            Category::Simulation => 'S',
            Category::Table => 'T',
            Category::Netlist => 'N',
        }
    }
}

/// A category plus a number, rendered like `S101`.
///
/// Codes are declared as `const`s next to the code that emits them, so a
/// category/number pair means the same thing in every run and every log.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The part of the simulator this code belongs to.
    pub category: Category,
    /// Number within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a code. `const` so emitters can name their codes as constants.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.letter(), self.number)
    }
}
