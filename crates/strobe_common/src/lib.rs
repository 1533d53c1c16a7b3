//! Shared foundational types used across the Strobe simulator.
//!
//! This crate provides the 3-state logic value used for gate-level
//! simulation and the packed vector type used for truth-table patterns
//! and port vectors.

#![warn(missing_docs)]

pub mod ternary;
pub mod ternary_vec;

pub use ternary::Ternary;
pub use ternary_vec::TernaryVec;
