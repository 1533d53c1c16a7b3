//! Structured warnings and errors for the Strobe simulator.
//!
//! A [`Diagnostic`] pairs a severity and a stable code with the netlist node
//! and cycle it was observed at. Simulation workers emit into a shared
//! [`DiagnosticSink`], which collects concurrently and keeps per-severity
//! counts in atomics so "did anything go wrong" checks never take a lock.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use severity::Severity;
pub use sink::DiagnosticSink;
