//! One reported condition, with the node and cycle it was observed at.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One condition the simulator reported.
///
/// A diagnostic carries a [`Severity`], a stable [`DiagnosticCode`], and a
/// message, plus whatever simulation context the emitter had on hand: the
/// hierarchical name of the netlist node involved, the cycle the condition
/// was observed at, and free-form follow-up notes. Node and cycle replace
/// the source spans a compiler would attach; by simulation time the netlist
/// is the only addressable structure left.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How bad this is.
    pub severity: Severity,
    /// Stable identity of the condition.
    pub code: DiagnosticCode,
    /// Human-readable description.
    pub message: String,
    /// Hierarchical name of the netlist node involved, when known.
    pub node: Option<String>,
    /// Cycle the condition was observed at, when known.
    pub cycle: Option<i64>,
    /// Follow-up notes rendered under the message.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// A diagnostic of the given severity with no context attached yet.
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            node: None,
            cycle: None,
            notes: Vec::new(),
        }
    }

    /// An error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// A warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Attaches the netlist node the condition was observed at.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Attaches the cycle the condition was observed at.
    pub fn with_cycle(mut self, cycle: i64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Appends a follow-up note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Renders like `warning[S101]: message (node top.lut, cycle 7)` with each
/// note on its own indented line.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        match (&self.node, self.cycle) {
            (Some(node), Some(cycle)) => write!(f, " (node {node}, cycle {cycle})")?,
            (Some(node), None) => write!(f, " (node {node})")?,
            (None, Some(cycle)) => write!(f, " (cycle {cycle})")?,
            (None, None) => {}
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}
