//! Simulation error types for the cycle-based gate-level simulator.
//!
//! All errors that can occur while constructing truth tables or evaluating
//! nodes are represented as variants of [`SimError`]. Value-level anomalies
//! (ambiguous matches, unknown inputs) are deliberately NOT errors: they
//! degrade to `X` and are reported through the diagnostic sink instead.

/// Errors that can occur during node construction or evaluation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A truth table description was structurally invalid.
    #[error("malformed truth table for {owner}: {reason}")]
    MalformedTable {
        /// Name of the node that owns the table.
        owner: String,
        /// Description of what is wrong with the table.
        reason: String,
    },

    /// An input or output vector had a different width than the table expects.
    #[error("width mismatch for {owner}: expected {expected}, got {actual}")]
    WidthMismatch {
        /// Name of the node that owns the table.
        owner: String,
        /// The width the table was built with.
        expected: u32,
        /// The width that was supplied.
        actual: u32,
    },
}
