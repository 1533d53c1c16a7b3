//! How bad a diagnostic is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic.
///
/// The simulator distinguishes three levels: notes carry context, warnings
/// mark values that degraded to unknown but let the run continue, and errors
/// mean the affected node cannot be simulated at all. Declaration order is
/// least to most severe, so the derived `Ord` compares severities directly.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Context attached to another diagnostic or to the run as a whole.
    Note,
    /// The simulation continued, but a value degraded to unknown.
    Warning,
    /// The node or table cannot be simulated.
    Error,
}

impl Severity {
    /// The lowercase label used when rendering, e.g. `warning`.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Whether this severity makes the run's outcome invalid.
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_order_by_badness() {
        assert!(Severity::Note < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        let worst = [Severity::Warning, Severity::Note, Severity::Error];
        assert_eq!(worst.iter().max(), Some(&Severity::Error));
    }

    #[test]
    fn only_error_is_error() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
        assert!(!Severity::Note.is_error());
    }

    #[test]
    fn labels() {
        assert_eq!(Severity::Note.to_string(), "note");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
