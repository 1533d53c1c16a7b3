//! Shared collection point for diagnostics emitted by simulation workers.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Collects diagnostics from any number of threads.
///
/// Workers hold a `&DiagnosticSink` and [`emit`](Self::emit) into it as they
/// evaluate nodes. Per-severity counts live in atomics beside the entry
/// vector, so the hot-path questions (`has_errors`, `has_warnings`) never
/// take the lock; only emitting and draining do.
pub struct DiagnosticSink {
    entries: Mutex<Vec<Diagnostic>>,
    counts: [AtomicUsize; 3],
}

/// Index of a severity's counter in [`DiagnosticSink::counts`].
fn bucket(severity: Severity) -> usize {
    match severity {
        Severity::Note => 0,
        Severity::Warning => 1,
        Severity::Error => 2,
    }
}

impl DiagnosticSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            counts: [AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)],
        }
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.counts[bucket(diag.severity)].fetch_add(1, Ordering::Relaxed);
        self.entries.lock().unwrap().push(diag);
    }

    /// How many diagnostics of `severity` have been emitted.
    pub fn count(&self, severity: Severity) -> usize {
        self.counts[bucket(severity)].load(Ordering::Relaxed)
    }

    /// Whether any error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Whether any warning has been emitted.
    pub fn has_warnings(&self) -> bool {
        self.count(Severity::Warning) > 0
    }

    /// How many errors have been emitted.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// How many warnings have been emitted.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Removes and returns everything emitted so far, in emission order.
    ///
    /// The severity counts are a running total over the sink's lifetime and
    /// are not reset by draining.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap())
    }

    /// Clones everything emitted so far without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.lock().unwrap().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
