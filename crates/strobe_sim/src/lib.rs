//! Cycle-based gate-level simulation core for the Strobe simulator.
//!
//! This crate implements the value-storage and combinational-evaluation
//! layer of a cycle-based digital-logic simulator: per-signal rolling
//! histories of 3-state values shared across worker threads, and truth
//! tables compiled into don't-care-aware pattern tries.
//!
//! # Architecture
//!
//! The engine driving a simulation owns the netlist and the schedule; this
//! crate owns the values. Each signal carries a [`CycleBuffer`] holding its
//! last few cycle values behind a spin lock, so workers evaluating disjoint
//! node sets can read and write shared signals without engine-level
//! ordering. Each table-driven node carries an immutable [`TruthTable`] that
//! workers query lock-free. Value-level anomalies (unknown inputs, ambiguous
//! or missing table matches) never abort the run: they degrade to `X` and
//! leave a warning in the [`DiagnosticSink`].
//!
//! # Usage
//!
//! ```ignore
//! use strobe_sim::{evaluate_table_node, CycleBuffer, TableRow, TruthTable};
//!
//! let table = TruthTable::build(&rows, "top.alu.lut_3")?;
//! for cycle in 0..cycles {
//!     evaluate_table_node(&table, &input_pins, &output_pins, cycle, &sink)?;
//! }
//! ```
//!
//! # Modules
//!
//! - `error` — Simulation error types
//! - `history` — Concurrent per-signal rolling value history
//! - `table` — Truth-table tries and don't-care matching

#![warn(missing_docs)]

pub mod error;
pub mod history;
pub mod table;

use strobe_common::TernaryVec;
use strobe_diagnostics::DiagnosticSink;

pub use error::SimError;
pub use history::{CycleBuffer, HISTORY_DEPTH, MAX_CYCLE_DRIFT};
pub use table::{Resolution, TableRow, TruthTable, AMBIGUOUS_MATCH, NO_MATCH};

/// Evaluates one table-driven node for one cycle.
///
/// Reads each input pin's value for `cycle`, resolves the table, and writes
/// the resulting output symbols to the output pins' buffers for the same
/// cycle. Ambiguous and missing matches degrade to all-`X` outputs with a
/// warning in `sink` naming the node and `cycle`; a disagreement between
/// the input pin count and the
/// table's input width surfaces as [`SimError::WidthMismatch`].
///
/// The caller must pass exactly `table.output_width()` output pins.
pub fn evaluate_table_node(
    table: &TruthTable,
    inputs: &[&CycleBuffer],
    outputs: &[&CycleBuffer],
    cycle: i64,
    sink: &DiagnosticSink,
) -> Result<(), SimError> {
    assert_eq!(
        outputs.len(),
        table.output_width() as usize,
        "output pin count must match table output width"
    );
    let input: TernaryVec = inputs.iter().map(|pin| pin.value_at(cycle)).collect();
    let output = table.lookup(&input, cycle, sink)?;
    for (i, pin) in outputs.iter().enumerate() {
        pin.update_value(cycle, output.get(i as u32));
    }
    Ok(())
}
