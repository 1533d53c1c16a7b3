//! Truth tables as pattern-matching tries over ternary symbols.
//!
//! A table-driven node (a LUT or a `.names`-style function) is described by
//! rows pairing an input pattern with an output pattern, where `x` positions
//! in an input pattern are don't-cares. [`TruthTable::build`] compiles the
//! rows into a trie with one edge per ternary symbol; [`TruthTable::resolve`]
//! walks a frontier of trie nodes per input symbol, so a query can match
//! several rows at once through don't-care edges. Conflicting or missing
//! matches degrade to an all-`X` output with a warning rather than stopping
//! the simulation.

use serde::{Deserialize, Serialize};

use strobe_common::{Ternary, TernaryVec};
use strobe_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::error::SimError;

/// Diagnostic code emitted when a lookup matches rows with conflicting outputs.
pub const AMBIGUOUS_MATCH: DiagnosticCode = DiagnosticCode::new(Category::Simulation, 101);

/// Diagnostic code emitted when a lookup matches no row at all.
pub const NO_MATCH: DiagnosticCode = DiagnosticCode::new(Category::Simulation, 102);

/// One row of a truth table: an input pattern and the output pattern it
/// produces.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TableRow {
    /// Input pattern; `x` positions are don't-cares.
    pub inputs: TernaryVec,
    /// Output pattern produced when the input pattern matches.
    pub outputs: TernaryVec,
}

impl TableRow {
    /// Parses a row from its textual form.
    ///
    /// Parsing is total: unrecognized symbols become `X`, which in the input
    /// pattern means don't-care.
    pub fn parse(inputs: &str, outputs: &str) -> Self {
        Self {
            inputs: TernaryVec::from_pattern(inputs),
            outputs: TernaryVec::from_pattern(outputs),
        }
    }
}

/// One trie node.
///
/// Children are keyed by the symbol consumed to reach them; the 2-bit
/// storage encoding of the symbol doubles as the edge index. A node reached
/// by consuming exactly `input_width` symbols is a leaf and carries the
/// distinct output patterns of the rows ending there.
#[derive(Clone, Debug, Default)]
struct Node {
    children: [Option<Box<Node>>; 3],
    outputs: Vec<TernaryVec>,
}

/// Outcome of matching an input vector against a truth table.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Resolution {
    /// Exactly one output pattern matched.
    Unique(TernaryVec),
    /// Rows with conflicting output patterns matched. All distinct
    /// candidate patterns are retained for diagnostics.
    Ambiguous(Vec<TernaryVec>),
    /// No row matched.
    NoMatch,
}

/// An immutable compiled truth table for one combinational node.
///
/// Built once when the netlist is loaded, then shared read-only across
/// simulation workers; lookups need no synchronization.
#[derive(Clone, Debug)]
pub struct TruthTable {
    owner: String,
    input_width: u32,
    output_width: u32,
    root: Node,
    rows: Vec<TableRow>,
}

impl TruthTable {
    /// Compiles `rows` into a trie.
    ///
    /// All rows must agree on input width and on output width; the first row
    /// fixes both. Rows with identical input patterns but different outputs
    /// are accepted here and reported as ambiguous when a lookup actually
    /// reaches them.
    pub fn build(rows: &[TableRow], owner: &str) -> Result<Self, SimError> {
        let first = rows.first().ok_or_else(|| SimError::MalformedTable {
            owner: owner.to_string(),
            reason: "table has no rows".to_string(),
        })?;
        let input_width = first.inputs.width();
        let output_width = first.outputs.width();

        let mut root = Node::default();
        for (index, row) in rows.iter().enumerate() {
            if row.inputs.width() != input_width {
                return Err(SimError::MalformedTable {
                    owner: owner.to_string(),
                    reason: format!(
                        "row {index} has {} input symbols, expected {input_width}",
                        row.inputs.width()
                    ),
                });
            }
            if row.outputs.width() != output_width {
                return Err(SimError::MalformedTable {
                    owner: owner.to_string(),
                    reason: format!(
                        "row {index} has {} output symbols, expected {output_width}",
                        row.outputs.width()
                    ),
                });
            }

            let mut node = &mut root;
            for symbol in row.inputs.iter() {
                node = node.children[child_index(symbol)]
                    .get_or_insert_with(|| Box::new(Node::default()));
            }
            if !node.outputs.contains(&row.outputs) {
                node.outputs.push(row.outputs.clone());
            }
        }

        Ok(Self {
            owner: owner.to_string(),
            input_width,
            output_width,
            root,
            rows: rows.to_vec(),
        })
    }

    /// Matches `input` against the table and reports what was found.
    ///
    /// Walks the trie one symbol at a time, keeping a frontier of reachable
    /// nodes. A concrete `0`/`1` symbol follows its exact edge and the
    /// don't-care edge; an `X` symbol follows only the don't-care edge, so
    /// an unknown input matches a row only where the row itself doesn't
    /// care. An empty input vector matches nothing.
    pub fn resolve(&self, input: &TernaryVec) -> Result<Resolution, SimError> {
        if input.width() != self.input_width {
            return Err(SimError::WidthMismatch {
                owner: self.owner.clone(),
                expected: self.input_width,
                actual: input.width(),
            });
        }
        if input.is_empty() {
            return Ok(Resolution::NoMatch);
        }

        let mut frontier: Vec<&Node> = vec![&self.root];
        for symbol in input.iter() {
            let mut next = Vec::new();
            for node in frontier {
                if let Some(child) = &node.children[child_index(symbol)] {
                    next.push(child.as_ref());
                }
                if symbol != Ternary::X {
                    if let Some(child) = &node.children[child_index(Ternary::X)] {
                        next.push(child.as_ref());
                    }
                }
            }
            if next.is_empty() {
                return Ok(Resolution::NoMatch);
            }
            frontier = next;
        }

        let mut candidates: Vec<TernaryVec> = Vec::new();
        for node in frontier {
            for pattern in &node.outputs {
                if !candidates.contains(pattern) {
                    candidates.push(pattern.clone());
                }
            }
        }
        match candidates.len() {
            0 => Ok(Resolution::NoMatch),
            1 => Ok(Resolution::Unique(candidates.swap_remove(0))),
            _ => Ok(Resolution::Ambiguous(candidates)),
        }
    }

    /// Matches `input` at `cycle` and applies the engine's degradation
    /// policy.
    ///
    /// A unique match returns its output pattern. Ambiguous and missing
    /// matches each emit a warning to `sink`, tagged with the owner node and
    /// `cycle`, and return an all-`X` pattern of the table's output width,
    /// so the simulation continues with every affected output unknown. The
    /// degenerate zero-width lookup returns its sentinel without a warning.
    pub fn lookup(
        &self,
        input: &TernaryVec,
        cycle: i64,
        sink: &DiagnosticSink,
    ) -> Result<TernaryVec, SimError> {
        match self.resolve(input)? {
            Resolution::Unique(pattern) => Ok(pattern),
            Resolution::Ambiguous(candidates) => {
                let listed = candidates
                    .iter()
                    .map(|pattern| pattern.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                sink.emit(
                    Diagnostic::warning(
                        AMBIGUOUS_MATCH,
                        format!("input {input} matches rows with conflicting outputs"),
                    )
                    .with_node(self.owner.as_str())
                    .with_cycle(cycle)
                    .with_note(format!("candidate outputs: {listed}"))
                    .with_note("all outputs forced to x"),
                );
                Ok(TernaryVec::all_x(self.output_width))
            }
            Resolution::NoMatch => {
                if !input.is_empty() {
                    sink.emit(
                        Diagnostic::warning(NO_MATCH, format!("input {input} matches no row"))
                            .with_node(self.owner.as_str())
                            .with_cycle(cycle)
                            .with_note("all outputs forced to x"),
                    );
                }
                Ok(TernaryVec::all_x(self.output_width))
            }
        }
    }

    /// Name of the node this table belongs to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Number of input symbols each row consumes.
    pub fn input_width(&self) -> u32 {
        self.input_width
    }

    /// Number of output symbols each row produces.
    pub fn output_width(&self) -> u32 {
        self.output_width
    }

    /// The rows this table was built from.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}

/// Index of the child edge for a symbol.
fn child_index(symbol: Ternary) -> usize {
    symbol.to_bits() as usize
}
