//! Optimization pass trait and shared commutation rules

use qsc_core::{Circuit, Gate, Result};

mod cancellation;
mod commutation;
mod depth_layering;
mod qubit_remap;
mod rotation_merge;

pub use cancellation::Cancellation;
pub use commutation::Commutation;
pub use depth_layering::DepthLayering;
pub use qubit_remap::QubitRemap;
pub use rotation_merge::RotationMerge;

/// A circuit rewrite pass
///
/// Passes are pure transforms on the gate sequence. The driver runs the
/// rewrite passes to a fixed point and the scheduling passes once, so a
/// pass must return `Ok(false)` whenever it leaves the circuit unchanged.
pub trait OptimizationPass: Send + Sync {
    /// Pass name for statistics and logs
    fn name(&self) -> &str;

    /// Apply the pass in place
    ///
    /// Returns whether the circuit was modified.
    ///
    /// # Errors
    /// Pass invariant violations are internal errors; the pipeline
    /// reports the first one and leaves the caller's circuit untouched.
    fn apply(&self, circuit: &mut Circuit) -> Result<bool>;
}

/// Statistics about one pass execution
#[derive(Debug, Clone)]
pub struct PassStatistics {
    /// Pass name
    pub pass_name: String,
    /// Fixed-point iteration the pass ran in (0-based)
    pub iteration: usize,
    /// Time spent, microseconds
    pub time_us: u64,
    /// Whether the pass modified the circuit
    pub modified: bool,
}

/// Result of running the optimization pipeline
#[derive(Debug, Clone, Default)]
pub struct OptimizationResult {
    /// Whether any pass modified the circuit
    pub modified: bool,
    /// Per-pass statistics in execution order
    pub pass_stats: Vec<PassStatistics>,
    /// Total pipeline time, microseconds
    pub total_time_us: u64,
}

impl OptimizationResult {
    /// Record one pass execution
    pub fn add_pass_stats(&mut self, stats: PassStatistics) {
        self.modified |= stats.modified;
        self.pass_stats.push(stats);
    }
}

/// Whether two gates commute for rewriting purposes
///
/// Conservative rule set:
/// - gates on disjoint qubits always commute;
/// - two plain unitaries on the same single qubit commute when both are
///   diagonal or both lie on the X axis;
/// - everything else (including measurements, resets, barriers, and
///   classically-conditioned gates that share a qubit) does not.
pub(crate) fn gates_commute(a: &Gate, b: &Gate) -> bool {
    if !a.overlaps(b) {
        return true;
    }
    if !a.is_plain_unitary() || !b.is_plain_unitary() {
        return false;
    }
    if a.num_qubits() == 1 && b.num_qubits() == 1 && a.qubits() == b.qubits() {
        let (ka, kb) = (a.kind(), b.kind());
        return (ka.is_diagonal() && kb.is_diagonal()) || (ka.is_x_axis() && kb.is_x_axis());
    }
    false
}
