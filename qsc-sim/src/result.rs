//! Simulation results and shot counts

use crate::engine::ClassicalRegister;
use ahash::AHashMap;
use qsc_state::QuantumState;
use std::time::Duration;

/// Outcome of a single circuit execution
pub struct SimulationResult {
    /// Final quantum state
    state: QuantumState,
    /// Final classical register
    classical: ClassicalRegister,
    /// Execution statistics
    pub stats: ExecutionStats,
}

/// Timing and size statistics for one run
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    /// Gate count before optimization
    pub gates_in: usize,
    /// Gate count actually executed
    pub gates_executed: usize,
    /// Time spent optimizing
    pub optimization_time: Duration,
    /// Time spent applying gates
    pub execution_time: Duration,
}

impl SimulationResult {
    pub(crate) fn new(
        state: QuantumState,
        classical: ClassicalRegister,
        stats: ExecutionStats,
    ) -> Self {
        Self {
            state,
            classical,
            stats,
        }
    }

    /// The final state vector
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// Number of qubits simulated
    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    /// The final classical register
    pub fn classical(&self) -> &ClassicalRegister {
        &self.classical
    }

    /// Basis-state probabilities of the final state
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }
}

/// Measurement counts over a batch of shots
///
/// Keys are classical-register bitstrings, most-significant cbit first.
#[derive(Debug, Clone, Default)]
pub struct Counts {
    counts: AHashMap<String, usize>,
    shots: usize,
}

impl Counts {
    /// Create an empty counts table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one shot outcome
    pub fn record(&mut self, bitstring: String) {
        *self.counts.entry(bitstring).or_insert(0) += 1;
        self.shots += 1;
    }

    /// Total shots recorded
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Count for one outcome
    pub fn get(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Empirical probability of one outcome
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / self.shots as f64
        }
    }

    /// Iterate outcomes and counts
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Outcomes sorted by count, descending
    pub fn sorted(&self) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> =
            self.counts.iter().map(|(k, &v)| (k.clone(), v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// The most frequent outcome
    pub fn most_frequent(&self) -> Option<(String, usize)> {
        self.sorted().into_iter().next()
    }
}
