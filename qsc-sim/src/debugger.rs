//! Gate-level debugger
//!
//! Drives an engine one gate at a time over a frozen circuit, with
//! breakpoints evaluated against the live state. A `step` always
//! advances one gate; `continue_run` stops after the first step whose
//! breakpoint set fires.

use crate::config::SimulatorConfig;
use crate::engine::ExecutionEngine;
use crate::error::{Result, SimulatorError};
use crate::linalg;
use qsc_core::Circuit;
use qsc_state::QuantumState;
use std::fmt;

/// Predicate evaluated against the live state
pub type StatePredicate = Box<dyn Fn(&QuantumState) -> bool>;

/// Breakpoint kinds
pub enum BreakpointKind {
    /// Stop when execution reaches gate `index` (before applying it)
    Gate(usize),
    /// Stop when P(qubit = 1) exceeds `threshold`
    Probability { qubit: usize, threshold: f64 },
    /// Stop when a user predicate holds
    Custom(StatePredicate),
}

/// A registered breakpoint
pub struct Breakpoint {
    pub kind: BreakpointKind,
    pub description: String,
}

impl fmt::Debug for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            BreakpointKind::Gate(i) => format!("gate {i}"),
            BreakpointKind::Probability { qubit, threshold } => {
                format!("P(q{qubit}=1) > {threshold}")
            }
            BreakpointKind::Custom(_) => "custom".to_string(),
        };
        write!(f, "Breakpoint({kind}: {})", self.description)
    }
}

/// Step-wise executor with breakpoints and state inspection
///
/// # Example
/// ```
/// use qsc_core::Circuit;
/// use qsc_sim::{Debugger, SimulatorConfig};
///
/// let mut circuit = Circuit::new(2, 0).unwrap();
/// circuit.h(0).unwrap();
/// circuit.cx(0, 1).unwrap();
///
/// let mut debugger = Debugger::new(&circuit, SimulatorConfig::new().with_seed(1)).unwrap();
/// while debugger.step().unwrap() {}
/// assert!((debugger.entanglement(0, 1).unwrap() - 1.0).abs() < 1e-6);
/// ```
pub struct Debugger<'a> {
    circuit: &'a Circuit,
    engine: ExecutionEngine,
    config: SimulatorConfig,
    position: usize,
    breakpoints: Vec<Breakpoint>,
}

impl<'a> Debugger<'a> {
    /// Create a debugger over a frozen circuit
    pub fn new(circuit: &'a Circuit, config: SimulatorConfig) -> Result<Self> {
        let engine = ExecutionEngine::new(circuit.num_qubits(), circuit.num_clbits(), &config)?;
        Ok(Self {
            circuit,
            engine,
            config,
            position: 0,
            breakpoints: Vec::new(),
        })
    }

    /// Current gate index (the next gate to execute)
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every gate has been executed
    pub fn is_finished(&self) -> bool {
        self.position >= self.circuit.len()
    }

    /// The live state
    pub fn state(&self) -> &QuantumState {
        self.engine.state()
    }

    /// Execute one gate and advance
    ///
    /// Returns `false` when the circuit is already finished. A fresh
    /// `step` always advances, breakpoints or not.
    pub fn step(&mut self) -> Result<bool> {
        let Some(gate) = self.circuit.get(self.position) else {
            return Ok(false);
        };
        self.engine.execute_gate(gate)?;
        self.position += 1;
        Ok(true)
    }

    /// Run until a breakpoint fires or the circuit ends
    ///
    /// After each step every breakpoint is evaluated in registration
    /// order; the index of the first that holds is returned.
    pub fn continue_run(&mut self) -> Result<Option<usize>> {
        while self.step()? {
            if let Some(index) = self.first_firing_breakpoint() {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Rewind to gate 0 with a fresh |0…0⟩ state
    ///
    /// The RNG is re-seeded from the configuration, so a reset replay of
    /// a seeded session reproduces itself.
    pub fn reset(&mut self) -> Result<()> {
        self.engine = ExecutionEngine::new(
            self.circuit.num_qubits(),
            self.circuit.num_clbits(),
            &self.config,
        )?;
        self.position = 0;
        Ok(())
    }

    // ---- breakpoints ----------------------------------------------------

    /// Stop when execution reaches gate `index`
    pub fn add_gate_breakpoint(&mut self, index: usize) {
        self.breakpoints.push(Breakpoint {
            kind: BreakpointKind::Gate(index),
            description: format!("break at gate {index}"),
        });
    }

    /// Stop when P(qubit = 1) exceeds `threshold`
    pub fn add_probability_breakpoint(&mut self, qubit: usize, threshold: f64) {
        self.breakpoints.push(Breakpoint {
            kind: BreakpointKind::Probability { qubit, threshold },
            description: format!("P(q{qubit}=1) > {threshold}"),
        });
    }

    /// Stop when `predicate` holds on the live state
    pub fn add_custom_breakpoint(
        &mut self,
        predicate: impl Fn(&QuantumState) -> bool + 'static,
        description: impl Into<String>,
    ) {
        self.breakpoints.push(Breakpoint {
            kind: BreakpointKind::Custom(Box::new(predicate)),
            description: description.into(),
        });
    }

    /// Remove the breakpoint at `index` in registration order
    pub fn remove_breakpoint(&mut self, index: usize) {
        if index < self.breakpoints.len() {
            self.breakpoints.remove(index);
        }
    }

    /// Drop every breakpoint
    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    /// The registered breakpoints in registration order
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    fn first_firing_breakpoint(&self) -> Option<usize> {
        self.breakpoints.iter().position(|bp| match &bp.kind {
            BreakpointKind::Gate(index) => self.position == *index,
            BreakpointKind::Probability { qubit, threshold } => self
                .engine
                .state()
                .qubit_probability(*qubit, true)
                .is_ok_and(|p| p > *threshold),
            BreakpointKind::Custom(predicate) => predicate(self.engine.state()),
        })
    }

    // ---- inspection -----------------------------------------------------

    /// Probability of every basis state
    pub fn state_probabilities(&self) -> Vec<f64> {
        self.engine.state().probabilities()
    }

    /// Probability that `qubit` measures as `value`
    pub fn qubit_probability(&self, qubit: usize, value: bool) -> Result<f64> {
        Ok(self.engine.state().qubit_probability(qubit, value)?)
    }

    /// Concurrence between two qubits
    ///
    /// Traces the live state down to the (q1, q2) density matrix and
    /// evaluates the Wootters formula: 0 for product states, 1 for a
    /// maximally entangled pair.
    pub fn entanglement(&self, q1: usize, q2: usize) -> Result<f64> {
        let n = self.engine.state().num_qubits();
        for q in [q1, q2] {
            if q >= n {
                return Err(SimulatorError::State(
                    qsc_state::StateError::InvalidQubitIndex {
                        index: q,
                        num_qubits: n,
                    },
                ));
            }
        }
        if q1 == q2 {
            return Err(SimulatorError::State(
                qsc_state::StateError::DuplicateQubit { qubit: q1 },
            ));
        }

        let rho = linalg::reduced_density_two(self.engine.state().amplitudes(), q1, q2);
        Ok(linalg::concurrence(&rho))
    }

    /// Human-readable summary of the current position and state
    pub fn state_info(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "position: {}/{}\n",
            self.position,
            self.circuit.len()
        ));
        match self.circuit.get(self.position) {
            Some(gate) => out.push_str(&format!("next: {gate}\n")),
            None => out.push_str("next: (end of circuit)\n"),
        }

        let n = self.engine.state().num_qubits();
        out.push_str("state:\n");
        for (index, amp) in self.engine.state().amplitudes().iter().enumerate() {
            let probability = amp.norm_sqr();
            if probability < 1e-10 {
                continue;
            }
            out.push_str(&format!(
                "  |{index:0width$b}⟩  {:+.4}{:+.4}i  (p={probability:.4})\n",
                amp.re,
                amp.im,
                width = n
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bell_circuit() -> Circuit {
        let mut circuit = Circuit::new(2, 0).unwrap();
        circuit.h(0).unwrap();
        circuit.cx(0, 1).unwrap();
        circuit
    }

    fn debugger(circuit: &Circuit) -> Debugger<'_> {
        Debugger::new(circuit, SimulatorConfig::new().with_seed(17)).unwrap()
    }

    #[test]
    fn test_stepping() {
        let circuit = bell_circuit();
        let mut dbg = debugger(&circuit);

        assert_eq!(dbg.position(), 0);
        assert!(dbg.step().unwrap());
        assert_relative_eq!(dbg.qubit_probability(0, true).unwrap(), 0.5, epsilon = 1e-12);

        assert!(dbg.step().unwrap());
        assert!(dbg.is_finished());
        assert!(!dbg.step().unwrap());
    }

    #[test]
    fn test_gate_breakpoint_stops_continue() {
        let mut circuit = Circuit::new(1, 0).unwrap();
        circuit.x(0).unwrap();
        circuit.x(0).unwrap();
        circuit.x(0).unwrap();

        let mut dbg = Debugger::new(&circuit, SimulatorConfig::new().with_seed(1)).unwrap();
        dbg.add_gate_breakpoint(2);

        let hit = dbg.continue_run().unwrap();
        assert_eq!(hit, Some(0));
        assert_eq!(dbg.position(), 2);

        // Continue to the end: no further breakpoint fires.
        assert_eq!(dbg.continue_run().unwrap(), None);
        assert!(dbg.is_finished());
    }

    #[test]
    fn test_probability_breakpoint() {
        let circuit = bell_circuit();
        let mut dbg = debugger(&circuit);
        dbg.add_probability_breakpoint(0, 0.4);

        // Fires after the Hadamard (P = 0.5 > 0.4).
        let hit = dbg.continue_run().unwrap();
        assert_eq!(hit, Some(0));
        assert_eq!(dbg.position(), 1);
    }

    #[test]
    fn test_custom_breakpoint_and_order() {
        let circuit = bell_circuit();
        let mut dbg = debugger(&circuit);
        dbg.add_custom_breakpoint(|_| true, "always");
        dbg.add_probability_breakpoint(0, 0.0);

        // Registration order decides which index reports.
        let hit = dbg.continue_run().unwrap();
        assert_eq!(hit, Some(0));
        assert_eq!(dbg.breakpoints().len(), 2);
    }

    #[test]
    fn test_step_ignores_breakpoints() {
        let circuit = bell_circuit();
        let mut dbg = debugger(&circuit);
        dbg.add_gate_breakpoint(1);

        assert!(dbg.step().unwrap());
        assert!(dbg.step().unwrap());
        assert!(dbg.is_finished());
    }

    #[test]
    fn test_remove_and_clear_breakpoints() {
        let circuit = bell_circuit();
        let mut dbg = debugger(&circuit);
        dbg.add_gate_breakpoint(1);
        dbg.add_gate_breakpoint(2);

        dbg.remove_breakpoint(0);
        assert_eq!(dbg.breakpoints().len(), 1);
        dbg.clear_breakpoints();
        assert!(dbg.breakpoints().is_empty());
    }

    #[test]
    fn test_reset_restarts() {
        let circuit = bell_circuit();
        let mut dbg = debugger(&circuit);
        while dbg.step().unwrap() {}

        dbg.reset().unwrap();
        assert_eq!(dbg.position(), 0);
        assert_relative_eq!(dbg.state_probabilities()[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_entanglement_of_bell_pair() {
        let circuit = bell_circuit();
        let mut dbg = debugger(&circuit);

        // Product state before any gate
        assert_relative_eq!(dbg.entanglement(0, 1).unwrap(), 0.0, epsilon = 1e-6);

        while dbg.step().unwrap() {}
        assert_relative_eq!(dbg.entanglement(0, 1).unwrap(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_entanglement_validates_qubits() {
        let circuit = bell_circuit();
        let dbg = debugger(&circuit);
        assert!(dbg.entanglement(0, 5).is_err());
        assert!(dbg.entanglement(1, 1).is_err());
    }

    #[test]
    fn test_state_info_lists_significant_amplitudes() {
        let circuit = bell_circuit();
        let mut dbg = debugger(&circuit);
        while dbg.step().unwrap() {}

        let info = dbg.state_info();
        assert!(info.contains("|00⟩"));
        assert!(info.contains("|11⟩"));
        assert!(!info.contains("|01⟩"));
        assert!(info.contains("p=0.5000"));
    }
}
