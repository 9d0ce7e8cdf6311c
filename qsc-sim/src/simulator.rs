//! High-level simulator
//!
//! Validates, optimizes, and executes circuits. `run` performs one
//! execution and returns the final state; `sample` re-executes the
//! circuit per shot (mid-circuit measurement safe) and aggregates the
//! classical-register outcomes.

use crate::config::SimulatorConfig;
use crate::engine::ExecutionEngine;
use crate::error::{Result, SimulatorError};
use crate::result::{Counts, ExecutionStats, SimulationResult};
use qsc_core::Circuit;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::info;

/// Quantum circuit simulator
///
/// # Example
/// ```
/// use qsc_core::Circuit;
/// use qsc_sim::{Simulator, SimulatorConfig};
///
/// let mut circuit = Circuit::new(2, 2).unwrap();
/// circuit.h(0).unwrap();
/// circuit.cx(0, 1).unwrap();
/// circuit.measure(0, 0).unwrap();
/// circuit.measure(1, 1).unwrap();
///
/// let simulator = Simulator::new(SimulatorConfig::new().with_seed(11));
/// let counts = simulator.sample(&circuit, 100).unwrap();
/// assert_eq!(counts.get("00") + counts.get("11"), 100);
/// ```
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator with the given configuration
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The configuration
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Execute a circuit once
    ///
    /// An empty circuit is a no-op and yields |0…0⟩.
    ///
    /// # Errors
    /// Fails on invalid circuits, qubit counts beyond the configured
    /// maximum, measurement underflow, and unsupported noise channels.
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationResult> {
        let (compiled, mut stats) = self.prepare(circuit)?;

        let mut engine =
            ExecutionEngine::new(compiled.num_qubits(), compiled.num_clbits(), &self.config)?;

        let started = Instant::now();
        engine.execute(&compiled)?;
        stats.execution_time = started.elapsed();

        info!(
            qubits = compiled.num_qubits(),
            gates = stats.gates_executed,
            "circuit executed"
        );

        let (state, classical) = engine.into_parts();
        Ok(SimulationResult::new(state, classical, stats))
    }

    /// Execute a circuit `shots` times and count cbit outcomes
    ///
    /// Each shot runs the full circuit on a fresh |0…0⟩ state with an
    /// independent RNG stream derived from the configured seed, so mid-
    /// circuit measurement and conditioned gates behave per shot.
    pub fn sample(&self, circuit: &Circuit, shots: usize) -> Result<Counts> {
        let (compiled, _) = self.prepare(circuit)?;

        let mut seed_source = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut counts = Counts::new();
        for _ in 0..shots {
            let shot_rng = StdRng::seed_from_u64(seed_source.gen());
            let mut engine = ExecutionEngine::with_rng(
                compiled.num_qubits(),
                compiled.num_clbits(),
                &self.config,
                shot_rng,
            )?;
            engine.execute(&compiled)?;
            counts.record(engine.classical().bitstring());
        }
        Ok(counts)
    }

    /// Validate and optimize a circuit for execution
    fn prepare(&self, circuit: &Circuit) -> Result<(Circuit, ExecutionStats)> {
        circuit.validate()?;
        if circuit.num_qubits() > self.config.max_qubits {
            return Err(SimulatorError::TooManyQubits {
                num_qubits: circuit.num_qubits(),
                max_qubits: self.config.max_qubits,
            });
        }

        let mut stats = ExecutionStats {
            gates_in: circuit.len(),
            ..Default::default()
        };

        let started = Instant::now();
        let compiled = if self.config.optimization_level > 0 {
            qsc_compiler::optimize(circuit, self.config.optimization_level)
                .map_err(|e| SimulatorError::OptimizationFailed(e.to_string()))?
        } else {
            circuit.clone()
        };
        stats.optimization_time = started.elapsed();
        stats.gates_executed = compiled.len();

        Ok((compiled, stats))
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}
