//! Gate-by-gate execution engine
//!
//! Owns the state vector, the classical register, and the RNG, and
//! dispatches each gate of a circuit into the state kernels. Conditioned
//! gates consult the classical register; measurements write it. When a
//! noise channel is configured, one stochastic Kraus pick follows each
//! unitary gate per touched qubit.

use crate::config::SimulatorConfig;
use crate::error::{Result, SimulatorError};
use crate::noise_runtime;
use num_complex::Complex64;
use qsc_core::{Circuit, Gate, GateKind, KrausOperator};
use qsc_gates::{matrix_of, GateMatrix};
use qsc_state::{measure_qubit, reset_qubit, QuantumState, SnapshotCache};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Classical bit register
///
/// Holds one measurement outcome per bit. Bit `i` of [`as_u64`] is cbit
/// `i`, matching the qubit bit-ordering convention.
///
/// [`as_u64`]: ClassicalRegister::as_u64
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicalRegister {
    bits: u64,
    width: usize,
}

impl ClassicalRegister {
    /// Create a zeroed register
    pub fn new(width: usize) -> Self {
        Self { bits: 0, width }
    }

    /// Register width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Read one bit
    pub fn get(&self, index: usize) -> bool {
        (self.bits >> index) & 1 == 1
    }

    /// Write one bit (each measurement writes its target once)
    pub fn set(&mut self, index: usize, value: bool) {
        if value {
            self.bits |= 1 << index;
        } else {
            self.bits &= !(1 << index);
        }
    }

    /// The register as an integer, cbit 0 least significant
    pub fn as_u64(&self) -> u64 {
        self.bits
    }

    /// The register as a bitstring, most-significant cbit first
    pub fn bitstring(&self) -> String {
        (0..self.width)
            .rev()
            .map(|i| if self.get(i) { '1' } else { '0' })
            .collect()
    }

    /// Zero every bit
    pub fn clear(&mut self) {
        self.bits = 0;
    }
}

/// Execution engine over one owned quantum state
pub struct ExecutionEngine {
    state: QuantumState,
    classical: ClassicalRegister,
    rng: StdRng,
    noise_operators: Option<Vec<KrausOperator>>,
    snapshots: SnapshotCache,
}

impl ExecutionEngine {
    /// Create an engine for a circuit shape
    ///
    /// # Errors
    /// Fails when the qubit or classical-bit count is out of range or
    /// the configured noise channel is not applicable per-qubit.
    pub fn new(num_qubits: usize, num_clbits: usize, config: &SimulatorConfig) -> Result<Self> {
        if num_clbits > 64 {
            return Err(SimulatorError::InvalidCircuit(
                qsc_core::QuantumError::ValidationError(
                    "classical registers wider than 64 bits are not supported".to_string(),
                ),
            ));
        }
        let mut state = QuantumState::new(num_qubits)?;
        state.set_parallel_threshold(config.parallel_threshold);

        let noise_operators = match &config.noise {
            Some(channel) => {
                if channel.num_qubits() != 1 {
                    return Err(SimulatorError::UnsupportedNoise {
                        reason: format!(
                            "channel '{}' acts on {} qubits; per-gate noise is single-qubit",
                            channel.name(),
                            channel.num_qubits()
                        ),
                    });
                }
                Some(channel.kraus_operators())
            }
            None => None,
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            state,
            classical: ClassicalRegister::new(num_clbits),
            rng,
            noise_operators,
            snapshots: SnapshotCache::new(config.snapshot_capacity),
        })
    }

    /// Create an engine with a specific RNG (shot sampling)
    pub(crate) fn with_rng(
        num_qubits: usize,
        num_clbits: usize,
        config: &SimulatorConfig,
        rng: StdRng,
    ) -> Result<Self> {
        let mut engine = Self::new(num_qubits, num_clbits, config)?;
        engine.rng = rng;
        Ok(engine)
    }

    /// The quantum state
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// The classical register
    pub fn classical(&self) -> &ClassicalRegister {
        &self.classical
    }

    /// The snapshot cache
    pub fn snapshots(&self) -> &SnapshotCache {
        &self.snapshots
    }

    /// Save the current state under `label`
    pub fn save_snapshot(&mut self, label: impl Into<String>) {
        self.snapshots.save(label, &self.state);
    }

    /// Restore the state saved under `label`
    ///
    /// # Errors
    /// `CacheMiss` for unknown labels, `DimensionMismatch` on width
    /// disagreement.
    pub fn restore_snapshot(&mut self, label: &str) -> Result<()> {
        self.snapshots.restore(label, &mut self.state)?;
        Ok(())
    }

    /// Consume the engine, yielding the final state and register
    pub fn into_parts(self) -> (QuantumState, ClassicalRegister) {
        (self.state, self.classical)
    }

    /// Reset the state to |0…0⟩ and clear the classical register
    pub fn reset(&mut self) {
        self.state.reset_all();
        self.classical.clear();
    }

    /// Execute a whole circuit
    pub fn execute(&mut self, circuit: &Circuit) -> Result<()> {
        for gate in circuit.gates() {
            self.execute_gate(gate)?;
        }
        Ok(())
    }

    /// Execute one gate
    pub fn execute_gate(&mut self, gate: &Gate) -> Result<()> {
        if let Some(condition) = gate.condition() {
            if self.classical.as_u64() & condition.mask != condition.value {
                return Ok(());
            }
        }

        let qubits: Vec<usize> = gate.qubits().iter().map(|q| q.index()).collect();
        match gate.kind() {
            GateKind::Measure => {
                let Some(cbit) = gate.cbit() else {
                    return Err(SimulatorError::InvalidCircuit(
                        qsc_core::QuantumError::ValidationError(
                            "measurement without a target classical bit".to_string(),
                        ),
                    ));
                };
                if cbit.index() >= self.classical.width() {
                    return Err(SimulatorError::ClbitOutOfRange {
                        cbit: cbit.index(),
                        width: self.classical.width(),
                    });
                }
                let random = self.rng.gen::<f64>();
                let outcome = measure_qubit(&mut self.state, qubits[0], random)?;
                self.classical.set(cbit.index(), outcome);
                return Ok(());
            }
            GateKind::Reset => {
                let random = self.rng.gen::<f64>();
                reset_qubit(&mut self.state, qubits[0], random)?;
                return Ok(());
            }
            GateKind::Barrier => return Ok(()),

            // Dedicated kernels for the hot controlled gates
            GateKind::Cnot => self.state.apply_cnot(qubits[0], qubits[1])?,
            GateKind::Cz => self.state.apply_cz(qubits[0], qubits[1])?,

            kind if kind.is_diagonal() => {
                let matrix = match matrix_of(kind, gate.params()) {
                    Some(GateMatrix::One(m)) => m,
                    _ => unreachable!("diagonal kinds are single-qubit unitaries"),
                };
                let diagonal: [Complex64; 2] = [matrix[0][0], matrix[1][1]];
                self.state.apply_diagonal(diagonal, qubits[0])?;
            }

            kind => match matrix_of(kind, gate.params()) {
                Some(GateMatrix::One(m)) => self.state.apply_single(&m, qubits[0])?,
                Some(GateMatrix::Two(m)) => self.state.apply_two(&m, qubits[0], qubits[1])?,
                Some(GateMatrix::Three(m)) => {
                    self.state
                        .apply_three(&m, qubits[0], qubits[1], qubits[2])?
                }
                Some(GateMatrix::Dyn(custom)) => {
                    self.state.apply_custom(custom.matrix(), &qubits)?
                }
                None => unreachable!("non-unitary kinds handled above"),
            },
        }

        if let Some(operators) = &self.noise_operators {
            for &qubit in &qubits {
                let random = self.rng.gen::<f64>();
                noise_runtime::apply_stochastic(&mut self.state, operators, qubit, random)?;
            }
        }
        Ok(())
    }
}
