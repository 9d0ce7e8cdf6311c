//! Simulator configuration
//!
//! Every knob that used to be a module-level constant in older designs
//! lives here, per engine instance.

use qsc_core::NoiseChannel;

/// Configuration for the quantum simulator
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Measurement shots for sampling runs
    ///
    /// Default: 1024
    pub shots: usize,

    /// Optimization level (0-3) applied before execution
    ///
    /// Default: 1
    pub optimization_level: u8,

    /// RNG seed for measurement and stochastic noise
    ///
    /// Two engines with the same seed and input produce identical
    /// outputs. `None` seeds from entropy.
    ///
    /// Default: None
    pub seed: Option<u64>,

    /// Maximum accepted qubit count
    ///
    /// Default: 30 (the state-vector ceiling)
    pub max_qubits: usize,

    /// Qubit count at which gate kernels go data-parallel
    ///
    /// Default: 14
    pub parallel_threshold: usize,

    /// Noise channel applied after each gate, per touched qubit
    ///
    /// Default: None (noiseless)
    pub noise: Option<NoiseChannel>,

    /// Snapshot cache bound
    ///
    /// Default: 16
    pub snapshot_capacity: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            shots: 1024,
            optimization_level: 1,
            seed: None,
            max_qubits: qsc_state::MAX_QUBITS,
            parallel_threshold: 14,
            noise: None,
            snapshot_capacity: 16,
        }
    }
}

impl SimulatorConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shot count
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set the optimization level (clamped to 0..=3)
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(3);
        self
    }

    /// Fix the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the qubit ceiling
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(qsc_state::MAX_QUBITS);
        self
    }

    /// Attach a noise channel
    pub fn with_noise(mut self, noise: NoiseChannel) -> Self {
        self.noise = Some(noise);
        self
    }
}
