//! Error types for simulation

use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Coarse error class, used by callers to map errors to exit codes
///
/// `User` failures (exit code 1) come from the program being simulated;
/// `Runtime` failures (exit code 2) come from resources or numerics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    User,
    Runtime,
}

/// Errors that can occur while executing circuits
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// Circuit failed validation before execution
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(#[from] qsc_core::QuantumError),

    /// Too many qubits for this configuration
    #[error("Too many qubits: circuit has {num_qubits}, configured maximum is {max_qubits}")]
    TooManyQubits {
        num_qubits: usize,
        max_qubits: usize,
    },

    /// Circuit optimization failed (internal)
    #[error("Optimization failed: {0}")]
    OptimizationFailed(String),

    /// State-vector operation failed
    #[error("State error: {0}")]
    State(#[from] qsc_state::StateError),

    /// A measurement wrote to a classical bit outside the register
    #[error("Classical bit {cbit} out of range for register of width {width}")]
    ClbitOutOfRange { cbit: usize, width: usize },

    /// The configured noise channel cannot be applied per-qubit
    #[error("Unsupported noise channel: {reason}")]
    UnsupportedNoise { reason: String },

    /// Debugger stepped past the end of the circuit
    #[error("Execution position {position} is past the end of the circuit ({len} gates)")]
    PastEnd { position: usize, len: usize },
}

impl SimulatorError {
    /// Classify for exit-code mapping
    pub fn class(&self) -> ErrorClass {
        match self {
            SimulatorError::InvalidCircuit(_)
            | SimulatorError::ClbitOutOfRange { .. }
            | SimulatorError::UnsupportedNoise { .. } => ErrorClass::User,
            SimulatorError::TooManyQubits { .. }
            | SimulatorError::OptimizationFailed(_)
            | SimulatorError::State(_)
            | SimulatorError::PastEnd { .. } => ErrorClass::Runtime,
        }
    }
}
