//! Error types for circuit construction and validation

use crate::QubitId;
use thiserror::Error;

/// Errors that can occur while building or validating circuits
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantumError {
    /// Invalid qubit index used
    #[error("Invalid qubit index {0}: circuit has only {1} qubits")]
    InvalidQubit(usize, usize),

    /// Invalid classical bit index used
    #[error("Invalid classical bit index {0}: circuit has only {1} classical bits")]
    InvalidClbit(usize, usize),

    /// Gate applied to wrong number of qubits
    #[error("Gate '{gate}' requires {expected} qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Gate given the wrong number of parameters
    #[error("Gate '{gate}' requires {expected} parameters, but {actual} were provided")]
    InvalidParamCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Duplicate qubit in gate operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(QubitId),

    /// Circuit has no qubits
    #[error("Circuit must have at least one qubit")]
    EmptyCircuit,

    /// Qubit count exceeds the configured maximum
    #[error("Too many qubits: {num_qubits} exceeds the maximum of {max_qubits}")]
    TooManyQubits {
        num_qubits: usize,
        max_qubits: usize,
    },

    /// Custom gate matrix is not unitary
    #[error("Matrix for gate '{name}' is not unitary (deviation {deviation:.3e})")]
    NonUnitary { name: String, deviation: f64 },

    /// Matrix dimension doesn't match the qubit count
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Noise channel parameter out of range
    #[error("Noise parameter '{name}' must be in [{min}, {max}], got {value}")]
    InvalidNoiseParameter {
        name: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    /// Kraus operator set violates the completeness relation
    #[error("Kraus operators violate completeness Σ Kᵢ†Kᵢ = I (deviation {deviation:.3e})")]
    KrausCompleteness { deviation: f64 },

    /// Generic circuit validation error
    #[error("Circuit validation failed: {0}")]
    ValidationError(String),
}

impl QuantumError {
    /// Create an invalid qubit error
    pub fn invalid_qubit(qubit: usize, num_qubits: usize) -> Self {
        Self::InvalidQubit(qubit, num_qubits)
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }

    /// Create an invalid parameter count error
    pub fn invalid_param_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidParamCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }
}
