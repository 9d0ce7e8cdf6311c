//! Error types for state-vector operations

use thiserror::Error;

/// Errors that can occur during state-vector operations
#[derive(Error, Debug)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Two operands of a multi-qubit gate refer to the same qubit
    #[error("Qubit {qubit} appears twice in a multi-qubit gate")]
    DuplicateQubit { qubit: usize },

    /// Qubit count exceeds the supported maximum
    #[error("Too many qubits: {num_qubits} exceeds the maximum of {max_qubits}")]
    TooManyQubits {
        num_qubits: usize,
        max_qubits: usize,
    },

    /// Dimension mismatch between a matrix or snapshot and the state
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Custom matrix is not unitary
    #[error("Custom matrix is not unitary (deviation {deviation:.3e})")]
    NonUnitary { deviation: f64 },

    /// Measurement hit a branch of vanishing probability
    #[error("Measurement underflow: outcome probability {probability:.3e} below 1e-12")]
    Underflow { probability: f64 },

    /// Snapshot label not present in the cache
    #[error("No snapshot named '{label}' in the cache")]
    CacheMiss { label: String },

    /// Snapshot file is malformed
    #[error("Invalid snapshot file: {reason}")]
    BadSnapshotFile { reason: String },

    /// I/O failure while persisting or loading snapshots
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for state-vector operations
pub type Result<T> = std::result::Result<T, StateError>;
