//! Dense state-vector engine for the QSC simulator
//!
//! Owns the 2ⁿ complex amplitudes and provides the primitive operations
//! the execution engine drives: gate application (1/2/3/k-qubit),
//! measurement with collapse, reset, and a bounded snapshot cache with
//! binary persistence.

pub mod dense_state;
pub mod error;
pub mod kernels;
pub mod measurement;
pub mod snapshot;
pub mod state_vector;

pub use dense_state::QuantumState;
pub use error::StateError;
pub use measurement::{measure_qubit, reset_qubit, UNDERFLOW_THRESHOLD};
pub use snapshot::{Snapshot, SnapshotCache, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use state_vector::{StateVector, MAX_QUBITS};
