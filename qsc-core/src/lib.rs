//! Core types for the QSC quantum compiler and simulator
//!
//! This crate provides the foundations the rest of the workspace builds
//! on: the closed gate taxonomy, the circuit intermediate representation,
//! and the Kraus noise model.
//!
//! # Quick Start
//!
//! ```
//! use qsc_core::Circuit;
//!
//! // Bell pair
//! let mut circuit = Circuit::new(2, 2).unwrap();
//! circuit.h(0).unwrap();
//! circuit.cx(0, 1).unwrap();
//! circuit.measure(0, 0).unwrap();
//! circuit.measure(1, 1).unwrap();
//!
//! assert_eq!(circuit.depth(), 3);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod matrix;
pub mod noise;
pub mod qubit;
pub mod serialize;

pub use circuit::{Circuit, TraversalNode, MAX_QUBITS};
pub use error::QuantumError;
pub use gate::{Condition, CustomGate, Gate, GateKind, MergeAxis};
pub use noise::{KrausOperator, NoiseChannel};
pub use num_complex::Complex64;
pub use qubit::{ClbitId, QubitId};
pub use serialize::{to_json, JsonCircuit};

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, QuantumError>;
