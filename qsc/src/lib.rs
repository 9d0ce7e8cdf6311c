//! QSC: an OpenQASM 2.0 compiler and dense state-vector simulator
//!
//! This umbrella crate re-exports the whole workspace:
//!
//! - [`qsc_core`] — circuit IR, gate model, noise model
//! - [`qsc_gates`] — gate matrix tables and synthesis
//! - [`qsc_parser`] — OpenQASM 2.0 front end and printer
//! - [`qsc_compiler`] — circuit optimizer (levels `O0..O3`)
//! - [`qsc_state`] — dense state vector, kernels, snapshots
//! - [`qsc_sim`] — execution engine, noise runtime, debugger
//!
//! # Quick Start
//!
//! ```
//! use qsc::{parse, Simulator, SimulatorConfig};
//!
//! let circuit = parse(r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     measure q -> c;
//! "#).unwrap();
//!
//! let simulator = Simulator::new(SimulatorConfig::new().with_seed(1));
//! let counts = simulator.sample(&circuit, 100).unwrap();
//! assert_eq!(counts.shots(), 100);
//! ```

pub mod algorithms;

pub use qsc_compiler::{optimize, OptimizationLevel};
pub use qsc_core::{
    Circuit, ClbitId, Complex64, CustomGate, Gate, GateKind, KrausOperator, NoiseChannel,
    QuantumError, QubitId, MAX_QUBITS,
};
pub use qsc_gates::{matrix_of, GateMatrix};
pub use qsc_parser::{emit, parse, parse_with_includes, ParseError};
pub use qsc_sim::{
    ClassicalRegister, Counts, Debugger, SimulationResult, Simulator, SimulatorConfig,
    SimulatorError,
};
pub use qsc_state::{QuantumState, SnapshotCache};
