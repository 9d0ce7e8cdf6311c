//! Execution engine and simulator for the QSC quantum stack
//!
//! Drives circuits from `qsc-core` through the dense state engine in
//! `qsc-state`: gate dispatch, classical conditioning, measurement,
//! stochastic Kraus noise, shot sampling, and a gate-level debugger with
//! breakpoints and entanglement inspection.
//!
//! # Quick Start
//!
//! ```
//! use qsc_core::Circuit;
//! use qsc_sim::{Simulator, SimulatorConfig};
//!
//! let mut circuit = Circuit::new(2, 2).unwrap();
//! circuit.h(0).unwrap();
//! circuit.cx(0, 1).unwrap();
//! circuit.measure(0, 0).unwrap();
//! circuit.measure(1, 1).unwrap();
//!
//! let simulator = Simulator::new(SimulatorConfig::new().with_seed(7));
//! let counts = simulator.sample(&circuit, 1000).unwrap();
//!
//! // A Bell pair only ever yields correlated outcomes.
//! assert_eq!(counts.get("01") + counts.get("10"), 0);
//! ```

pub mod config;
pub mod debugger;
pub mod engine;
pub mod error;
pub mod linalg;
pub mod noise_runtime;
pub mod result;
pub mod simulator;

pub use config::SimulatorConfig;
pub use debugger::{Breakpoint, BreakpointKind, Debugger};
pub use engine::{ClassicalRegister, ExecutionEngine};
pub use error::{ErrorClass, Result, SimulatorError};
pub use result::{Counts, ExecutionStats, SimulationResult};
pub use simulator::Simulator;
