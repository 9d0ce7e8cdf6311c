//! OpenQASM 2.0 front end for the QSC quantum compiler
//!
//! Parses textual source into an AST, lowers the AST to a flat
//! [`Circuit`](qsc_core::Circuit), and prints circuits back to canonical
//! QASM. The parser accumulates positioned diagnostics and recovers at
//! statement boundaries, so one run reports every error in a file.
//!
//! # Quick Start
//!
//! ```
//! let circuit = qsc_parser::parse(r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     measure q -> c;
//! "#).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.len(), 4);
//! ```

pub mod ast;
pub mod emitter;
pub mod error;
pub mod lexer;
pub mod lowering;
pub mod parser;

pub use ast::Program;
pub use emitter::emit;
pub use error::{Diagnostic, ParseError, ParseResult};
pub use lowering::DEFAULT_INLINE_DEPTH;
pub use parser::parse_ast;

use qsc_core::Circuit;

/// Parse pre-concatenated OpenQASM 2.0 source into a circuit
///
/// `include "qelib1.inc"` is understood as the builtin gate set; any
/// other include is a diagnostic. Use [`parse_with_includes`] to resolve
/// includes through a callback.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let program = parser::parse_ast(source)?;
    let program = lowering::expand_includes(program, None)?;
    lowering::lower(&program)
}

/// Parse source, resolving `include` directives through `resolver`
///
/// The resolver maps an include path to source text; returning `None`
/// surfaces a positioned diagnostic.
pub fn parse_with_includes(
    source: &str,
    resolver: &dyn Fn(&str) -> Option<String>,
) -> ParseResult<Circuit> {
    let program = parser::parse_ast(source)?;
    let program = lowering::expand_includes(program, Some(resolver))?;
    lowering::lower(&program)
}
