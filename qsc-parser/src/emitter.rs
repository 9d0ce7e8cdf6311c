//! Deterministic QASM pretty-printer
//!
//! Prints a circuit back to OpenQASM 2.0: the fixed header, the flattened
//! register declarations, then every operation in execution order.
//! Printing the same circuit twice yields byte-identical output, and
//! `parse(emit(parse(src)))` reproduces `parse(src)`.
//!
//! Two caveats, both inherent to the flat circuit form: multi-register
//! programs print with a single `q`/`c` register pair, and custom gates
//! print as bare calls (their definitions are the caller's concern).

use qsc_core::{Circuit, Gate, GateKind};
use std::fmt::Write;

/// Emit a circuit as OpenQASM 2.0 source
pub fn emit(circuit: &Circuit) -> String {
    let mut out = String::new();
    out.push_str("OPENQASM 2.0;\n");
    out.push_str("include \"qelib1.inc\";\n");

    let _ = writeln!(out, "qreg q[{}];", circuit.num_qubits());
    if circuit.num_clbits() > 0 {
        let _ = writeln!(out, "creg c[{}];", circuit.num_clbits());
    }

    for gate in circuit.gates() {
        emit_gate(&mut out, gate);
    }
    out
}

fn emit_gate(out: &mut String, gate: &Gate) {
    if let Some(condition) = gate.condition() {
        let shift = condition.mask.trailing_zeros();
        let _ = write!(out, "if (c == {}) ", condition.value >> shift);
    }

    match gate.kind() {
        GateKind::Measure => {
            let cbit = gate.cbit().map(|c| c.index()).unwrap_or_default();
            let _ = writeln!(
                out,
                "measure q[{}] -> c[{}];",
                gate.qubits()[0].index(),
                cbit
            );
        }
        GateKind::Reset => {
            let _ = writeln!(out, "reset q[{}];", gate.qubits()[0].index());
        }
        GateKind::Barrier => {
            let _ = writeln!(out, "barrier {};", qubit_list(gate));
        }
        kind => {
            let _ = write!(out, "{}", kind.name());
            if !gate.params().is_empty() {
                let params: Vec<String> =
                    gate.params().iter().map(|p| format!("{p}")).collect();
                let _ = write!(out, "({})", params.join(", "));
            }
            let _ = writeln!(out, " {};", qubit_list(gate));
        }
    }
}

fn qubit_list(gate: &Gate) -> String {
    gate.qubits()
        .iter()
        .map(|q| format!("q[{}]", q.index()))
        .collect::<Vec<_>>()
        .join(", ")
}
