//! Inverse-pair cancellation
//!
//! For each gate, finds the nearest later gate on the exact same qubit
//! list whose kind cancels it (involutions and adjoint pairs), provided
//! every intervening gate commutes with both endpoints. Both gates are
//! removed. Lowest index wins when several rewrites apply, which keeps
//! the pass deterministic.

use crate::passes::{gates_commute, OptimizationPass};
use qsc_core::{Circuit, Result};

/// Cancels adjacent inverse pairs: X·X, H·H, S·S†, CNOT·CNOT, …
#[derive(Debug, Clone, Default)]
pub struct Cancellation;

impl Cancellation {
    /// Create the pass
    pub fn new() -> Self {
        Self
    }

    /// Find the partner index for the gate at `i`, if it can cancel
    fn find_partner(gates: &[qsc_core::Gate], i: usize) -> Option<usize> {
        let gate = &gates[i];
        if !gate.is_plain_unitary() {
            return None;
        }

        for j in (i + 1)..gates.len() {
            let candidate = &gates[j];
            if candidate.qubits() == gate.qubits() && candidate.is_plain_unitary() {
                // Nearest same-tuple gate: either it cancels or it blocks.
                let cancels = gate.kind().cancels_with(candidate.kind())
                    && gate.params() == candidate.params()
                    && (i + 1..j).all(|k| {
                        gates_commute(&gates[k], gate) && gates_commute(&gates[k], candidate)
                    });
                return cancels.then_some(j);
            }
            if candidate.overlaps(gate) && !gates_commute(candidate, gate) {
                return None;
            }
        }
        None
    }
}

impl OptimizationPass for Cancellation {
    fn name(&self) -> &str {
        "cancellation"
    }

    fn apply(&self, circuit: &mut Circuit) -> Result<bool> {
        let gates = circuit.gates_mut();
        let mut modified = false;

        'scan: loop {
            for i in 0..gates.len() {
                if let Some(j) = Self::find_partner(gates, i) {
                    gates.remove(j);
                    gates.remove(i);
                    modified = true;
                    continue 'scan;
                }
            }
            break;
        }

        Ok(modified)
    }
}
