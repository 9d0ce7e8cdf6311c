//! Commutation-based reordering
//!
//! Moves a rotation left past commuting neighbors until it sits next to a
//! same-axis partner on the same qubit, exposing a merge for the next
//! pipeline iteration. Movement is bounded: a gate may travel at most
//! `W = max(num_qubits, 4)` positions per pass, which guarantees
//! termination on pathological inputs. A circuit with no merge partners
//! is untouched, so the pass is a no-op at the pipeline's fixed point.

use crate::passes::{gates_commute, OptimizationPass};
use qsc_core::{Circuit, Gate, Result};

/// Reorders commuting gates to expose rotation merges
#[derive(Debug, Clone, Default)]
pub struct Commutation;

impl Commutation {
    /// Create the pass
    pub fn new() -> Self {
        Self
    }

    /// Displacement bound per gate per pass
    fn window(circuit: &Circuit) -> usize {
        circuit.num_qubits().max(4)
    }

    /// Find where the gate at `i` should move to sit after its merge
    /// partner, if such a move is possible
    fn find_move(gates: &[Gate], i: usize, window: usize) -> Option<usize> {
        let gate = &gates[i];
        if !gate.is_plain_unitary() {
            return None;
        }
        let axis = gate.kind().merge_axis()?;

        // Walk left while neighbors commute, looking for the partner.
        let lowest = i.saturating_sub(window);
        let mut k = i;
        while k > lowest {
            let neighbor = &gates[k - 1];
            if neighbor.qubits() == gate.qubits()
                && neighbor.is_plain_unitary()
                && neighbor.kind().merge_axis() == Some(axis)
            {
                // Partner found directly to the left of position k.
                return (k < i).then_some(k);
            }
            if !gates_commute(neighbor, gate) {
                return None;
            }
            k -= 1;
        }
        None
    }
}

impl OptimizationPass for Commutation {
    fn name(&self) -> &str {
        "commutation"
    }

    fn apply(&self, circuit: &mut Circuit) -> Result<bool> {
        let window = Self::window(circuit);
        let gates = circuit.gates_mut();
        let mut modified = false;

        let mut i = 0;
        while i < gates.len() {
            if let Some(target) = Self::find_move(gates, i, window) {
                // Bubble the gate left one commuting swap at a time.
                for k in (target..i).rev() {
                    gates.swap(k, k + 1);
                }
                modified = true;
            }
            i += 1;
        }

        Ok(modified)
    }
}
