//! Depth layering
//!
//! Partitions the gate sequence into layers in which no two gates share a
//! qubit, then rewrites the sequence in layer-major order, stable within
//! a layer. Classical bits participate in the dependency structure:
//! measurements and conditioned gates never cross each other on the bits
//! they touch.

use crate::passes::OptimizationPass;
use qsc_core::{Circuit, Gate, Result};

/// Schedules gates into parallel layers
#[derive(Debug, Clone, Default)]
pub struct DepthLayering;

impl DepthLayering {
    /// Create the pass
    pub fn new() -> Self {
        Self
    }

    /// Earliest-layer assignment for every gate
    fn assign_layers(circuit: &Circuit) -> Vec<usize> {
        let mut qubit_frontier = vec![0usize; circuit.num_qubits()];
        let mut cbit_frontier = vec![0usize; circuit.num_clbits()];

        circuit
            .gates()
            .map(|gate| {
                let mut layer = 0;
                for q in gate.qubits() {
                    layer = layer.max(qubit_frontier[q.index()]);
                }
                for c in Self::cbits_of(gate) {
                    layer = layer.max(cbit_frontier[c]);
                }

                for q in gate.qubits() {
                    qubit_frontier[q.index()] = layer + 1;
                }
                for c in Self::cbits_of(gate) {
                    cbit_frontier[c] = layer + 1;
                }
                layer
            })
            .collect()
    }

    /// Classical bits a gate reads or writes
    fn cbits_of(gate: &Gate) -> Vec<usize> {
        let mut cbits = Vec::new();
        if let Some(c) = gate.cbit() {
            cbits.push(c.index());
        }
        if let Some(cond) = gate.condition() {
            let mut mask = cond.mask;
            while mask != 0 {
                let bit = mask.trailing_zeros() as usize;
                cbits.push(bit);
                mask &= mask - 1;
            }
        }
        cbits
    }
}

impl OptimizationPass for DepthLayering {
    fn name(&self) -> &str {
        "depth-layering"
    }

    fn apply(&self, circuit: &mut Circuit) -> Result<bool> {
        let layers = Self::assign_layers(circuit);

        let mut order: Vec<usize> = (0..layers.len()).collect();
        // Stable: equal layers keep their original relative order.
        order.sort_by_key(|&i| layers[i]);

        if order.iter().enumerate().all(|(pos, &i)| pos == i) {
            return Ok(false);
        }

        let gates = circuit.gates_mut();
        let reordered: Vec<Gate> = order.iter().map(|&i| gates[i].clone()).collect();
        *gates = reordered;
        Ok(true)
    }
}
