//! Same-axis rotation merging
//!
//! Adjacent rotations about the same axis on the same qubit combine:
//! RX(a)·RX(b) → RX(a+b), and likewise RY, RZ, and the phase family.
//! "Adjacent" means no other gate touches the qubit in between. A merged
//! angle within 1e-12 of a multiple of 2π eliminates the gate entirely.

use crate::passes::OptimizationPass;
use qsc_core::{Circuit, Gate, Result};
use std::f64::consts::TAU;

/// Angle tolerance for dropping full turns
const FULL_TURN_EPSILON: f64 = 1e-12;

/// Merges runs of same-axis rotations
#[derive(Debug, Clone, Default)]
pub struct RotationMerge;

impl RotationMerge {
    /// Create the pass
    pub fn new() -> Self {
        Self
    }

    /// Index of the next gate touching the same qubit, if it merges
    fn find_partner(gates: &[Gate], i: usize) -> Option<usize> {
        let gate = &gates[i];
        if !gate.is_plain_unitary() {
            return None;
        }
        let axis = gate.kind().merge_axis()?;
        let qubit = gate.qubits()[0];

        for (offset, candidate) in gates[i + 1..].iter().enumerate() {
            if !candidate.qubits().contains(&qubit) {
                continue;
            }
            let merges = candidate.is_plain_unitary()
                && candidate.kind().merge_axis() == Some(axis)
                && candidate.qubits() == gate.qubits();
            return merges.then_some(i + 1 + offset);
        }
        None
    }

    /// Whether an angle is a multiple of 2π within tolerance
    fn is_full_turn(angle: f64) -> bool {
        let remainder = angle.rem_euclid(TAU);
        remainder < FULL_TURN_EPSILON || TAU - remainder < FULL_TURN_EPSILON
    }
}

impl OptimizationPass for RotationMerge {
    fn name(&self) -> &str {
        "rotation-merge"
    }

    fn apply(&self, circuit: &mut Circuit) -> Result<bool> {
        let gates = circuit.gates_mut();
        let mut modified = false;

        'scan: loop {
            for i in 0..gates.len() {
                if let Some(j) = Self::find_partner(gates, i) {
                    let sum = gates[i].params()[0] + gates[j].params()[0];
                    gates.remove(j);
                    if Self::is_full_turn(sum) {
                        gates.remove(i);
                    } else {
                        gates[i].set_params(&[sum]);
                    }
                    modified = true;
                    continue 'scan;
                }
            }
            break;
        }

        Ok(modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsc_core::GateKind;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_rx_pair_merges() {
        let mut circuit = Circuit::new(1, 0).unwrap();
        circuit.rx(FRAC_PI_4, 0).unwrap();
        circuit.rx(FRAC_PI_4, 0).unwrap();

        RotationMerge::new().apply(&mut circuit).unwrap();
        assert_eq!(circuit.len(), 1);
        let gate = circuit.get(0).unwrap();
        assert_eq!(gate.kind(), &GateKind::Rx);
        assert!((gate.params()[0] - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_run_of_three_merges_to_pi() {
        let mut circuit = Circuit::new(1, 0).unwrap();
        circuit.rx(FRAC_PI_4, 0).unwrap();
        circuit.rx(FRAC_PI_4, 0).unwrap();
        circuit.rx(FRAC_PI_2, 0).unwrap();

        RotationMerge::new().apply(&mut circuit).unwrap();
        assert_eq!(circuit.len(), 1);
        assert!((circuit.get(0).unwrap().params()[0] - PI).abs() < 1e-12);
    }

    #[test]
    fn test_full_turn_drops_gate() {
        let mut circuit = Circuit::new(1, 0).unwrap();
        circuit.rz(PI, 0).unwrap();
        circuit.rz(PI, 0).unwrap();

        RotationMerge::new().apply(&mut circuit).unwrap();
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_phase_and_u1_share_an_axis() {
        let mut circuit = Circuit::new(1, 0).unwrap();
        circuit.p(0.25, 0).unwrap();
        circuit.u1(0.5, 0).unwrap();

        RotationMerge::new().apply(&mut circuit).unwrap();
        assert_eq!(circuit.len(), 1);
        assert!((circuit.get(0).unwrap().params()[0] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_different_axes_do_not_merge() {
        let mut circuit = Circuit::new(1, 0).unwrap();
        circuit.rx(0.3, 0).unwrap();
        circuit.rz(0.4, 0).unwrap();

        let modified = RotationMerge::new().apply(&mut circuit).unwrap();
        assert!(!modified);
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_interposed_gate_on_same_qubit_blocks() {
        let mut circuit = Circuit::new(1, 0).unwrap();
        circuit.rx(0.3, 0).unwrap();
        circuit.h(0).unwrap();
        circuit.rx(0.4, 0).unwrap();

        let modified = RotationMerge::new().apply(&mut circuit).unwrap();
        assert!(!modified);
    }

    #[test]
    fn test_interposed_gate_on_other_qubit_is_transparent() {
        let mut circuit = Circuit::new(2, 0).unwrap();
        circuit.rx(0.3, 0).unwrap();
        circuit.h(1).unwrap();
        circuit.rx(0.4, 0).unwrap();

        RotationMerge::new().apply(&mut circuit).unwrap();
        assert_eq!(circuit.len(), 2);
        assert!((circuit.get(0).unwrap().params()[0] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_negative_angles_cancel() {
        let mut circuit = Circuit::new(1, 0).unwrap();
        circuit.ry(0.8, 0).unwrap();
        circuit.ry(-0.8, 0).unwrap();

        RotationMerge::new().apply(&mut circuit).unwrap();
        assert!(circuit.is_empty());
    }
}
