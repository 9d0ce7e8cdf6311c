//! Qubit remapping
//!
//! Counts per-qubit activity and relabels so the busiest qubit becomes
//! index 0, the next busiest index 1, and so on. The relabeling is
//! applied to every gate's qubit list, measurements included, so the
//! observable cbit distribution is unchanged; the permutation is recorded
//! on the circuit (`layout[original] = current`) so raw amplitude indices
//! remain interpretable.

use crate::passes::OptimizationPass;
use qsc_core::{Circuit, QubitId, Result};

/// Relabels qubits by descending activity
#[derive(Debug, Clone, Default)]
pub struct QubitRemap;

impl QubitRemap {
    /// Create the pass
    pub fn new() -> Self {
        Self
    }

    /// Compute the permutation `perm[old] = new`
    fn permutation(circuit: &Circuit) -> Vec<u32> {
        let mut usage = vec![0usize; circuit.num_qubits()];
        for gate in circuit.gates() {
            for q in gate.qubits() {
                usage[q.index()] += 1;
            }
        }

        let mut order: Vec<usize> = (0..circuit.num_qubits()).collect();
        // Descending usage; ties keep the lower original index first so
        // the pass is deterministic and idempotent.
        order.sort_by_key(|&q| (std::cmp::Reverse(usage[q]), q));

        let mut perm = vec![0u32; circuit.num_qubits()];
        for (rank, &old) in order.iter().enumerate() {
            perm[old] = rank as u32;
        }
        perm
    }
}

impl OptimizationPass for QubitRemap {
    fn name(&self) -> &str {
        "qubit-remap"
    }

    fn apply(&self, circuit: &mut Circuit) -> Result<bool> {
        let perm = Self::permutation(circuit);
        if perm.iter().enumerate().all(|(old, &new)| old as u32 == new) {
            return Ok(false);
        }

        for gate in circuit.gates_mut() {
            for q in gate.qubits_mut() {
                *q = QubitId::new(perm[q.index()]);
            }
        }

        // Compose with a previous relabeling if one is recorded.
        let layout = match circuit.layout() {
            Some(existing) => existing
                .iter()
                .map(|&current| perm[current as usize])
                .collect(),
            None => perm,
        };
        circuit.set_layout(layout);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsc_core::GateKind;

    #[test]
    fn test_busiest_qubit_becomes_zero() {
        let mut circuit = Circuit::new(3, 0).unwrap();
        circuit.h(2).unwrap();
        circuit.x(2).unwrap();
        circuit.z(2).unwrap();
        circuit.h(1).unwrap();

        let modified = QubitRemap::new().apply(&mut circuit).unwrap();
        assert!(modified);

        // q2 (3 gates) → 0, q1 (1 gate) → 1, q0 (0 gates) → 2
        assert_eq!(circuit.layout(), Some(&[2u32, 1, 0][..]));
        assert_eq!(circuit.get(0).unwrap().qubits()[0].index(), 0);
        assert_eq!(circuit.get(3).unwrap().qubits()[0].index(), 1);
    }

    #[test]
    fn test_identity_when_already_sorted() {
        let mut circuit = Circuit::new(2, 0).unwrap();
        circuit.h(0).unwrap();
        circuit.h(0).unwrap();
        circuit.x(1).unwrap();

        let modified = QubitRemap::new().apply(&mut circuit).unwrap();
        assert!(!modified);
        assert!(circuit.layout().is_none());
    }

    #[test]
    fn test_idempotent() {
        let mut circuit = Circuit::new(3, 0).unwrap();
        circuit.h(2).unwrap();
        circuit.cx(2, 1).unwrap();

        QubitRemap::new().apply(&mut circuit).unwrap();
        let snapshot = circuit.clone();
        let modified = QubitRemap::new().apply(&mut circuit).unwrap();
        assert!(!modified);
        assert_eq!(circuit, snapshot);
    }

    #[test]
    fn test_measurement_follows_relabeling() {
        let mut circuit = Circuit::new(2, 1).unwrap();
        circuit.h(1).unwrap();
        circuit.measure(1, 0).unwrap();

        QubitRemap::new().apply(&mut circuit).unwrap();

        // The measured qubit moved to index 0, still writing cbit 0.
        let measure = circuit.get(1).unwrap();
        assert_eq!(measure.kind(), &GateKind::Measure);
        assert_eq!(measure.qubits()[0].index(), 0);
        assert_eq!(measure.cbit().unwrap().index(), 0);
    }
}
