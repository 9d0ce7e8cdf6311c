//! Observational equivalence of the optimizer
//!
//! For random unitary circuits on up to 6 qubits, the basis-state
//! probability distribution after `optimize(C, k)` must match the
//! distribution of `C` within 1e-9 per outcome, for every level, and
//! optimizing twice must equal optimizing once.

use proptest::prelude::*;
use qsc_core::{Circuit, GateKind};
use qsc_gates::{matrix_of, GateMatrix};
use qsc_state::QuantumState;

/// Execute a unitary-only circuit on |0…0⟩ and return basis probabilities
fn simulate(circuit: &Circuit) -> Vec<f64> {
    let mut state = QuantumState::new(circuit.num_qubits()).unwrap();
    for gate in circuit.gates() {
        let qubits: Vec<usize> = gate.qubits().iter().map(|q| q.index()).collect();
        match gate.kind() {
            GateKind::Barrier => continue,
            kind => match matrix_of(kind, gate.params()).expect("unitary gate") {
                GateMatrix::One(m) => state.apply_single(&m, qubits[0]).unwrap(),
                GateMatrix::Two(m) => state.apply_two(&m, qubits[0], qubits[1]).unwrap(),
                GateMatrix::Three(m) => state
                    .apply_three(&m, qubits[0], qubits[1], qubits[2])
                    .unwrap(),
                GateMatrix::Dyn(custom) => {
                    state.apply_custom(custom.matrix(), &qubits).unwrap()
                }
            },
        }
    }
    state.probabilities()
}

/// Undo a recorded qubit relabeling on a probability vector
///
/// `layout[original] = current`; entry `i` of the returned vector is the
/// probability of original basis state `i`.
fn unpermute(probs: &[f64], layout: Option<&[u32]>, num_qubits: usize) -> Vec<f64> {
    let Some(layout) = layout else {
        return probs.to_vec();
    };
    let mut out = vec![0.0; probs.len()];
    for (original_index, slot) in out.iter_mut().enumerate() {
        let mut current_index = 0usize;
        for q in 0..num_qubits {
            if original_index & (1 << q) != 0 {
                current_index |= 1 << layout[q];
            }
        }
        *slot = probs[current_index];
    }
    out
}

#[derive(Debug, Clone)]
enum Op {
    H(u32),
    X(u32),
    Y(u32),
    Z(u32),
    S(u32),
    Sdg(u32),
    T(u32),
    Tdg(u32),
    Rx(u32, f64),
    Ry(u32, f64),
    Rz(u32, f64),
    P(u32, f64),
    Cx(u32, u32),
    Cz(u32, u32),
    Swap(u32, u32),
    Ccx(u32, u32, u32),
}

impl Op {
    fn apply(&self, circuit: &mut Circuit) {
        match *self {
            Op::H(q) => circuit.h(q),
            Op::X(q) => circuit.x(q),
            Op::Y(q) => circuit.y(q),
            Op::Z(q) => circuit.z(q),
            Op::S(q) => circuit.s(q),
            Op::Sdg(q) => circuit.sdg(q),
            Op::T(q) => circuit.t(q),
            Op::Tdg(q) => circuit.tdg(q),
            Op::Rx(q, a) => circuit.rx(a, q),
            Op::Ry(q, a) => circuit.ry(a, q),
            Op::Rz(q, a) => circuit.rz(a, q),
            Op::P(q, a) => circuit.p(a, q),
            Op::Cx(a, b) => circuit.cx(a, b),
            Op::Cz(a, b) => circuit.cz(a, b),
            Op::Swap(a, b) => circuit.swap(a, b),
            Op::Ccx(a, b, c) => circuit.ccx(a, b, c),
        }
        .expect("generated op must be valid")
    }
}

fn arb_op(n: u32) -> BoxedStrategy<Op> {
    let q = 0..n;
    let angle = -7.0..7.0f64;
    let single = prop_oneof![
        q.clone().prop_map(Op::H),
        q.clone().prop_map(Op::X),
        q.clone().prop_map(Op::Y),
        q.clone().prop_map(Op::Z),
        q.clone().prop_map(Op::S),
        q.clone().prop_map(Op::Sdg),
        q.clone().prop_map(Op::T),
        q.clone().prop_map(Op::Tdg),
        (q.clone(), angle.clone()).prop_map(|(q, a)| Op::Rx(q, a)),
        (q.clone(), angle.clone()).prop_map(|(q, a)| Op::Ry(q, a)),
        (q.clone(), angle.clone()).prop_map(|(q, a)| Op::Rz(q, a)),
        (q.clone(), angle).prop_map(|(q, a)| Op::P(q, a)),
    ];
    if n < 2 {
        return single.boxed();
    }

    let pair = (0..n, 0..n).prop_filter("distinct", |(a, b)| a != b);
    let two = prop_oneof![
        pair.clone().prop_map(|(a, b)| Op::Cx(a, b)),
        pair.clone().prop_map(|(a, b)| Op::Cz(a, b)),
        pair.prop_map(|(a, b)| Op::Swap(a, b)),
    ];
    if n < 3 {
        return prop_oneof![single, two].boxed();
    }

    let triple = (0..n, 0..n, 0..n)
        .prop_filter("distinct", |(a, b, c)| a != b && b != c && a != c)
        .prop_map(|(a, b, c)| Op::Ccx(a, b, c));
    prop_oneof![single, two, triple].boxed()
}

prop_compose! {
    fn arb_circuit()(n in 1u32..=6)(
        n in Just(n),
        ops in prop::collection::vec(arb_op(n), 0..24),
    ) -> Circuit {
        let mut circuit = Circuit::new(n as usize, 0).unwrap();
        for op in ops {
            op.apply(&mut circuit);
        }
        circuit
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every level preserves the outcome distribution
    #[test]
    fn optimize_preserves_distribution(circuit in arb_circuit(), level in 0u8..=3) {
        let reference = simulate(&circuit);

        let optimized = qsc_compiler::optimize(&circuit, level).unwrap();
        let observed = simulate(&optimized);
        let observed = unpermute(&observed, optimized.layout(), circuit.num_qubits());

        for (i, (a, b)) in reference.iter().zip(&observed).enumerate() {
            prop_assert!(
                (a - b).abs() < 1e-9,
                "outcome {} differs at level {}: {} vs {}",
                i, level, a, b
            );
        }
    }

    /// optimize(optimize(C, k), k) == optimize(C, k)
    #[test]
    fn optimize_is_idempotent(circuit in arb_circuit(), level in 0u8..=3) {
        let once = qsc_compiler::optimize(&circuit, level).unwrap();
        let twice = qsc_compiler::optimize(&once, level).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Optimization never increases gate count at levels without scheduling
    #[test]
    fn optimize_never_grows_gate_count(circuit in arb_circuit(), level in 0u8..=3) {
        let optimized = qsc_compiler::optimize(&circuit, level).unwrap();
        prop_assert!(optimized.len() <= circuit.len());
    }

    /// The final state norm survives optimization and execution
    #[test]
    fn norm_preserved(circuit in arb_circuit(), level in 0u8..=3) {
        let optimized = qsc_compiler::optimize(&circuit, level).unwrap();
        let probs = simulate(&optimized);
        let total: f64 = probs.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }
}
