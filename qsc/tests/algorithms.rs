//! Algorithm-level end-to-end checks: QFT inversion and Grover search

use approx::assert_relative_eq;
use qsc::algorithms::{grover, inverse_qft, qft};
use qsc::{Circuit, QuantumState, Simulator, SimulatorConfig};

fn run_on(state_prep: &Circuit, rest: &[&Circuit]) -> QuantumState {
    let mut combined = Circuit::new(state_prep.num_qubits(), 0).unwrap();
    for gate in state_prep.gates() {
        combined.push(gate.clone()).unwrap();
    }
    for circuit in rest {
        for gate in circuit.gates() {
            combined.push(gate.clone()).unwrap();
        }
    }

    let simulator = Simulator::new(
        SimulatorConfig::new()
            .with_seed(13)
            .with_optimization_level(0),
    );
    let result = simulator.run(&combined).unwrap();
    QuantumState::from_amplitudes(combined.num_qubits(), result.state().amplitudes()).unwrap()
}

#[test]
fn qft_followed_by_inverse_restores_basis_state() {
    // Prepare |101⟩ (q0 = 1, q2 = 1), run QFT-3 then its inverse.
    let mut prep = Circuit::new(3, 0).unwrap();
    prep.x(0).unwrap();
    prep.x(2).unwrap();

    let forward = qft(3).unwrap();
    let backward = inverse_qft(3).unwrap();
    let state = run_on(&prep, &[&forward, &backward]);

    let probs = state.probabilities();
    assert_relative_eq!(probs[0b101], 1.0, epsilon = 1e-9);
    for (i, p) in probs.iter().enumerate() {
        if i != 0b101 {
            assert_relative_eq!(*p, 0.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn qft_of_zero_state_is_uniform() {
    let prep = Circuit::new(3, 0).unwrap();
    let forward = qft(3).unwrap();
    let state = run_on(&prep, &[&forward]);

    for p in state.probabilities() {
        assert_relative_eq!(p, 1.0 / 8.0, epsilon = 1e-9);
    }
}

#[test]
fn grover_two_qubits_finds_marked_state() {
    // One iteration is exact on two qubits: the marked state has
    // probability 1.
    for marked in 0..4usize {
        let circuit = grover(2, marked).unwrap();
        let simulator = Simulator::new(SimulatorConfig::new().with_seed(21));
        let result = simulator.run(&circuit).unwrap();

        let probs = result.probabilities();
        assert_relative_eq!(probs[marked], 1.0, epsilon = 1e-9);
    }
}

#[test]
fn grover_three_qubits_amplifies_marked_state() {
    let circuit = grover(3, 0b110).unwrap();
    let simulator = Simulator::new(SimulatorConfig::new().with_seed(22));
    let result = simulator.run(&circuit).unwrap();

    let probs = result.probabilities();
    // Two iterations on three qubits reach ~94.5%.
    assert!(probs[0b110] > 0.9, "marked probability {}", probs[0b110]);
}

#[test]
fn gate_followed_by_inverse_restores_state() {
    // Representative inverse pairs applied to a non-trivial state.
    let mut prep = Circuit::new(2, 0).unwrap();
    prep.h(0).unwrap();
    prep.ry(0.7, 1).unwrap();

    let pairs: Vec<Circuit> = {
        let mut list = Vec::new();

        let mut s_pair = Circuit::new(2, 0).unwrap();
        s_pair.s(0).unwrap();
        s_pair.sdg(0).unwrap();
        list.push(s_pair);

        let mut rx_pair = Circuit::new(2, 0).unwrap();
        rx_pair.rx(1.1, 1).unwrap();
        rx_pair.rx(-1.1, 1).unwrap();
        list.push(rx_pair);

        let mut cx_pair = Circuit::new(2, 0).unwrap();
        cx_pair.cx(0, 1).unwrap();
        cx_pair.cx(0, 1).unwrap();
        list.push(cx_pair);

        list
    };

    let reference = run_on(&prep, &[]);
    for pair in &pairs {
        let state = run_on(&prep, &[pair]);
        for (a, b) in state.amplitudes().iter().zip(reference.amplitudes()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-9);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-9);
        }
    }
}
