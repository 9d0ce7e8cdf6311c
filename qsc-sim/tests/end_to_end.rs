//! End-to-end scenarios: QASM source through parsing, optimization, and
//! execution, checked against exact amplitudes and shot statistics.

use approx::assert_relative_eq;
use qsc_core::Circuit;
use qsc_parser::parse;
use qsc_sim::{Simulator, SimulatorConfig};

fn simulator(seed: u64) -> Simulator {
    Simulator::new(SimulatorConfig::new().with_seed(seed))
}

#[test]
fn bell_state_amplitudes() {
    let circuit = parse(
        r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[2];
        h q[0];
        cx q[0], q[1];
        "#,
    )
    .unwrap();

    let result = simulator(1).run(&circuit).unwrap();
    let probs = result.probabilities();

    assert_relative_eq!(probs[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(probs[3], 0.5, epsilon = 1e-12);
    assert_relative_eq!(probs[1], 0.0, epsilon = 1e-12);
    assert_relative_eq!(probs[2], 0.0, epsilon = 1e-12);
}

#[test]
fn bell_state_shot_statistics() {
    let circuit = parse(
        r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[2];
        creg c[2];
        h q[0];
        cx q[0], q[1];
        measure q -> c;
        "#,
    )
    .unwrap();

    let counts = simulator(2).sample(&circuit, 1000).unwrap();

    // The qubits always agree.
    assert_eq!(counts.get("01"), 0);
    assert_eq!(counts.get("10"), 0);

    // Both agreeing outcomes fall in the binomial window.
    let zeros = counts.get("00");
    let ones = counts.get("11");
    assert_eq!(zeros + ones, 1000);
    assert!((400..=600).contains(&zeros), "00 count {zeros} out of range");
    assert!((400..=600).contains(&ones), "11 count {ones} out of range");
}

#[test]
fn ghz_three_amplitudes() {
    let circuit = parse(
        r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[3];
        h q[0];
        cx q[0], q[1];
        cx q[1], q[2];
        "#,
    )
    .unwrap();

    let result = simulator(3).run(&circuit).unwrap();
    let amplitudes = result.state().amplitudes();

    let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
    assert_relative_eq!(amplitudes[0].re, inv_sqrt2, epsilon = 1e-12);
    assert_relative_eq!(amplitudes[7].re, inv_sqrt2, epsilon = 1e-12);
    for i in 1..7 {
        assert_relative_eq!(amplitudes[i].norm(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn cancellation_to_identity() {
    let mut circuit = Circuit::new(1, 0).unwrap();
    circuit.h(0).unwrap();
    circuit.h(0).unwrap();
    circuit.x(0).unwrap();
    circuit.x(0).unwrap();

    let optimized = qsc_compiler::optimize(&circuit, 1).unwrap();
    assert!(optimized.is_empty());

    let result = simulator(4).run(&circuit).unwrap();
    assert_relative_eq!(result.state().amplitudes()[0].re, 1.0, epsilon = 1e-15);
}

#[test]
fn rotation_merging_to_pi() {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    let mut circuit = Circuit::new(1, 0).unwrap();
    circuit.rx(FRAC_PI_4, 0).unwrap();
    circuit.rx(FRAC_PI_4, 0).unwrap();
    circuit.rx(FRAC_PI_2, 0).unwrap();

    let optimized = qsc_compiler::optimize(&circuit, 1).unwrap();
    assert_eq!(optimized.len(), 1);

    // RX(π)|0⟩ = -i|1⟩: all weight on |1⟩ up to global phase.
    let result = simulator(5).run(&circuit).unwrap();
    let probs = result.probabilities();
    assert_relative_eq!(probs[1], 1.0, epsilon = 1e-9);
}

#[test]
fn single_qubit_measurement_statistics() {
    let circuit = parse(
        r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[1];
        creg c[1];
        h q[0];
        measure q[0] -> c[0];
        "#,
    )
    .unwrap();

    let shots = 1000usize;
    let counts = simulator(6).sample(&circuit, shots).unwrap();
    let ones = counts.get("1") as f64;

    // Binomial confidence window: |k/N - 1/2| < 5/√N
    let deviation = (ones / shots as f64 - 0.5).abs();
    assert!(
        deviation < 5.0 / (shots as f64).sqrt(),
        "deviation {deviation} outside the confidence window"
    );
}

#[test]
fn depolarizing_noise_flattens_bell_distribution() {
    let circuit = parse(
        r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[2];
        creg c[2];
        h q[0];
        cx q[0], q[1];
        measure q -> c;
        "#,
    )
    .unwrap();

    let config = SimulatorConfig::new()
        .with_seed(7)
        .with_noise(qsc_core::NoiseChannel::depolarizing(1.0).unwrap());
    let counts = Simulator::new(config).sample(&circuit, 1000).unwrap();

    // Full depolarization scrambles to within 10% of uniform.
    for outcome in ["00", "01", "10", "11"] {
        let p = counts.probability(outcome);
        assert!(
            (p - 0.25).abs() < 0.10,
            "outcome {outcome} has probability {p}"
        );
    }
}

#[test]
fn mid_circuit_measurement_and_feedback() {
    // Teleport-style conditioned correction: q0 ends in |0⟩ regardless of
    // which branch the measurement takes.
    let circuit = parse(
        r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[1];
        creg c[1];
        h q[0];
        measure q[0] -> c[0];
        if (c == 1) x q[0];
        "#,
    )
    .unwrap();

    for seed in 0..20 {
        let result = simulator(seed).run(&circuit).unwrap();
        assert_relative_eq!(result.probabilities()[0], 1.0, epsilon = 1e-9);
    }
}

#[test]
fn optimization_levels_agree_on_distribution() {
    let circuit = parse(
        r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[3];
        h q[0];
        cx q[0], q[1];
        rz(0.25) q[2];
        h q[2];
        cx q[1], q[2];
        rz(0.5) q[0];
        "#,
    )
    .unwrap();

    let reference = simulator(8).run(&circuit).unwrap();
    let reference_probs = reference.probabilities();

    for level in 0..=2 {
        let config = SimulatorConfig::new()
            .with_seed(8)
            .with_optimization_level(level);
        let result = Simulator::new(config).run(&circuit).unwrap();
        for (a, b) in reference_probs.iter().zip(result.probabilities()) {
            assert_relative_eq!(*a, b, epsilon = 1e-9);
        }
    }
}

#[test]
fn norm_invariant_after_long_run() {
    let mut circuit = Circuit::new(4, 0).unwrap();
    for layer in 0..50 {
        for q in 0..4 {
            circuit.h(q).unwrap();
            circuit.rz(0.1 * (layer as f64 + 1.0), q).unwrap();
        }
        circuit.cx(0, 1).unwrap();
        circuit.cx(2, 3).unwrap();
        circuit.cx(1, 2).unwrap();
    }

    let result = simulator(9).run(&circuit).unwrap();
    assert!(result.state().is_normalized(1e-9));
}
