//! Stochastic Kraus application
//!
//! Trajectory-mode noise for pure state vectors: one Kraus operator is
//! selected per application with probability ‖Kᵢ|ψ⟩‖², applied, and the
//! state renormalized. Purity is preserved per trajectory; ensemble
//! expectations come from averaging over shots.

use crate::error::{Result, SimulatorError};
use num_complex::Complex64;
use qsc_core::KrausOperator;
use qsc_state::QuantumState;

/// Apply one stochastic Kraus pick to `qubit`
///
/// `random` is uniform in [0, 1). Only single-qubit operator sets are
/// applicable per-gate-qubit; wider sets are rejected.
pub fn apply_stochastic(
    state: &mut QuantumState,
    operators: &[KrausOperator],
    qubit: usize,
    random: f64,
) -> Result<()> {
    if operators.iter().any(|op| op.num_qubits() != 1) {
        return Err(SimulatorError::UnsupportedNoise {
            reason: "per-gate noise requires single-qubit Kraus operators".to_string(),
        });
    }

    // Branch weights p_i = ‖K_i|ψ⟩‖², computed without mutating the state.
    let weights: Vec<f64> = operators
        .iter()
        .map(|op| branch_weight(state, op, qubit))
        .collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        // A complete Kraus set always has Σ p_i = 1; a vanishing total
        // means the state itself is degenerate.
        return Err(SimulatorError::State(qsc_state::StateError::Underflow {
            probability: total,
        }));
    }

    // Pick the branch
    let target = random * total;
    let mut cumulative = 0.0;
    let mut chosen = operators.len() - 1;
    for (i, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if target < cumulative {
            chosen = i;
            break;
        }
    }

    let matrix = as_2x2(&operators[chosen]);
    state.apply_single(&matrix, qubit)?;
    state.renormalize();
    Ok(())
}

/// ‖K|ψ⟩‖² for a single-qubit operator, without mutating the state
fn branch_weight(state: &QuantumState, op: &KrausOperator, qubit: usize) -> f64 {
    let m = as_2x2(op);
    let mask = 1usize << qubit;
    let amplitudes = state.amplitudes();

    let mut weight = 0.0;
    for i0 in 0..amplitudes.len() {
        if i0 & mask != 0 {
            continue;
        }
        let i1 = i0 | mask;
        let a0 = amplitudes[i0];
        let a1 = amplitudes[i1];
        weight += (m[0][0] * a0 + m[0][1] * a1).norm_sqr();
        weight += (m[1][0] * a0 + m[1][1] * a1).norm_sqr();
    }
    weight
}

fn as_2x2(op: &KrausOperator) -> [[Complex64; 2]; 2] {
    [[op.get(0, 0), op.get(0, 1)], [op.get(1, 0), op.get(1, 1)]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qsc_core::NoiseChannel;

    #[test]
    fn test_identity_channel_is_noop() {
        let channel = NoiseChannel::depolarizing(0.0).unwrap();
        let ops = channel.kraus_operators();

        let mut state = QuantumState::new(1).unwrap();
        state.apply_h(0).unwrap();
        let before = state.amplitudes().to_vec();

        apply_stochastic(&mut state, &ops, 0, 0.3).unwrap();
        for (a, b) in state.amplitudes().iter().zip(&before) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-12);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_state_stays_normalized() {
        let channel = NoiseChannel::amplitude_damping(0.4).unwrap();
        let ops = channel.kraus_operators();

        let mut state = QuantumState::new(2).unwrap();
        state.apply_h(0).unwrap();
        state.apply_cnot(0, 1).unwrap();

        for r in [0.05, 0.5, 0.95] {
            apply_stochastic(&mut state, &ops, 0, r).unwrap();
            assert!(state.is_normalized(1e-9));
        }
    }

    #[test]
    fn test_full_bit_flip_flips() {
        let channel = NoiseChannel::bit_flip(1.0).unwrap();
        let ops = channel.kraus_operators();

        let mut state = QuantumState::new(1).unwrap();
        apply_stochastic(&mut state, &ops, 0, 0.5).unwrap();
        assert_relative_eq!(state.amplitudes()[1].norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_branch_weights_respected() {
        // Amplitude damping on |1⟩: jump branch has weight γ.
        let channel = NoiseChannel::amplitude_damping(0.25).unwrap();
        let ops = channel.kraus_operators();

        let x = [
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        ];

        // r below 1-γ keeps the no-jump branch (|1⟩ with damped weight),
        // r above selects the jump to |0⟩.
        let mut state = QuantumState::new(1).unwrap();
        state.apply_single(&x, 0).unwrap();
        apply_stochastic(&mut state, &ops, 0, 0.70).unwrap();
        assert_relative_eq!(state.amplitudes()[1].norm(), 1.0, epsilon = 1e-9);

        let mut state = QuantumState::new(1).unwrap();
        state.apply_single(&x, 0).unwrap();
        apply_stochastic(&mut state, &ops, 0, 0.80).unwrap();
        assert_relative_eq!(state.amplitudes()[0].norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_multi_qubit_kraus_rejected() {
        let id4 = KrausOperator::new(
            vec![
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
            ],
            4,
        )
        .unwrap();

        let mut state = QuantumState::new(2).unwrap();
        let result = apply_stochastic(&mut state, &[id4], 0, 0.5);
        assert!(matches!(
            result,
            Err(SimulatorError::UnsupportedNoise { .. })
        ));
    }
}
