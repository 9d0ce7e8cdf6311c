//! Measurement and reset with state collapse
//!
//! Measurement draws a uniform sample, collapses the inconsistent branch
//! to zero, and renormalizes by 1/√p. A branch with probability below
//! 1e-12 is a hard error; well-posed programs never hit it.

use crate::dense_state::QuantumState;
use crate::error::{Result, StateError};

/// Probability floor below which collapse is refused
pub const UNDERFLOW_THRESHOLD: f64 = 1e-12;

/// Measure one qubit in the computational basis
///
/// `random` must be uniform in [0, 1); the caller owns the RNG so runs
/// are reproducible under a fixed seed. Returns the outcome bit.
///
/// # Errors
/// Returns `Underflow` when the selected branch has probability below
/// 1e-12.
pub fn measure_qubit(state: &mut QuantumState, qubit: usize, random: f64) -> Result<bool> {
    let p1 = state.qubit_probability(qubit, true)?;
    let outcome = random < p1;
    collapse(state, qubit, outcome)?;
    Ok(outcome)
}

/// Reset one qubit to |0⟩
///
/// Implemented as measure-then-flip: the qubit is measured, and a |1⟩
/// outcome is corrected by exchanging the pair amplitudes. This keeps
/// reset a physical channel rather than a bare projection.
pub fn reset_qubit(state: &mut QuantumState, qubit: usize, random: f64) -> Result<()> {
    let outcome = measure_qubit(state, qubit, random)?;
    if outcome {
        let mask = 1usize << qubit;
        let amplitudes = state.amplitudes_mut();
        for i in 0..amplitudes.len() {
            if i & mask == 0 {
                amplitudes.swap(i, i | mask);
            }
        }
    }
    Ok(())
}

/// Collapse `qubit` onto `outcome` and renormalize
fn collapse(state: &mut QuantumState, qubit: usize, outcome: bool) -> Result<()> {
    let p = state.qubit_probability(qubit, outcome)?;
    if p < UNDERFLOW_THRESHOLD {
        return Err(StateError::Underflow { probability: p });
    }

    let mask = 1usize << qubit;
    let scale = 1.0 / p.sqrt();
    for (i, amp) in state.amplitudes_mut().iter_mut().enumerate() {
        let bit_set = i & mask != 0;
        if bit_set == outcome {
            *amp *= scale;
        } else {
            *amp = num_complex::Complex64::new(0.0, 0.0);
        }
    }
    Ok(())
}
