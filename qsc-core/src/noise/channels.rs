//! The closed set of noise channels

use super::types::{verify_completeness, KrausOperator};
use crate::{QuantumError, Result};
use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const IDENTITY: [Complex64; 4] = [ONE, ZERO, ZERO, ONE];
const PAULI_X: [Complex64; 4] = [ZERO, ONE, ONE, ZERO];
const PAULI_Y: [Complex64; 4] = [ZERO, NEG_I, I, ZERO];
const PAULI_Z: [Complex64; 4] = [ONE, ZERO, ZERO, NEG_ONE];

/// A single-qubit noise channel, parameterized by its error rate
///
/// Each kind expands to a Kraus operator set satisfying Σ Kᵢ†Kᵢ = I.
/// Constructors validate parameter ranges; [`NoiseChannel::kraus`]
/// additionally verifies completeness of user-supplied sets.
///
/// # Example
/// ```
/// use qsc_core::NoiseChannel;
///
/// let channel = NoiseChannel::depolarizing(0.01).unwrap();
/// let kraus = channel.kraus_operators();
/// assert_eq!(kraus.len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum NoiseChannel {
    /// Random Pauli error: identity with probability 1−p, each of X/Y/Z
    /// with probability p/3
    Depolarizing { p: f64 },
    /// Energy relaxation (T1): |1⟩ decays to |0⟩ with probability γ
    AmplitudeDamping { gamma: f64 },
    /// Pure dephasing (T2) with probability λ
    PhaseDamping { lambda: f64 },
    /// X error with probability p
    BitFlip { p: f64 },
    /// Z error with probability p
    PhaseFlip { p: f64 },
    /// Y error with probability p
    BitPhaseFlip { p: f64 },
    /// Independent X/Y/Z error probabilities
    PauliChannel { px: f64, py: f64, pz: f64 },
    /// User-supplied Kraus operator set
    Kraus(Vec<KrausOperator>),
}

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(QuantumError::InvalidNoiseParameter {
            name,
            min: 0.0,
            max: 1.0,
            value,
        });
    }
    Ok(())
}

impl NoiseChannel {
    /// Create a depolarizing channel with error probability `p`
    pub fn depolarizing(p: f64) -> Result<Self> {
        check_probability("p", p)?;
        Ok(Self::Depolarizing { p })
    }

    /// Create an amplitude damping channel with decay probability `gamma`
    pub fn amplitude_damping(gamma: f64) -> Result<Self> {
        check_probability("gamma", gamma)?;
        Ok(Self::AmplitudeDamping { gamma })
    }

    /// Create a phase damping channel with dephasing probability `lambda`
    pub fn phase_damping(lambda: f64) -> Result<Self> {
        check_probability("lambda", lambda)?;
        Ok(Self::PhaseDamping { lambda })
    }

    /// Create a bit-flip channel with flip probability `p`
    pub fn bit_flip(p: f64) -> Result<Self> {
        check_probability("p", p)?;
        Ok(Self::BitFlip { p })
    }

    /// Create a phase-flip channel with flip probability `p`
    pub fn phase_flip(p: f64) -> Result<Self> {
        check_probability("p", p)?;
        Ok(Self::PhaseFlip { p })
    }

    /// Create a bit-phase-flip channel with flip probability `p`
    pub fn bit_phase_flip(p: f64) -> Result<Self> {
        check_probability("p", p)?;
        Ok(Self::BitPhaseFlip { p })
    }

    /// Create a Pauli channel with per-axis error probabilities
    ///
    /// # Errors
    /// Each probability must be in [0, 1] and their sum must not exceed 1.
    pub fn pauli(px: f64, py: f64, pz: f64) -> Result<Self> {
        check_probability("px", px)?;
        check_probability("py", py)?;
        check_probability("pz", pz)?;
        let total = px + py + pz;
        if total > 1.0 + 1e-12 {
            return Err(QuantumError::InvalidNoiseParameter {
                name: "px+py+pz",
                min: 0.0,
                max: 1.0,
                value: total,
            });
        }
        Ok(Self::PauliChannel { px, py, pz })
    }

    /// Create a channel from a user-supplied Kraus operator set
    ///
    /// # Errors
    /// Returns `KrausCompleteness` when Σ Kᵢ†Kᵢ deviates from the identity
    /// by more than 1e-9.
    pub fn kraus(operators: Vec<KrausOperator>) -> Result<Self> {
        verify_completeness(&operators)?;
        Ok(Self::Kraus(operators))
    }

    /// Channel name for diagnostics and CLI flags
    pub fn name(&self) -> &'static str {
        match self {
            Self::Depolarizing { .. } => "depolarizing",
            Self::AmplitudeDamping { .. } => "amplitude_damping",
            Self::PhaseDamping { .. } => "phase_damping",
            Self::BitFlip { .. } => "bit_flip",
            Self::PhaseFlip { .. } => "phase_flip",
            Self::BitPhaseFlip { .. } => "bit_phase_flip",
            Self::PauliChannel { .. } => "pauli",
            Self::Kraus(_) => "kraus",
        }
    }

    /// Number of qubits the channel acts on
    pub fn num_qubits(&self) -> usize {
        match self {
            Self::Kraus(ops) => ops.first().map_or(1, KrausOperator::num_qubits),
            _ => 1,
        }
    }

    /// Expand the channel into its Kraus operator set
    pub fn kraus_operators(&self) -> Vec<KrausOperator> {
        match *self {
            Self::Depolarizing { p } => {
                let keep = (1.0 - p).sqrt();
                let err = (p / 3.0).sqrt();
                vec![
                    KrausOperator::scaled_2x2(IDENTITY, keep),
                    KrausOperator::scaled_2x2(PAULI_X, err),
                    KrausOperator::scaled_2x2(PAULI_Y, err),
                    KrausOperator::scaled_2x2(PAULI_Z, err),
                ]
            }
            Self::AmplitudeDamping { gamma } => vec![
                KrausOperator::scaled_2x2(
                    [ONE, ZERO, ZERO, Complex64::new((1.0 - gamma).sqrt(), 0.0)],
                    1.0,
                ),
                KrausOperator::scaled_2x2(
                    [ZERO, Complex64::new(gamma.sqrt(), 0.0), ZERO, ZERO],
                    1.0,
                ),
            ],
            Self::PhaseDamping { lambda } => vec![
                KrausOperator::scaled_2x2(
                    [ONE, ZERO, ZERO, Complex64::new((1.0 - lambda).sqrt(), 0.0)],
                    1.0,
                ),
                KrausOperator::scaled_2x2(
                    [ZERO, ZERO, ZERO, Complex64::new(lambda.sqrt(), 0.0)],
                    1.0,
                ),
            ],
            Self::BitFlip { p } => vec![
                KrausOperator::scaled_2x2(IDENTITY, (1.0 - p).sqrt()),
                KrausOperator::scaled_2x2(PAULI_X, p.sqrt()),
            ],
            Self::PhaseFlip { p } => vec![
                KrausOperator::scaled_2x2(IDENTITY, (1.0 - p).sqrt()),
                KrausOperator::scaled_2x2(PAULI_Z, p.sqrt()),
            ],
            Self::BitPhaseFlip { p } => vec![
                KrausOperator::scaled_2x2(IDENTITY, (1.0 - p).sqrt()),
                KrausOperator::scaled_2x2(PAULI_Y, p.sqrt()),
            ],
            Self::PauliChannel { px, py, pz } => vec![
                KrausOperator::scaled_2x2(IDENTITY, (1.0 - px - py - pz).max(0.0).sqrt()),
                KrausOperator::scaled_2x2(PAULI_X, px.sqrt()),
                KrausOperator::scaled_2x2(PAULI_Y, py.sqrt()),
                KrausOperator::scaled_2x2(PAULI_Z, pz.sqrt()),
            ],
            Self::Kraus(ref ops) => ops.clone(),
        }
    }
}
