//! Matrix synthesis driven by the gate tag

use crate::matrices;
use crate::matrix_ops::controlled;
use num_complex::Complex64;
use qsc_core::{CustomGate, GateKind};
use std::sync::Arc;

/// A synthesized gate matrix, sized by arity
///
/// The fixed variants avoid heap traffic for the closed gate set; only
/// custom gates carry an owned (shared) matrix.
#[derive(Clone, Debug)]
pub enum GateMatrix {
    /// 2×2 single-qubit unitary
    One([[Complex64; 2]; 2]),
    /// 4×4 two-qubit unitary
    Two([[Complex64; 4]; 4]),
    /// 8×8 three-qubit unitary
    Three([[Complex64; 8]; 8]),
    /// Arbitrary 2^k × 2^k unitary from a custom gate
    Dyn(Arc<CustomGate>),
}

impl GateMatrix {
    /// Matrix dimension
    pub fn dim(&self) -> usize {
        match self {
            GateMatrix::One(_) => 2,
            GateMatrix::Two(_) => 4,
            GateMatrix::Three(_) => 8,
            GateMatrix::Dyn(custom) => custom.dim(),
        }
    }
}

/// Synthesize the unitary for a gate kind
///
/// Parameter count must already have been validated by `Gate`
/// construction. Returns `None` for the non-unitary kinds (`measure`,
/// `barrier`, `reset`), which the engine handles specially.
pub fn matrix_of(kind: &GateKind, params: &[f64]) -> Option<GateMatrix> {
    let matrix = match kind {
        GateKind::X => GateMatrix::One(matrices::PAULI_X),
        GateKind::Y => GateMatrix::One(matrices::PAULI_Y),
        GateKind::Z => GateMatrix::One(matrices::PAULI_Z),
        GateKind::H => GateMatrix::One(matrices::HADAMARD),
        GateKind::S => GateMatrix::One(matrices::S_GATE),
        GateKind::Sdg => GateMatrix::One(matrices::S_DAGGER),
        GateKind::T => GateMatrix::One(matrices::T_GATE),
        GateKind::Tdg => GateMatrix::One(matrices::T_DAGGER),
        GateKind::Rx => GateMatrix::One(matrices::rotation_x(params[0])),
        GateKind::Ry => GateMatrix::One(matrices::rotation_y(params[0])),
        GateKind::Rz => GateMatrix::One(matrices::rotation_z(params[0])),
        GateKind::Phase | GateKind::U1 => GateMatrix::One(matrices::phase(params[0])),
        GateKind::U2 => GateMatrix::One(matrices::u2(params[0], params[1])),
        GateKind::U3 => GateMatrix::One(matrices::u3(params[0], params[1], params[2])),
        GateKind::Cnot => GateMatrix::Two(matrices::CNOT),
        GateKind::Cz => GateMatrix::Two(matrices::CZ),
        GateKind::Swap => GateMatrix::Two(matrices::SWAP),
        GateKind::ISwap => GateMatrix::Two(matrices::ISWAP),
        GateKind::SqrtISwap => GateMatrix::Two(matrices::SQRT_ISWAP),
        GateKind::CPhase | GateKind::Cu1 => {
            GateMatrix::Two(controlled(&matrices::phase(params[0])))
        }
        GateKind::Crx => GateMatrix::Two(controlled(&matrices::rotation_x(params[0]))),
        GateKind::Cry => GateMatrix::Two(controlled(&matrices::rotation_y(params[0]))),
        GateKind::Crz => GateMatrix::Two(controlled(&matrices::rotation_z(params[0]))),
        GateKind::Cu2 => GateMatrix::Two(controlled(&matrices::u2(params[0], params[1]))),
        GateKind::Cu3 => {
            GateMatrix::Two(controlled(&matrices::u3(params[0], params[1], params[2])))
        }
        GateKind::Ccx => GateMatrix::Three(matrices::TOFFOLI),
        GateKind::Ccz => GateMatrix::Three(matrices::CCZ),
        GateKind::Cswap => GateMatrix::Three(matrices::FREDKIN),
        GateKind::Custom(custom) => GateMatrix::Dyn(Arc::clone(custom)),
        GateKind::Measure | GateKind::Barrier | GateKind::Reset => return None,
    };
    Some(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_fixed_gate_synthesis() {
        let h = matrix_of(&GateKind::H, &[]).unwrap();
        assert_eq!(h.dim(), 2);

        let cx = matrix_of(&GateKind::Cnot, &[]).unwrap();
        assert_eq!(cx.dim(), 4);

        let ccx = matrix_of(&GateKind::Ccx, &[]).unwrap();
        assert_eq!(ccx.dim(), 8);
    }

    #[test]
    fn test_parameterized_synthesis() {
        let rx = matrix_of(&GateKind::Rx, &[PI]).unwrap();
        if let GateMatrix::One(m) = rx {
            assert_relative_eq!(m[0][0].re, 0.0, epsilon = 1e-12);
            assert_relative_eq!(m[0][1].im, -1.0, epsilon = 1e-12);
        } else {
            panic!("expected 2x2 matrix");
        }
    }

    #[test]
    fn test_u1_matches_phase() {
        let p = matrix_of(&GateKind::Phase, &[0.7]).unwrap();
        let u1 = matrix_of(&GateKind::U1, &[0.7]).unwrap();
        if let (GateMatrix::One(a), GateMatrix::One(b)) = (p, u1) {
            for i in 0..2 {
                for j in 0..2 {
                    assert_eq!(a[i][j], b[i][j]);
                }
            }
        } else {
            panic!("expected 2x2 matrices");
        }
    }

    #[test]
    fn test_non_unitary_kinds_have_no_matrix() {
        assert!(matrix_of(&GateKind::Measure, &[]).is_none());
        assert!(matrix_of(&GateKind::Barrier, &[]).is_none());
        assert!(matrix_of(&GateKind::Reset, &[]).is_none());
    }
}
