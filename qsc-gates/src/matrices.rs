//! Canonical gate matrices
//!
//! Fixed tables for the parameterless gates and generators for the
//! rotation/phase family.
//!
//! # Qubit ordering convention
//!
//! For a gate declared with qubit list `[a, b]` the matrix acts on the
//! computational basis ordered `|b a⟩`: the *first* qubit of the list is
//! the least-significant bit of the matrix sub-index. A 4×4 matrix row
//! index decomposes as `bit(a) + 2·bit(b)`; an 8×8 row index for
//! `[a, b, c]` as `bit(a) + 2·bit(b) + 4·bit(c)`. Controlled gates put the
//! control first, so the CNOT table below differs from the textbook
//! `|control target⟩` layout.

use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;
const C_INV_SQRT2: Complex64 = Complex64::new(INV_SQRT2, 0.0);
const C_I_INV_SQRT2: Complex64 = Complex64::new(0.0, INV_SQRT2);

// Single-qubit tables (2×2)

/// Pauli-X
pub const PAULI_X: [[Complex64; 2]; 2] = [[ZERO, ONE], [ONE, ZERO]];

/// Pauli-Y
pub const PAULI_Y: [[Complex64; 2]; 2] = [[ZERO, NEG_I], [I, ZERO]];

/// Pauli-Z
pub const PAULI_Z: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// Hadamard
pub const HADAMARD: [[Complex64; 2]; 2] = [
    [C_INV_SQRT2, C_INV_SQRT2],
    [C_INV_SQRT2, Complex64::new(-INV_SQRT2, 0.0)],
];

/// Identity
pub const IDENTITY: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, ONE]];

/// S = diag(1, i)
pub const S_GATE: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, I]];

/// S† = diag(1, -i)
pub const S_DAGGER: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, NEG_I]];

/// T = diag(1, e^{iπ/4})
pub const T_GATE: [[Complex64; 2]; 2] = [
    [ONE, ZERO],
    [ZERO, Complex64::new(INV_SQRT2, INV_SQRT2)],
];

/// T† = diag(1, e^{-iπ/4})
pub const T_DAGGER: [[Complex64; 2]; 2] = [
    [ONE, ZERO],
    [ZERO, Complex64::new(INV_SQRT2, -INV_SQRT2)],
];

// Two-qubit tables (4×4), qubit list LSB-first

/// CNOT for list `[control, target]`: rows with control bit set swap the
/// target components, so indices 1 ↔ 3 exchange
pub const CNOT: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ONE, ZERO, ZERO],
];

/// Controlled-Z (symmetric in its qubits)
pub const CZ: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ZERO, ZERO, NEG_ONE],
];

/// SWAP (symmetric)
pub const SWAP: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

/// iSWAP (symmetric)
pub const ISWAP: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, I, ZERO],
    [ZERO, I, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

/// √iSWAP (symmetric)
pub const SQRT_ISWAP: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, C_INV_SQRT2, C_I_INV_SQRT2, ZERO],
    [ZERO, C_I_INV_SQRT2, C_INV_SQRT2, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

// Three-qubit tables (8×8), qubit list LSB-first

/// Toffoli for list `[control1, control2, target]`: the target flips when
/// both controls are set, so indices 3 ↔ 7 exchange
pub const TOFFOLI: [[Complex64; 8]; 8] = {
    let mut m = [[ZERO; 8]; 8];
    let mut i = 0;
    while i < 8 {
        if i != 3 && i != 7 {
            m[i][i] = ONE;
        }
        i += 1;
    }
    m[3][7] = ONE;
    m[7][3] = ONE;
    m
};

/// Doubly-controlled Z: phase −1 on |111⟩
pub const CCZ: [[Complex64; 8]; 8] = {
    let mut m = [[ZERO; 8]; 8];
    let mut i = 0;
    while i < 8 {
        m[i][i] = if i == 7 { NEG_ONE } else { ONE };
        i += 1;
    }
    m
};

/// Fredkin for list `[control, target1, target2]`: the targets swap when
/// the control is set, so indices 3 ↔ 5 exchange
pub const FREDKIN: [[Complex64; 8]; 8] = {
    let mut m = [[ZERO; 8]; 8];
    let mut i = 0;
    while i < 8 {
        if i != 3 && i != 5 {
            m[i][i] = ONE;
        }
        i += 1;
    }
    m[3][5] = ONE;
    m[5][3] = ONE;
    m
};

// Parameterized generators

/// RX(θ) = [[cos(θ/2), -i·sin(θ/2)], [-i·sin(θ/2), cos(θ/2)]]
#[inline]
pub fn rotation_x(theta: f64) -> [[Complex64; 2]; 2] {
    let half = theta / 2.0;
    let c = Complex64::new(half.cos(), 0.0);
    let s = Complex64::new(0.0, -half.sin());
    [[c, s], [s, c]]
}

/// RY(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]
#[inline]
pub fn rotation_y(theta: f64) -> [[Complex64; 2]; 2] {
    let half = theta / 2.0;
    let c = Complex64::new(half.cos(), 0.0);
    let s = Complex64::new(half.sin(), 0.0);
    [[c, -s], [s, c]]
}

/// RZ(θ) = diag(e^{-iθ/2}, e^{iθ/2})
#[inline]
pub fn rotation_z(theta: f64) -> [[Complex64; 2]; 2] {
    let half = theta / 2.0;
    [
        [Complex64::new(half.cos(), -half.sin()), ZERO],
        [ZERO, Complex64::new(half.cos(), half.sin())],
    ]
}

/// P(λ) = diag(1, e^{iλ}); u1 is the same matrix
#[inline]
pub fn phase(lambda: f64) -> [[Complex64; 2]; 2] {
    [[ONE, ZERO], [ZERO, Complex64::new(lambda.cos(), lambda.sin())]]
}

/// u2(φ, λ) = 1/√2 [[1, -e^{iλ}], [e^{iφ}, e^{i(φ+λ)}]]
#[inline]
pub fn u2(phi: f64, lambda: f64) -> [[Complex64; 2]; 2] {
    let e_lambda = Complex64::new(lambda.cos(), lambda.sin());
    let e_phi = Complex64::new(phi.cos(), phi.sin());
    let e_sum = Complex64::new((phi + lambda).cos(), (phi + lambda).sin());
    [
        [C_INV_SQRT2, -e_lambda * INV_SQRT2],
        [e_phi * INV_SQRT2, e_sum * INV_SQRT2],
    ]
}

/// u3(θ, φ, λ) = [[cos(θ/2), -e^{iλ}·sin(θ/2)],
///               [e^{iφ}·sin(θ/2), e^{i(φ+λ)}·cos(θ/2)]]
#[inline]
pub fn u3(theta: f64, phi: f64, lambda: f64) -> [[Complex64; 2]; 2] {
    let half = theta / 2.0;
    let cos = half.cos();
    let sin = half.sin();
    let e_lambda = Complex64::new(lambda.cos(), lambda.sin());
    let e_phi = Complex64::new(phi.cos(), phi.sin());
    let e_sum = Complex64::new((phi + lambda).cos(), (phi + lambda).sin());
    [
        [Complex64::new(cos, 0.0), -e_lambda * sin],
        [e_phi * sin, e_sum * cos],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix_ops::{is_unitary2, matmul2};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn assert_matrix_eq(a: &[[Complex64; 2]; 2], b: &[[Complex64; 2]; 2]) {
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(a[i][j].re, b[i][j].re, epsilon = 1e-12);
                assert_relative_eq!(a[i][j].im, b[i][j].im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_hadamard_self_inverse() {
        let hh = matmul2(&HADAMARD, &HADAMARD);
        assert_matrix_eq(&hh, &IDENTITY);
    }

    #[test]
    fn test_s_squared_is_z() {
        let ss = matmul2(&S_GATE, &S_GATE);
        assert_matrix_eq(&ss, &PAULI_Z);
    }

    #[test]
    fn test_t_squared_is_s() {
        let tt = matmul2(&T_GATE, &T_GATE);
        assert_matrix_eq(&tt, &S_GATE);
    }

    #[test]
    fn test_s_sdg_cancel() {
        let prod = matmul2(&S_GATE, &S_DAGGER);
        assert_matrix_eq(&prod, &IDENTITY);
    }

    #[test]
    fn test_rotation_x_zero_is_identity() {
        assert_matrix_eq(&rotation_x(0.0), &IDENTITY);
    }

    #[test]
    fn test_rotation_x_pi_is_minus_i_x() {
        let rx = rotation_x(PI);
        for i in 0..2 {
            for j in 0..2 {
                let expected = NEG_I * PAULI_X[i][j];
                assert_relative_eq!(rx[i][j].re, expected.re, epsilon = 1e-12);
                assert_relative_eq!(rx[i][j].im, expected.im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_u3_specializations() {
        // u3(0, 0, λ) = P(λ) and u2(φ, λ) = u3(π/2, φ, λ)
        assert_matrix_eq(&u3(0.0, 0.0, 1.3), &phase(1.3));
        assert_matrix_eq(&u2(0.7, 1.1), &u3(PI / 2.0, 0.7, 1.1));
    }

    #[test]
    fn test_parameterized_gates_unitary() {
        for theta in [0.0, 0.3, PI / 2.0, PI, 4.2] {
            assert!(is_unitary2(&rotation_x(theta)));
            assert!(is_unitary2(&rotation_y(theta)));
            assert!(is_unitary2(&rotation_z(theta)));
            assert!(is_unitary2(&phase(theta)));
            assert!(is_unitary2(&u3(theta, 0.4, 0.9)));
        }
    }

    #[test]
    fn test_cnot_convention() {
        // List [control, target]: control is the least-significant bit.
        // |c=1, t=0⟩ is index 1 and must map to |c=1, t=1⟩ = index 3.
        assert_eq!(CNOT[3][1], ONE);
        assert_eq!(CNOT[1][3], ONE);
        assert_eq!(CNOT[0][0], ONE);
        assert_eq!(CNOT[2][2], ONE);
    }

    #[test]
    fn test_toffoli_convention() {
        // List [c1, c2, t]: controls are bits 0 and 1, so index 3 ↔ 7.
        assert_eq!(TOFFOLI[3][7], ONE);
        assert_eq!(TOFFOLI[7][3], ONE);
        assert_eq!(TOFFOLI[6][6], ONE);
    }

    #[test]
    fn test_fredkin_convention() {
        // List [c, t1, t2]: control is bit 0, so index 3 ↔ 5.
        assert_eq!(FREDKIN[3][5], ONE);
        assert_eq!(FREDKIN[5][3], ONE);
        assert_eq!(FREDKIN[7][7], ONE);
    }
}
