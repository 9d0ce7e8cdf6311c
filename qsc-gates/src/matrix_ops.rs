//! Fixed-size matrix helpers
//!
//! Operations on the 2×2 and 4×4 arrays used by the gate tables. Flat
//! `Vec`-based helpers for arbitrary dimensions live in
//! `qsc_core::matrix`.

use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Multiply two 2×2 matrices
pub fn matmul2(a: &[[Complex64; 2]; 2], b: &[[Complex64; 2]; 2]) -> [[Complex64; 2]; 2] {
    let mut out = [[ZERO; 2]; 2];
    for i in 0..2 {
        for j in 0..2 {
            for k in 0..2 {
                out[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    out
}

/// Multiply two 4×4 matrices
pub fn matmul4(a: &[[Complex64; 4]; 4], b: &[[Complex64; 4]; 4]) -> [[Complex64; 4]; 4] {
    let mut out = [[ZERO; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                out[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    out
}

/// Conjugate transpose of a 2×2 matrix
pub fn adjoint2(m: &[[Complex64; 2]; 2]) -> [[Complex64; 2]; 2] {
    [
        [m[0][0].conj(), m[1][0].conj()],
        [m[0][1].conj(), m[1][1].conj()],
    ]
}

/// Conjugate transpose of a 4×4 matrix
pub fn adjoint4(m: &[[Complex64; 4]; 4]) -> [[Complex64; 4]; 4] {
    let mut out = [[ZERO; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            out[j][i] = m[i][j].conj();
        }
    }
    out
}

/// Whether a 2×2 matrix is unitary within 1e-9
pub fn is_unitary2(m: &[[Complex64; 2]; 2]) -> bool {
    let product = matmul2(&adjoint2(m), m);
    max_identity_deviation(&product.concat()) < 1e-9
}

/// Whether a 4×4 matrix is unitary within 1e-9
pub fn is_unitary4(m: &[[Complex64; 4]; 4]) -> bool {
    let product = matmul4(&adjoint4(m), m);
    max_identity_deviation(&product.concat()) < 1e-9
}

fn max_identity_deviation(flat: &[Complex64]) -> f64 {
    let dim = (flat.len() as f64).sqrt() as usize;
    let mut max_dev: f64 = 0.0;
    for i in 0..dim {
        for j in 0..dim {
            let expected = if i == j { ONE } else { ZERO };
            max_dev = max_dev.max((flat[i * dim + j] - expected).norm());
        }
    }
    max_dev
}

/// Embed a single-qubit unitary as its controlled form
///
/// Follows the qubit-list convention of [`crate::matrices`]: the control
/// is the least-significant sub-index, so the target unitary lands on the
/// odd basis states |c=1, t⟩.
pub fn controlled(u: &[[Complex64; 2]; 2]) -> [[Complex64; 4]; 4] {
    let mut m = [[ZERO; 4]; 4];
    m[0][0] = ONE;
    m[2][2] = ONE;
    m[1][1] = u[0][0];
    m[1][3] = u[0][1];
    m[3][1] = u[1][0];
    m[3][3] = u[1][1];
    m
}
