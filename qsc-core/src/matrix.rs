//! Dense complex matrix helpers
//!
//! Small row-major matrix routines shared by custom-gate validation and the
//! Kraus completeness check. Matrices are flat `Vec<Complex64>` slices of
//! dimension `dim × dim`.

use num_complex::Complex64;

/// Tolerance for unitarity and completeness checks
pub const UNITARY_TOLERANCE: f64 = 1e-9;

/// Compute the conjugate transpose of a square matrix
pub fn adjoint(matrix: &[Complex64], dim: usize) -> Vec<Complex64> {
    let mut adj = vec![Complex64::new(0.0, 0.0); dim * dim];
    for i in 0..dim {
        for j in 0..dim {
            adj[j * dim + i] = matrix[i * dim + j].conj();
        }
    }
    adj
}

/// Multiply two square matrices of the same dimension
pub fn matmul(a: &[Complex64], b: &[Complex64], dim: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); dim * dim];
    for i in 0..dim {
        for k in 0..dim {
            let aik = a[i * dim + k];
            if aik.norm_sqr() == 0.0 {
                continue;
            }
            for j in 0..dim {
                out[i * dim + j] += aik * b[k * dim + j];
            }
        }
    }
    out
}

/// Apply a square matrix to a vector
pub fn matvec(matrix: &[Complex64], vector: &[Complex64], dim: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); dim];
    for i in 0..dim {
        let mut acc = Complex64::new(0.0, 0.0);
        for j in 0..dim {
            acc += matrix[i * dim + j] * vector[j];
        }
        out[i] = acc;
    }
    out
}

/// Maximum element-wise deviation of a matrix from the identity
pub fn identity_deviation(matrix: &[Complex64], dim: usize) -> f64 {
    let mut max_dev: f64 = 0.0;
    for i in 0..dim {
        for j in 0..dim {
            let expected = if i == j {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            };
            max_dev = max_dev.max((matrix[i * dim + j] - expected).norm());
        }
    }
    max_dev
}

/// Deviation of `U†U` from the identity
///
/// Returns 0 for an exactly unitary matrix. Callers compare against
/// [`UNITARY_TOLERANCE`].
pub fn unitarity_deviation(matrix: &[Complex64], dim: usize) -> f64 {
    let adj = adjoint(matrix, dim);
    let product = matmul(&adj, matrix, dim);
    identity_deviation(&product, dim)
}

/// Check whether a matrix is unitary within [`UNITARY_TOLERANCE`]
pub fn is_unitary(matrix: &[Complex64], dim: usize) -> bool {
    unitarity_deviation(matrix, dim) < UNITARY_TOLERANCE
}
