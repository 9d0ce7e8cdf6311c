//! Kraus operator representation

use crate::matrix;
use crate::{QuantumError, Result};
use num_complex::Complex64;

/// A Kraus operator
///
/// A noise channel is a set {Kᵢ} with Σ Kᵢ†Kᵢ = I; it transforms a density
/// matrix as ρ → Σᵢ Kᵢ ρ Kᵢ†. On pure states the engine applies one Kᵢ per
/// trajectory, chosen with probability ‖Kᵢ|ψ⟩‖².
#[derive(Clone, Debug, PartialEq)]
pub struct KrausOperator {
    /// Matrix elements in row-major order (dimension × dimension)
    matrix: Vec<Complex64>,
    /// Matrix dimension, 2^k for a k-qubit operator
    dimension: usize,
}

impl KrausOperator {
    /// Create a Kraus operator from a row-major matrix
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the dimension is not a power of two
    /// or the element count doesn't match.
    pub fn new(matrix: Vec<Complex64>, dimension: usize) -> Result<Self> {
        if !dimension.is_power_of_two() || dimension == 0 || matrix.len() != dimension * dimension {
            return Err(QuantumError::DimensionMismatch {
                expected: dimension * dimension,
                actual: matrix.len(),
            });
        }
        Ok(Self { matrix, dimension })
    }

    /// Build a 2×2 operator from a scalar multiple of a base matrix
    pub(crate) fn scaled_2x2(base: [Complex64; 4], factor: f64) -> Self {
        Self {
            matrix: base.iter().map(|&x| x * factor).collect(),
            dimension: 2,
        }
    }

    /// Matrix dimension
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of qubits the operator acts on
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.dimension.trailing_zeros() as usize
    }

    /// Row-major matrix elements
    #[inline]
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }

    /// Matrix element at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dimension + col]
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> Self {
        Self {
            matrix: matrix::adjoint(&self.matrix, self.dimension),
            dimension: self.dimension,
        }
    }
}

/// Verify Σ Kᵢ†Kᵢ = I for a Kraus set
///
/// # Errors
/// Returns `KrausCompleteness` when the sum deviates from the identity by
/// more than 1e-9, and `DimensionMismatch` when operators disagree on
/// dimension or the set is empty.
pub(crate) fn verify_completeness(operators: &[KrausOperator]) -> Result<()> {
    let dim = match operators.first() {
        Some(op) => op.dimension,
        None => {
            return Err(QuantumError::DimensionMismatch {
                expected: 2,
                actual: 0,
            })
        }
    };

    let mut sum = vec![Complex64::new(0.0, 0.0); dim * dim];
    for op in operators {
        if op.dimension != dim {
            return Err(QuantumError::DimensionMismatch {
                expected: dim,
                actual: op.dimension,
            });
        }
        let adj = op.adjoint();
        let product = matrix::matmul(adj.matrix(), op.matrix(), dim);
        for (acc, value) in sum.iter_mut().zip(product) {
            *acc += value;
        }
    }

    let deviation = matrix::identity_deviation(&sum, dim);
    if deviation >= matrix::UNITARY_TOLERANCE {
        return Err(QuantumError::KrausCompleteness { deviation });
    }
    Ok(())
}
