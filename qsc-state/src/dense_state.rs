//! Dense quantum state
//!
//! High-level facade over the aligned amplitude buffer: validated gate
//! application, probability queries, and norm discipline. Unitary
//! application never renormalizes; only measurement, reset, and noise
//! (handled by the engine) do.

use crate::error::{Result, StateError};
use crate::kernels;
use crate::state_vector::StateVector;
use num_complex::Complex64;

/// Default qubit count above which kernels run data-parallel
const DEFAULT_PARALLEL_THRESHOLD: usize = 14;

/// Dense state vector of 2ⁿ complex amplitudes
///
/// Owned exclusively by one engine at a time; snapshots are independent
/// copies made through the cache.
///
/// # Example
/// ```
/// use qsc_state::QuantumState;
///
/// let mut state = QuantumState::new(2).unwrap();
/// state.apply_h(0).unwrap();
/// assert!(state.is_normalized(1e-9));
/// ```
pub struct QuantumState {
    vector: StateVector,
    parallel_threshold: usize,
}

impl QuantumState {
    /// Create a state initialized to |0…0⟩
    pub fn new(num_qubits: usize) -> Result<Self> {
        Ok(Self {
            vector: StateVector::new(num_qubits)?,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Create a state from existing amplitudes (not renormalized)
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        Ok(Self {
            vector: StateVector::from_amplitudes(num_qubits, amplitudes)?,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Set the qubit count at which kernels go data-parallel
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.vector.num_qubits()
    }

    /// State dimension, 2^num_qubits
    #[inline]
    pub fn dimension(&self) -> usize {
        self.vector.dimension()
    }

    /// The amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        self.vector.amplitudes()
    }

    /// Mutable amplitudes (measurement and noise paths)
    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        self.vector.amplitudes_mut()
    }

    /// L2 norm
    pub fn norm(&self) -> f64 {
        self.vector.norm()
    }

    /// Whether |norm − 1| < epsilon
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        self.vector.is_normalized(epsilon)
    }

    /// Scale to unit norm (measurement/noise collapse only)
    pub fn renormalize(&mut self) {
        self.vector.normalize();
    }

    /// Reset every qubit to |0⟩
    pub fn reset_all(&mut self) {
        self.vector.reset();
    }

    #[inline]
    fn parallel(&self) -> bool {
        self.num_qubits() >= self.parallel_threshold
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits() {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits(),
            });
        }
        Ok(())
    }

    fn check_distinct(qubits: &[usize]) -> Result<()> {
        for i in 0..qubits.len() {
            for j in (i + 1)..qubits.len() {
                if qubits[i] == qubits[j] {
                    return Err(StateError::DuplicateQubit { qubit: qubits[i] });
                }
            }
        }
        Ok(())
    }

    /// Apply a 2×2 unitary to `qubit`
    pub fn apply_single(&mut self, matrix: &[[Complex64; 2]; 2], qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let parallel = self.parallel();
        kernels::apply_single(self.vector.amplitudes_mut(), matrix, qubit, parallel);
        Ok(())
    }

    /// Apply a diagonal 2×2 unitary to `qubit`
    pub fn apply_diagonal(&mut self, diagonal: [Complex64; 2], qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let parallel = self.parallel();
        kernels::apply_diagonal(self.vector.amplitudes_mut(), diagonal, qubit, parallel);
        Ok(())
    }

    /// Apply a 4×4 unitary to the pair `[a, b]` in gate order
    ///
    /// The first qubit of the pair is the least-significant bit of the
    /// matrix sub-index.
    pub fn apply_two(&mut self, matrix: &[[Complex64; 4]; 4], a: usize, b: usize) -> Result<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        Self::check_distinct(&[a, b])?;
        let parallel = self.parallel();
        kernels::apply_two(self.vector.amplitudes_mut(), matrix, a, b, parallel);
        Ok(())
    }

    /// Apply an 8×8 unitary to the triple `[a, b, c]` in gate order
    pub fn apply_three(
        &mut self,
        matrix: &[[Complex64; 8]; 8],
        a: usize,
        b: usize,
        c: usize,
    ) -> Result<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        self.check_qubit(c)?;
        Self::check_distinct(&[a, b, c])?;
        let parallel = self.parallel();
        kernels::apply_three(self.vector.amplitudes_mut(), matrix, a, b, c, parallel);
        Ok(())
    }

    /// Apply an arbitrary 2^k × 2^k unitary to `qubits` in gate order
    ///
    /// # Errors
    /// Returns `DimensionMismatch` when the matrix size doesn't match the
    /// qubit count. Unitarity is validated when the gate is built.
    pub fn apply_custom(&mut self, matrix: &[Complex64], qubits: &[usize]) -> Result<()> {
        for &q in qubits {
            self.check_qubit(q)?;
        }
        Self::check_distinct(qubits)?;
        let dim = 1usize << qubits.len();
        if matrix.len() != dim * dim {
            return Err(StateError::DimensionMismatch {
                expected: dim * dim,
                actual: matrix.len(),
            });
        }
        let parallel = self.parallel();
        kernels::apply_custom(self.vector.amplitudes_mut(), matrix, qubits, parallel);
        Ok(())
    }

    /// CNOT fast path
    pub fn apply_cnot(&mut self, control: usize, target: usize) -> Result<()> {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        Self::check_distinct(&[control, target])?;
        let parallel = self.parallel();
        kernels::apply_cnot(self.vector.amplitudes_mut(), control, target, parallel);
        Ok(())
    }

    /// CZ fast path
    pub fn apply_cz(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        Self::check_distinct(&[a, b])?;
        let parallel = self.parallel();
        kernels::apply_cz(self.vector.amplitudes_mut(), a, b, parallel);
        Ok(())
    }

    /// Convenience Hadamard, used widely in tests
    pub fn apply_h(&mut self, qubit: usize) -> Result<()> {
        const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;
        let h = [
            [
                Complex64::new(INV_SQRT2, 0.0),
                Complex64::new(INV_SQRT2, 0.0),
            ],
            [
                Complex64::new(INV_SQRT2, 0.0),
                Complex64::new(-INV_SQRT2, 0.0),
            ],
        ];
        self.apply_single(&h, qubit)
    }

    /// Probability that `qubit` measures as `value`
    pub fn qubit_probability(&self, qubit: usize, value: bool) -> Result<f64> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        let p1: f64 = self
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum();
        Ok(if value { p1 } else { 1.0 - p1 })
    }

    /// Probability of every basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes().iter().map(|a| a.norm_sqr()).collect()
    }
}

impl std::fmt::Debug for QuantumState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantumState")
            .field("num_qubits", &self.num_qubits())
            .field("norm", &self.norm())
            .finish()
    }
}
