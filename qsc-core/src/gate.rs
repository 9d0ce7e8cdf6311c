//! Quantum gate model
//!
//! Gates are a closed sum type: a [`GateKind`] tag plus the qubits and
//! numeric parameters it applies to. Matrix synthesis is driven by the tag
//! (see `qsc-gates`), so every consumer gets exhaustive match checking and
//! no per-gate virtual dispatch. Custom unitaries are the one escape hatch
//! and carry their own validated matrix.

use crate::matrix;
use crate::{ClbitId, QuantumError, QubitId, Result};
use num_complex::Complex64;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Closed set of gate tags
///
/// The taxonomy covers the qelib1 gate set plus reset, measurement,
/// barriers, and user-supplied unitaries. Parameter counts are fixed per
/// tag and validated when a [`Gate`] is constructed.
#[derive(Clone, Debug, PartialEq)]
pub enum GateKind {
    // Single-qubit gates
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    /// Rotation about X: RX(θ)
    Rx,
    /// Rotation about Y: RY(θ)
    Ry,
    /// Rotation about Z: RZ(θ)
    Rz,
    /// Phase gate P(λ) = diag(1, e^{iλ})
    Phase,
    /// u1(λ), identical to the phase gate
    U1,
    /// u2(φ, λ)
    U2,
    /// u3(θ, φ, λ)
    U3,
    /// Non-unitary reset to |0⟩
    Reset,

    // Two-qubit gates (first qubit in the list is the control where one exists)
    Cnot,
    Cz,
    Swap,
    ISwap,
    SqrtISwap,
    CPhase,
    Crx,
    Cry,
    Crz,
    Cu1,
    Cu2,
    Cu3,

    // Three-qubit gates
    Ccx,
    Ccz,
    Cswap,

    // Meta operations
    /// Projective measurement into a classical bit
    Measure,
    /// Scheduling barrier over its qubits
    Barrier,
    /// User-supplied k-qubit unitary
    Custom(Arc<CustomGate>),
}

/// Rotation axis classes for the merging pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeAxis {
    X,
    Y,
    Z,
    Phase,
}

impl GateKind {
    /// QASM-facing name of this gate
    pub fn name(&self) -> &str {
        match self {
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::H => "h",
            GateKind::S => "s",
            GateKind::Sdg => "sdg",
            GateKind::T => "t",
            GateKind::Tdg => "tdg",
            GateKind::Rx => "rx",
            GateKind::Ry => "ry",
            GateKind::Rz => "rz",
            GateKind::Phase => "p",
            GateKind::U1 => "u1",
            GateKind::U2 => "u2",
            GateKind::U3 => "u3",
            GateKind::Reset => "reset",
            GateKind::Cnot => "cx",
            GateKind::Cz => "cz",
            GateKind::Swap => "swap",
            GateKind::ISwap => "iswap",
            GateKind::SqrtISwap => "siswap",
            GateKind::CPhase => "cp",
            GateKind::Crx => "crx",
            GateKind::Cry => "cry",
            GateKind::Crz => "crz",
            GateKind::Cu1 => "cu1",
            GateKind::Cu2 => "cu2",
            GateKind::Cu3 => "cu3",
            GateKind::Ccx => "ccx",
            GateKind::Ccz => "ccz",
            GateKind::Cswap => "cswap",
            GateKind::Measure => "measure",
            GateKind::Barrier => "barrier",
            GateKind::Custom(custom) => &custom.name,
        }
    }

    /// Number of qubits this kind acts on, or `None` for variable arity
    ///
    /// Only `Barrier` has variable arity.
    pub fn arity(&self) -> Option<usize> {
        match self {
            GateKind::X
            | GateKind::Y
            | GateKind::Z
            | GateKind::H
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg
            | GateKind::Rx
            | GateKind::Ry
            | GateKind::Rz
            | GateKind::Phase
            | GateKind::U1
            | GateKind::U2
            | GateKind::U3
            | GateKind::Reset
            | GateKind::Measure => Some(1),
            GateKind::Cnot
            | GateKind::Cz
            | GateKind::Swap
            | GateKind::ISwap
            | GateKind::SqrtISwap
            | GateKind::CPhase
            | GateKind::Crx
            | GateKind::Cry
            | GateKind::Crz
            | GateKind::Cu1
            | GateKind::Cu2
            | GateKind::Cu3 => Some(2),
            GateKind::Ccx | GateKind::Ccz | GateKind::Cswap => Some(3),
            GateKind::Barrier => None,
            GateKind::Custom(custom) => Some(custom.num_qubits()),
        }
    }

    /// Number of real parameters this kind takes
    pub fn num_params(&self) -> usize {
        match self {
            GateKind::Rx
            | GateKind::Ry
            | GateKind::Rz
            | GateKind::Phase
            | GateKind::U1
            | GateKind::CPhase
            | GateKind::Crx
            | GateKind::Cry
            | GateKind::Crz
            | GateKind::Cu1 => 1,
            GateKind::U2 | GateKind::Cu2 => 2,
            GateKind::U3 | GateKind::Cu3 => 3,
            _ => 0,
        }
    }

    /// Whether this kind represents a unitary operation
    pub fn is_unitary(&self) -> bool {
        !matches!(
            self,
            GateKind::Measure | GateKind::Barrier | GateKind::Reset
        )
    }

    /// Whether this kind is its own inverse
    pub fn is_hermitian(&self) -> bool {
        matches!(
            self,
            GateKind::X
                | GateKind::Y
                | GateKind::Z
                | GateKind::H
                | GateKind::Cnot
                | GateKind::Cz
                | GateKind::Swap
                | GateKind::Ccx
                | GateKind::Ccz
                | GateKind::Cswap
        )
    }

    /// Whether the single-qubit matrix is diagonal
    ///
    /// Diagonal gates on the same qubit commute with each other.
    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            GateKind::Z
                | GateKind::S
                | GateKind::Sdg
                | GateKind::T
                | GateKind::Tdg
                | GateKind::Rz
                | GateKind::Phase
                | GateKind::U1
        )
    }

    /// Whether the gate lies in the span of {I, X}
    ///
    /// X and RX on the same qubit commute with each other.
    pub fn is_x_axis(&self) -> bool {
        matches!(self, GateKind::X | GateKind::Rx)
    }

    /// Whether a gate of this kind cancels with an adjacent gate of `other`
    /// on the same qubit list (parameters are checked separately)
    ///
    /// The lookup is symmetric: `a.cancels_with(b) == b.cancels_with(a)`.
    pub fn cancels_with(&self, other: &GateKind) -> bool {
        matches!(
            (self, other),
            (GateKind::X, GateKind::X)
                | (GateKind::Y, GateKind::Y)
                | (GateKind::Z, GateKind::Z)
                | (GateKind::H, GateKind::H)
                | (GateKind::S, GateKind::Sdg)
                | (GateKind::Sdg, GateKind::S)
                | (GateKind::T, GateKind::Tdg)
                | (GateKind::Tdg, GateKind::T)
                | (GateKind::Cnot, GateKind::Cnot)
                | (GateKind::Cz, GateKind::Cz)
                | (GateKind::Swap, GateKind::Swap)
        )
    }

    /// Rotation axis for the merging pass, if this kind merges
    pub fn merge_axis(&self) -> Option<MergeAxis> {
        match self {
            GateKind::Rx => Some(MergeAxis::X),
            GateKind::Ry => Some(MergeAxis::Y),
            GateKind::Rz => Some(MergeAxis::Z),
            GateKind::Phase | GateKind::U1 => Some(MergeAxis::Phase),
            _ => None,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A user-supplied unitary over k qubits
///
/// The matrix is stored row-major with dimension `2^k`. Unitarity is
/// verified to 1e-9 at construction; a gate that fails the check never
/// enters a circuit.
#[derive(Clone, Debug)]
pub struct CustomGate {
    name: String,
    dim: usize,
    matrix: Vec<Complex64>,
}

impl CustomGate {
    /// Create a custom gate from a row-major matrix
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the matrix is not square with a
    /// power-of-two dimension, and `NonUnitary` if `U†U` deviates from the
    /// identity by more than 1e-9.
    pub fn new(name: impl Into<String>, matrix: Vec<Complex64>, dim: usize) -> Result<Self> {
        let name = name.into();
        if !dim.is_power_of_two() || dim < 2 || matrix.len() != dim * dim {
            return Err(QuantumError::DimensionMismatch {
                expected: dim * dim,
                actual: matrix.len(),
            });
        }

        let deviation = matrix::unitarity_deviation(&matrix, dim);
        if deviation >= matrix::UNITARY_TOLERANCE {
            return Err(QuantumError::NonUnitary { name, deviation });
        }

        Ok(Self { name, dim, matrix })
    }

    /// Gate name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Matrix dimension (2^k)
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of qubits the gate acts on
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.dim.trailing_zeros() as usize
    }

    /// Row-major matrix elements
    #[inline]
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }
}

impl PartialEq for CustomGate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.dim == other.dim && self.matrix == other.matrix
    }
}

/// Classical condition attached to a gate
///
/// The gate executes only when `classical_register & mask == value`. This
/// models OpenQASM `if (c == v) ...` statements, where `mask` selects the
/// bits of the tested register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Condition {
    /// Bits of the classical register that participate in the test
    pub mask: u64,
    /// Expected value of the masked bits
    pub value: u64,
}

/// A gate application: kind, target qubits, and parameters
///
/// # Example
/// ```
/// use qsc_core::{Gate, GateKind, QubitId};
///
/// let cx = Gate::new(GateKind::Cnot, &[QubitId::new(0), QubitId::new(1)]).unwrap();
/// assert_eq!(cx.kind(), &GateKind::Cnot);
/// assert_eq!(cx.qubits().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    kind: GateKind,
    qubits: SmallVec<[QubitId; 2]>,
    params: SmallVec<[f64; 3]>,
    cbit: Option<ClbitId>,
    condition: Option<Condition>,
}

impl Gate {
    /// Create a parameterless gate
    ///
    /// # Errors
    /// Returns an error if the qubit count doesn't match the kind's arity,
    /// a qubit appears twice, or the kind requires parameters.
    pub fn new(kind: GateKind, qubits: &[QubitId]) -> Result<Self> {
        Self::with_params(kind, qubits, &[])
    }

    /// Create a gate with parameters
    ///
    /// # Errors
    /// Returns an error on arity mismatch, duplicate qubits, or wrong
    /// parameter count.
    pub fn with_params(kind: GateKind, qubits: &[QubitId], params: &[f64]) -> Result<Self> {
        if let Some(arity) = kind.arity() {
            if qubits.len() != arity {
                return Err(QuantumError::invalid_qubit_count(
                    kind.name(),
                    arity,
                    qubits.len(),
                ));
            }
        } else if qubits.is_empty() {
            return Err(QuantumError::invalid_qubit_count(kind.name(), 1, 0));
        }

        for i in 0..qubits.len() {
            for j in (i + 1)..qubits.len() {
                if qubits[i] == qubits[j] {
                    return Err(QuantumError::DuplicateQubit(qubits[i]));
                }
            }
        }

        if params.len() != kind.num_params() {
            return Err(QuantumError::invalid_param_count(
                kind.name(),
                kind.num_params(),
                params.len(),
            ));
        }

        Ok(Self {
            kind,
            qubits: SmallVec::from_slice(qubits),
            params: SmallVec::from_slice(params),
            cbit: None,
            condition: None,
        })
    }

    /// Create a measurement of `qubit` into `cbit`
    pub fn measure(qubit: QubitId, cbit: ClbitId) -> Self {
        Self {
            kind: GateKind::Measure,
            qubits: SmallVec::from_slice(&[qubit]),
            params: SmallVec::new(),
            cbit: Some(cbit),
            condition: None,
        }
    }

    /// Create a barrier over the given qubits
    ///
    /// # Errors
    /// Returns an error if the qubit list is empty or has duplicates.
    pub fn barrier(qubits: &[QubitId]) -> Result<Self> {
        Self::with_params(GateKind::Barrier, qubits, &[])
    }

    /// Create a custom-unitary gate
    ///
    /// # Errors
    /// Propagates matrix validation failures and rejects qubit lists whose
    /// length doesn't match the matrix dimension.
    pub fn custom(
        name: impl Into<String>,
        matrix: Vec<Complex64>,
        qubits: &[QubitId],
    ) -> Result<Self> {
        let dim = 1usize << qubits.len();
        let custom = CustomGate::new(name, matrix, dim)?;
        Self::new(GateKind::Custom(Arc::new(custom)), qubits)
    }

    /// Attach a classical condition to this gate
    pub fn with_condition(mut self, mask: u64, value: u64) -> Self {
        self.condition = Some(Condition { mask, value });
        self
    }

    /// The gate kind
    #[inline]
    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    /// Qubits the gate acts on, in declaration order
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Mutable access to the qubit list (used by qubit remapping)
    #[inline]
    pub fn qubits_mut(&mut self) -> &mut [QubitId] {
        &mut self.qubits
    }

    /// Gate parameters
    #[inline]
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Replace the parameter list (used by rotation merging)
    pub fn set_params(&mut self, params: &[f64]) {
        self.params = SmallVec::from_slice(params);
    }

    /// Measurement target, if this is a measurement
    #[inline]
    pub fn cbit(&self) -> Option<ClbitId> {
        self.cbit
    }

    /// Classical condition, if any
    #[inline]
    pub fn condition(&self) -> Option<Condition> {
        self.condition
    }

    /// Number of qubits the gate touches
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the gate shares any qubit with `other`
    pub fn overlaps(&self, other: &Gate) -> bool {
        self.qubits.iter().any(|q| other.qubits.contains(q))
    }

    /// Whether the gate is an unconditioned unitary
    ///
    /// Measurements, resets, barriers, and classically-conditioned gates
    /// act as rewrite barriers in the optimizer.
    pub fn is_plain_unitary(&self) -> bool {
        self.kind.is_unitary() && self.condition.is_none()
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cond) = self.condition {
            write!(f, "if(c&{:#x}=={}) ", cond.mask, cond.value)?;
        }
        write!(f, "{}", self.kind.name())?;
        if !self.params.is_empty() {
            write!(f, "(")?;
            for (i, p) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", p)?;
            }
            write!(f, ")")?;
        }
        write!(f, " ")?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        if let Some(c) = self.cbit {
            write!(f, " -> {}", c)?;
        }
        Ok(())
    }
}
