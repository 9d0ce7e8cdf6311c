//! Qubit and classical-bit identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a qubit in a circuit
///
/// Qubit 0 is the least-significant bit of state-vector indices: the basis
/// state |b_{n-1} … b_0⟩ has integer index Σ bᵢ·2ⁱ. Every component of the
/// pipeline (gates, measurement, textual output) follows this ordering.
///
/// # Example
/// ```
/// use qsc_core::QubitId;
///
/// let q = QubitId::new(2);
/// assert_eq!(q.index(), 2);
/// assert_eq!(format!("{}", q), "q2");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Create a new qubit identifier
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the flat qubit index
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Bit mask selecting this qubit in a basis-state index
    #[inline]
    pub const fn mask(self) -> usize {
        1 << self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// Identifier for a classical bit
///
/// Classical bits store single measurement outcomes. They are write-once
/// per measurement and readable by classically-conditioned gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// Create a new classical-bit identifier
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the flat bit index
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}
