//! Quantum circuit representation
//!
//! A circuit is an ordered sequence of gates over a fixed qubit width and
//! classical-bit width. Circuits are built incrementally (append-only) and
//! then treated as frozen by the optimizer and the execution engine.

use crate::gate::{Gate, GateKind};
use crate::{ClbitId, QuantumError, QubitId, Result};

/// Maximum supported qubit count
///
/// 30 qubits keeps the dense state vector at ~16 GiB with 16-byte
/// amplitudes, the practical ceiling for a single host.
pub const MAX_QUBITS: usize = 30;

/// A quantum circuit
///
/// # Example
/// ```
/// use qsc_core::Circuit;
///
/// let mut circuit = Circuit::new(2, 2).unwrap();
/// circuit.h(0).unwrap();
/// circuit.cx(0, 1).unwrap();
/// circuit.measure(0, 0).unwrap();
/// circuit.measure(1, 1).unwrap();
///
/// assert_eq!(circuit.num_qubits(), 2);
/// assert_eq!(circuit.len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    gates: Vec<Gate>,
    /// Qubit relabeling recorded by the remapping pass:
    /// `layout[original] = current`. `None` until the pass runs.
    layout: Option<Vec<u32>>,
}

impl Circuit {
    /// Create an empty circuit
    ///
    /// # Errors
    /// Returns `EmptyCircuit` for zero qubits and `TooManyQubits` above
    /// [`MAX_QUBITS`].
    pub fn new(num_qubits: usize, num_clbits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QuantumError::EmptyCircuit);
        }
        if num_qubits > MAX_QUBITS {
            return Err(QuantumError::TooManyQubits {
                num_qubits,
                max_qubits: MAX_QUBITS,
            });
        }
        Ok(Self {
            num_qubits,
            num_clbits,
            gates: Vec::new(),
            layout: None,
        })
    }

    /// Create a circuit with pre-allocated gate capacity
    pub fn with_capacity(num_qubits: usize, num_clbits: usize, capacity: usize) -> Result<Self> {
        let mut circuit = Self::new(num_qubits, num_clbits)?;
        circuit.gates.reserve(capacity);
        Ok(circuit)
    }

    /// Number of qubits
    #[inline]
    pub const fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of classical bits
    #[inline]
    pub const fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Number of gates
    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the circuit has no gates
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Append a gate after validating its indices against this circuit
    ///
    /// # Errors
    /// Returns an error if any qubit or classical-bit index is out of
    /// range for this circuit.
    pub fn push(&mut self, gate: Gate) -> Result<()> {
        for &qubit in gate.qubits() {
            if qubit.index() >= self.num_qubits {
                return Err(QuantumError::invalid_qubit(qubit.index(), self.num_qubits));
            }
        }
        if matches!(gate.kind(), GateKind::Measure) && gate.cbit().is_none() {
            return Err(QuantumError::ValidationError(
                "measurement without a target classical bit".to_string(),
            ));
        }
        if let Some(cbit) = gate.cbit() {
            if cbit.index() >= self.num_clbits {
                return Err(QuantumError::InvalidClbit(cbit.index(), self.num_clbits));
            }
        }
        if let Some(cond) = gate.condition() {
            let width = 64 - cond.mask.leading_zeros() as usize;
            if width > self.num_clbits {
                return Err(QuantumError::InvalidClbit(
                    width.saturating_sub(1),
                    self.num_clbits,
                ));
            }
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Iterate over the gates in order
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    /// The gate sequence as a slice
    #[inline]
    pub fn gates_slice(&self) -> &[Gate] {
        &self.gates
    }

    /// Mutable access to the gate sequence (optimizer passes only)
    #[inline]
    pub fn gates_mut(&mut self) -> &mut Vec<Gate> {
        &mut self.gates
    }

    /// Get a gate by index
    pub fn get(&self, index: usize) -> Option<&Gate> {
        self.gates.get(index)
    }

    /// Qubit relabeling recorded by the remapping pass, if it ran
    pub fn layout(&self) -> Option<&[u32]> {
        self.layout.as_deref()
    }

    /// Record a qubit relabeling (`layout[original] = current`)
    pub fn set_layout(&mut self, layout: Vec<u32>) {
        debug_assert_eq!(layout.len(), self.num_qubits);
        self.layout = Some(layout);
    }

    /// Circuit depth: the number of parallel layers
    ///
    /// A gate enters the earliest layer later than every prior gate that
    /// shares one of its qubits. Barriers occupy a layer across their
    /// qubits like any other gate.
    pub fn depth(&self) -> usize {
        let mut frontier = vec![0usize; self.num_qubits];
        let mut depth = 0;
        for gate in &self.gates {
            let layer = gate
                .qubits()
                .iter()
                .map(|q| frontier[q.index()])
                .max()
                .unwrap_or(0);
            for q in gate.qubits() {
                frontier[q.index()] = layer + 1;
            }
            depth = depth.max(layer + 1);
        }
        depth
    }

    /// Validate every gate against the circuit widths
    pub fn validate(&self) -> Result<()> {
        for (i, gate) in self.gates.iter().enumerate() {
            for &qubit in gate.qubits() {
                if qubit.index() >= self.num_qubits {
                    return Err(QuantumError::ValidationError(format!(
                        "gate {} uses invalid qubit {}",
                        i, qubit
                    )));
                }
            }
            if let Some(cbit) = gate.cbit() {
                if cbit.index() >= self.num_clbits {
                    return Err(QuantumError::ValidationError(format!(
                        "gate {} writes invalid classical bit {}",
                        i, cbit
                    )));
                }
            }
        }
        Ok(())
    }

    /// Traversal handoff for external renderers (DOT, LaTeX, ASCII)
    ///
    /// Yields one node per gate in execution order with the metadata a
    /// renderer needs; the core ships no renderer itself.
    pub fn traversal(&self) -> impl Iterator<Item = TraversalNode<'_>> {
        self.gates.iter().enumerate().map(|(index, gate)| TraversalNode {
            index,
            name: gate.kind().name(),
            qubits: gate.qubits(),
            params: gate.params(),
            cbit: gate.cbit(),
            conditional: gate.condition().is_some(),
        })
    }
}

/// Per-gate metadata handed to renderer collaborators
#[derive(Clone, Copy, Debug)]
pub struct TraversalNode<'a> {
    pub index: usize,
    pub name: &'a str,
    pub qubits: &'a [QubitId],
    pub params: &'a [f64],
    pub cbit: Option<ClbitId>,
    pub conditional: bool,
}

macro_rules! single_qubit_builders {
    ($(($fn_name:ident, $kind:expr)),* $(,)?) => {
        $(
            #[doc = concat!("Append `", stringify!($fn_name), "` on `qubit`")]
            pub fn $fn_name(&mut self, qubit: u32) -> Result<()> {
                self.push(Gate::new($kind, &[QubitId::new(qubit)])?)
            }
        )*
    };
}

macro_rules! rotation_builders {
    ($(($fn_name:ident, $kind:expr)),* $(,)?) => {
        $(
            #[doc = concat!("Append `", stringify!($fn_name), "(theta)` on `qubit`")]
            pub fn $fn_name(&mut self, theta: f64, qubit: u32) -> Result<()> {
                self.push(Gate::with_params($kind, &[QubitId::new(qubit)], &[theta])?)
            }
        )*
    };
}

macro_rules! two_qubit_builders {
    ($(($fn_name:ident, $kind:expr)),* $(,)?) => {
        $(
            #[doc = concat!("Append `", stringify!($fn_name), "` on `(a, b)`")]
            pub fn $fn_name(&mut self, a: u32, b: u32) -> Result<()> {
                self.push(Gate::new($kind, &[QubitId::new(a), QubitId::new(b)])?)
            }
        )*
    };
}

/// Builder methods mirroring the qelib1 gate set
impl Circuit {
    single_qubit_builders![
        (x, GateKind::X),
        (y, GateKind::Y),
        (z, GateKind::Z),
        (h, GateKind::H),
        (s, GateKind::S),
        (sdg, GateKind::Sdg),
        (t, GateKind::T),
        (tdg, GateKind::Tdg),
        (reset, GateKind::Reset),
    ];

    rotation_builders![
        (rx, GateKind::Rx),
        (ry, GateKind::Ry),
        (rz, GateKind::Rz),
        (p, GateKind::Phase),
        (u1, GateKind::U1),
    ];

    two_qubit_builders![
        (cx, GateKind::Cnot),
        (cz, GateKind::Cz),
        (swap, GateKind::Swap),
        (iswap, GateKind::ISwap),
        (siswap, GateKind::SqrtISwap),
    ];

    /// Append `u2(phi, lambda)` on `qubit`
    pub fn u2(&mut self, phi: f64, lambda: f64, qubit: u32) -> Result<()> {
        self.push(Gate::with_params(
            GateKind::U2,
            &[QubitId::new(qubit)],
            &[phi, lambda],
        )?)
    }

    /// Append `u3(theta, phi, lambda)` on `qubit`
    pub fn u3(&mut self, theta: f64, phi: f64, lambda: f64, qubit: u32) -> Result<()> {
        self.push(Gate::with_params(
            GateKind::U3,
            &[QubitId::new(qubit)],
            &[theta, phi, lambda],
        )?)
    }

    /// Append a controlled phase `cp(lambda)` on `(control, target)`
    pub fn cp(&mut self, lambda: f64, control: u32, target: u32) -> Result<()> {
        self.push(Gate::with_params(
            GateKind::CPhase,
            &[QubitId::new(control), QubitId::new(target)],
            &[lambda],
        )?)
    }

    /// Append `crx(theta)` on `(control, target)`
    pub fn crx(&mut self, theta: f64, control: u32, target: u32) -> Result<()> {
        self.push(Gate::with_params(
            GateKind::Crx,
            &[QubitId::new(control), QubitId::new(target)],
            &[theta],
        )?)
    }

    /// Append `cry(theta)` on `(control, target)`
    pub fn cry(&mut self, theta: f64, control: u32, target: u32) -> Result<()> {
        self.push(Gate::with_params(
            GateKind::Cry,
            &[QubitId::new(control), QubitId::new(target)],
            &[theta],
        )?)
    }

    /// Append `crz(theta)` on `(control, target)`
    pub fn crz(&mut self, theta: f64, control: u32, target: u32) -> Result<()> {
        self.push(Gate::with_params(
            GateKind::Crz,
            &[QubitId::new(control), QubitId::new(target)],
            &[theta],
        )?)
    }

    /// Append `cu1(lambda)` on `(control, target)`
    pub fn cu1(&mut self, lambda: f64, control: u32, target: u32) -> Result<()> {
        self.push(Gate::with_params(
            GateKind::Cu1,
            &[QubitId::new(control), QubitId::new(target)],
            &[lambda],
        )?)
    }

    /// Append `cu2(phi, lambda)` on `(control, target)`
    pub fn cu2(&mut self, phi: f64, lambda: f64, control: u32, target: u32) -> Result<()> {
        self.push(Gate::with_params(
            GateKind::Cu2,
            &[QubitId::new(control), QubitId::new(target)],
            &[phi, lambda],
        )?)
    }

    /// Append `cu3(theta, phi, lambda)` on `(control, target)`
    pub fn cu3(
        &mut self,
        theta: f64,
        phi: f64,
        lambda: f64,
        control: u32,
        target: u32,
    ) -> Result<()> {
        self.push(Gate::with_params(
            GateKind::Cu3,
            &[QubitId::new(control), QubitId::new(target)],
            &[theta, phi, lambda],
        )?)
    }

    /// Append a Toffoli gate on `(control1, control2, target)`
    pub fn ccx(&mut self, control1: u32, control2: u32, target: u32) -> Result<()> {
        self.push(Gate::new(
            GateKind::Ccx,
            &[
                QubitId::new(control1),
                QubitId::new(control2),
                QubitId::new(target),
            ],
        )?)
    }

    /// Append a doubly-controlled Z on `(control1, control2, target)`
    pub fn ccz(&mut self, control1: u32, control2: u32, target: u32) -> Result<()> {
        self.push(Gate::new(
            GateKind::Ccz,
            &[
                QubitId::new(control1),
                QubitId::new(control2),
                QubitId::new(target),
            ],
        )?)
    }

    /// Append a Fredkin gate on `(control, target1, target2)`
    pub fn cswap(&mut self, control: u32, target1: u32, target2: u32) -> Result<()> {
        self.push(Gate::new(
            GateKind::Cswap,
            &[
                QubitId::new(control),
                QubitId::new(target1),
                QubitId::new(target2),
            ],
        )?)
    }

    /// Append a measurement of `qubit` into `cbit`
    pub fn measure(&mut self, qubit: u32, cbit: u32) -> Result<()> {
        self.push(Gate::measure(QubitId::new(qubit), ClbitId::new(cbit)))
    }

    /// Append a barrier over the given qubits
    pub fn barrier(&mut self, qubits: &[u32]) -> Result<()> {
        let ids: Vec<QubitId> = qubits.iter().map(|&q| QubitId::new(q)).collect();
        self.push(Gate::barrier(&ids)?)
    }

    /// Append a barrier over every qubit
    pub fn barrier_all(&mut self) -> Result<()> {
        let ids: Vec<QubitId> = (0..self.num_qubits as u32).map(QubitId::new).collect();
        self.push(Gate::barrier(&ids)?)
    }
}

impl std::fmt::Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} clbits, {} gates)",
            self.num_qubits,
            self.num_clbits,
            self.len()
        )?;
        for (i, gate) in self.gates.iter().enumerate() {
            writeln!(f, "  {}: {}", i, gate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_creation() {
        let circuit = Circuit::new(3, 3).unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 3);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(Circuit::new(0, 0), Err(QuantumError::EmptyCircuit)));
    }

    #[test]
    fn test_max_qubits_enforced() {
        assert!(Circuit::new(MAX_QUBITS, 0).is_ok());
        assert!(matches!(
            Circuit::new(MAX_QUBITS + 1, 0),
            Err(QuantumError::TooManyQubits { .. })
        ));
    }

    #[test]
    fn test_push_validates_qubits() {
        let mut circuit = Circuit::new(2, 0).unwrap();
        assert!(circuit.h(0).is_ok());
        assert!(matches!(
            circuit.h(5),
            Err(QuantumError::InvalidQubit(5, 2))
        ));
    }

    #[test]
    fn test_push_validates_clbits() {
        let mut circuit = Circuit::new(2, 1).unwrap();
        assert!(circuit.measure(0, 0).is_ok());
        assert!(matches!(
            circuit.measure(1, 3),
            Err(QuantumError::InvalidClbit(3, 1))
        ));
    }

    #[test]
    fn test_condition_width_validated() {
        let mut circuit = Circuit::new(1, 1).unwrap();
        let gate = Gate::new(GateKind::X, &[QubitId::new(0)])
            .unwrap()
            .with_condition(0b11, 0b11);
        assert!(circuit.push(gate).is_err());
    }

    #[test]
    fn test_depth() {
        let mut circuit = Circuit::new(3, 0).unwrap();
        assert_eq!(circuit.depth(), 0);

        circuit.h(0).unwrap();
        circuit.h(1).unwrap();
        assert_eq!(circuit.depth(), 1);

        circuit.cx(0, 1).unwrap();
        assert_eq!(circuit.depth(), 2);

        circuit.h(2).unwrap();
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_builders() {
        let mut circuit = Circuit::new(3, 3).unwrap();
        circuit.h(0).unwrap();
        circuit.rx(std::f64::consts::PI, 1).unwrap();
        circuit.cx(0, 1).unwrap();
        circuit.ccx(0, 1, 2).unwrap();
        circuit.barrier_all().unwrap();
        circuit.measure(2, 2).unwrap();

        assert_eq!(circuit.len(), 6);
        assert!(circuit.validate().is_ok());
    }

    #[test]
    fn test_traversal_metadata() {
        let mut circuit = Circuit::new(2, 1).unwrap();
        circuit.h(0).unwrap();
        circuit.measure(0, 0).unwrap();

        let nodes: Vec<_> = circuit.traversal().collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name, "h");
        assert_eq!(nodes[1].name, "measure");
        assert_eq!(nodes[1].cbit, Some(ClbitId::new(0)));
    }

    #[test]
    fn test_display() {
        let mut circuit = Circuit::new(2, 0).unwrap();
        circuit.h(0).unwrap();
        let display = format!("{}", circuit);
        assert!(display.contains("2 qubits"));
        assert!(display.contains("h q0"));
    }
}
