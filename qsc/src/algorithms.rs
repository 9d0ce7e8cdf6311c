//! Reference circuit constructors
//!
//! Textbook building blocks used by the test suites and handy as
//! starting points: the quantum Fourier transform, its inverse, and
//! Grover search over a single marked basis state.

use qsc_core::{Circuit, QuantumError, Result};
use std::f64::consts::PI;

/// Quantum Fourier transform over `num_qubits`
pub fn qft(num_qubits: usize) -> Result<Circuit> {
    let mut circuit = Circuit::new(num_qubits, 0)?;
    for i in 0..num_qubits {
        circuit.h(i as u32)?;
        for j in (i + 1)..num_qubits {
            let angle = PI / (1u64 << (j - i)) as f64;
            circuit.cp(angle, j as u32, i as u32)?;
        }
    }
    for i in 0..num_qubits / 2 {
        circuit.swap(i as u32, (num_qubits - 1 - i) as u32)?;
    }
    Ok(circuit)
}

/// Inverse quantum Fourier transform over `num_qubits`
///
/// The exact reversal of [`qft`]: same structure, conjugated phases,
/// gates in reverse order.
pub fn inverse_qft(num_qubits: usize) -> Result<Circuit> {
    let mut circuit = Circuit::new(num_qubits, 0)?;
    for i in 0..num_qubits / 2 {
        circuit.swap(i as u32, (num_qubits - 1 - i) as u32)?;
    }
    for i in (0..num_qubits).rev() {
        for j in ((i + 1)..num_qubits).rev() {
            let angle = -PI / (1u64 << (j - i)) as f64;
            circuit.cp(angle, j as u32, i as u32)?;
        }
        circuit.h(i as u32)?;
    }
    Ok(circuit)
}

/// Grover search for one marked basis state
///
/// Prepares the uniform superposition and runs ⌊π/4·√2ⁿ⌋ iterations of
/// phase oracle plus diffusion. Supports up to three qubits, which is as
/// far as the plain Z/CZ/CCZ phase flip reaches.
pub fn grover(num_qubits: usize, marked: usize) -> Result<Circuit> {
    if num_qubits > 3 {
        return Err(QuantumError::ValidationError(
            "grover constructor supports at most 3 qubits".to_string(),
        ));
    }
    if marked >= (1 << num_qubits) {
        return Err(QuantumError::ValidationError(format!(
            "marked state {marked} out of range for {num_qubits} qubits"
        )));
    }

    let mut circuit = Circuit::new(num_qubits, 0)?;
    for q in 0..num_qubits {
        circuit.h(q as u32)?;
    }

    let iterations = ((PI / 4.0) * ((1u64 << num_qubits) as f64).sqrt()).floor() as usize;
    for _ in 0..iterations.max(1) {
        oracle(&mut circuit, num_qubits, marked)?;
        diffusion(&mut circuit, num_qubits)?;
    }
    Ok(circuit)
}

/// Phase-flip the marked basis state
fn oracle(circuit: &mut Circuit, num_qubits: usize, marked: usize) -> Result<()> {
    for q in 0..num_qubits {
        if marked & (1 << q) == 0 {
            circuit.x(q as u32)?;
        }
    }
    phase_flip_all_ones(circuit, num_qubits)?;
    for q in 0..num_qubits {
        if marked & (1 << q) == 0 {
            circuit.x(q as u32)?;
        }
    }
    Ok(())
}

/// Inversion about the mean
fn diffusion(circuit: &mut Circuit, num_qubits: usize) -> Result<()> {
    for q in 0..num_qubits {
        circuit.h(q as u32)?;
    }
    for q in 0..num_qubits {
        circuit.x(q as u32)?;
    }
    phase_flip_all_ones(circuit, num_qubits)?;
    for q in 0..num_qubits {
        circuit.x(q as u32)?;
    }
    for q in 0..num_qubits {
        circuit.h(q as u32)?;
    }
    Ok(())
}

/// −1 phase on |1…1⟩
fn phase_flip_all_ones(circuit: &mut Circuit, num_qubits: usize) -> Result<()> {
    match num_qubits {
        1 => circuit.z(0),
        2 => circuit.cz(0, 1),
        3 => circuit.ccz(0, 1, 2),
        _ => unreachable!("qubit count validated by the constructor"),
    }
}
