//! Gate application kernels
//!
//! In-place amplitude transforms, O(2ⁿ) per gate. Every kernel partitions
//! the state into groups of amplitudes that differ only in the target
//! qubit bits and applies the gate matrix to each group.
//!
//! The matrix sub-index convention matches `qsc-gates`: for a qubit list
//! `[a, b, …]` the first qubit is the least-significant bit of the
//! sub-index. Kernels accept the list in gate order and handle arbitrary
//! bit positions.
//!
//! With `parallel` set, groups are processed with rayon over cache-sized
//! chunks; kernels always complete before returning.

use num_complex::Complex64;
use rayon::prelude::*;

/// Apply a 2×2 matrix to `qubit`
pub fn apply_single(
    state: &mut [Complex64],
    matrix: &[[Complex64; 2]; 2],
    qubit: usize,
    parallel: bool,
) {
    let stride = 1usize << (qubit + 1);
    if parallel && state.len() > stride {
        state
            .par_chunks_mut(stride)
            .for_each(|chunk| single_in_chunk(chunk, matrix, qubit));
    } else {
        for chunk in state.chunks_exact_mut(stride) {
            single_in_chunk(chunk, matrix, qubit);
        }
    }
}

#[inline]
fn single_in_chunk(chunk: &mut [Complex64], matrix: &[[Complex64; 2]; 2], qubit: usize) {
    let half = 1usize << qubit;
    let m00 = matrix[0][0];
    let m01 = matrix[0][1];
    let m10 = matrix[1][0];
    let m11 = matrix[1][1];

    for j in 0..half {
        let a0 = chunk[j];
        let a1 = chunk[j + half];
        chunk[j] = m00 * a0 + m01 * a1;
        chunk[j + half] = m10 * a0 + m11 * a1;
    }
}

/// Apply a diagonal 2×2 matrix to `qubit`
///
/// Faster path for Z, S, T, RZ, and phase gates: two scalar multiplies per
/// amplitude, no cross terms.
pub fn apply_diagonal(
    state: &mut [Complex64],
    diagonal: [Complex64; 2],
    qubit: usize,
    parallel: bool,
) {
    let stride = 1usize << (qubit + 1);
    let half = 1usize << qubit;
    let apply = move |chunk: &mut [Complex64]| {
        for j in 0..half {
            chunk[j] *= diagonal[0];
            chunk[j + half] *= diagonal[1];
        }
    };
    if parallel && state.len() > stride {
        state.par_chunks_mut(stride).for_each(apply);
    } else {
        for chunk in state.chunks_exact_mut(stride) {
            apply(chunk);
        }
    }
}

/// Apply a 4×4 matrix to the qubit pair `[a, b]` (gate order)
pub fn apply_two(
    state: &mut [Complex64],
    matrix: &[[Complex64; 4]; 4],
    a: usize,
    b: usize,
    parallel: bool,
) {
    debug_assert_ne!(a, b);
    let hi = a.max(b);
    let stride = 1usize << (hi + 1);
    if parallel && state.len() > stride {
        state
            .par_chunks_mut(stride)
            .for_each(|chunk| two_in_chunk(chunk, matrix, a, b));
    } else {
        for chunk in state.chunks_exact_mut(stride) {
            two_in_chunk(chunk, matrix, a, b);
        }
    }
}

#[inline]
fn two_in_chunk(chunk: &mut [Complex64], matrix: &[[Complex64; 4]; 4], a: usize, b: usize) {
    let lo = a.min(b);
    let ma = 1usize << a;
    let mb = 1usize << b;
    let groups = chunk.len() >> 2;

    for g in 0..groups {
        // Insert a zero bit at `lo`; the high bit position is clear because
        // the chunk spans exactly 2^(hi+1) amplitudes.
        let base = ((g >> lo) << (lo + 1)) | (g & (ma.min(mb) - 1));

        let i0 = base;
        let i1 = base | ma;
        let i2 = base | mb;
        let i3 = base | ma | mb;

        let v0 = chunk[i0];
        let v1 = chunk[i1];
        let v2 = chunk[i2];
        let v3 = chunk[i3];

        chunk[i0] = matrix[0][0] * v0 + matrix[0][1] * v1 + matrix[0][2] * v2 + matrix[0][3] * v3;
        chunk[i1] = matrix[1][0] * v0 + matrix[1][1] * v1 + matrix[1][2] * v2 + matrix[1][3] * v3;
        chunk[i2] = matrix[2][0] * v0 + matrix[2][1] * v1 + matrix[2][2] * v2 + matrix[2][3] * v3;
        chunk[i3] = matrix[3][0] * v0 + matrix[3][1] * v1 + matrix[3][2] * v2 + matrix[3][3] * v3;
    }
}

/// Apply an 8×8 matrix to the qubit triple `[a, b, c]` (gate order)
pub fn apply_three(
    state: &mut [Complex64],
    matrix: &[[Complex64; 8]; 8],
    a: usize,
    b: usize,
    c: usize,
    parallel: bool,
) {
    let hi = a.max(b).max(c);
    let stride = 1usize << (hi + 1);
    if parallel && state.len() > stride {
        state
            .par_chunks_mut(stride)
            .for_each(|chunk| three_in_chunk(chunk, matrix, a, b, c));
    } else {
        for chunk in state.chunks_exact_mut(stride) {
            three_in_chunk(chunk, matrix, a, b, c);
        }
    }
}

#[inline]
fn three_in_chunk(
    chunk: &mut [Complex64],
    matrix: &[[Complex64; 8]; 8],
    a: usize,
    b: usize,
    c: usize,
) {
    let mut sorted = [a, b, c];
    sorted.sort_unstable();
    let [p0, p1, _] = sorted;

    let masks = [1usize << a, 1usize << b, 1usize << c];
    let groups = chunk.len() >> 3;
    let mut amps = [Complex64::new(0.0, 0.0); 8];

    for g in 0..groups {
        let t = ((g >> p0) << (p0 + 1)) | (g & ((1 << p0) - 1));
        let base = ((t >> p1) << (p1 + 1)) | (t & ((1 << p1) - 1));

        for (s, amp) in amps.iter_mut().enumerate() {
            *amp = chunk[base | sub_offset(s, &masks)];
        }
        for s in 0..8 {
            let mut acc = Complex64::new(0.0, 0.0);
            for (j, amp) in amps.iter().enumerate() {
                acc += matrix[s][j] * amp;
            }
            chunk[base | sub_offset(s, &masks)] = acc;
        }
    }
}

/// Apply an arbitrary 2^k × 2^k row-major matrix to `qubits` (gate order)
///
/// Unitarity of the matrix is the caller's responsibility; custom gates
/// are validated when they enter a circuit.
pub fn apply_custom(
    state: &mut [Complex64],
    matrix: &[Complex64],
    qubits: &[usize],
    parallel: bool,
) {
    let k = qubits.len();
    debug_assert_eq!(matrix.len(), 1 << (2 * k));
    let hi = *qubits.iter().max().expect("non-empty qubit list");
    let stride = 1usize << (hi + 1);
    if parallel && state.len() > stride {
        state
            .par_chunks_mut(stride)
            .for_each(|chunk| custom_in_chunk(chunk, matrix, qubits));
    } else {
        for chunk in state.chunks_exact_mut(stride) {
            custom_in_chunk(chunk, matrix, qubits);
        }
    }
}

fn custom_in_chunk(chunk: &mut [Complex64], matrix: &[Complex64], qubits: &[usize]) {
    let k = qubits.len();
    let dk = 1usize << k;
    let mut sorted: Vec<usize> = qubits.to_vec();
    sorted.sort_unstable();

    let groups = chunk.len() >> k;
    let mut amps = vec![Complex64::new(0.0, 0.0); dk];

    for g in 0..groups {
        let mut base = g;
        for &pos in &sorted[..k - 1] {
            base = ((base >> pos) << (pos + 1)) | (base & ((1 << pos) - 1));
        }
        // The largest position is clear by construction of the chunk size;
        // inserting at it would be the identity.

        for (s, amp) in amps.iter_mut().enumerate() {
            let mut index = base;
            for (j, &q) in qubits.iter().enumerate() {
                index |= ((s >> j) & 1) << q;
            }
            *amp = chunk[index];
        }
        for s in 0..dk {
            let mut acc = Complex64::new(0.0, 0.0);
            for (j, amp) in amps.iter().enumerate() {
                acc += matrix[s * dk + j] * amp;
            }
            let mut index = base;
            for (j, &q) in qubits.iter().enumerate() {
                index |= ((s >> j) & 1) << q;
            }
            chunk[index] = acc;
        }
    }
}

/// CNOT fast path: swap target components where the control bit is set
pub fn apply_cnot(state: &mut [Complex64], control: usize, target: usize, parallel: bool) {
    let hi = control.max(target);
    let stride = 1usize << (hi + 1);
    let cm = 1usize << control;
    let tm = 1usize << target;
    let apply = move |chunk: &mut [Complex64]| {
        for i in 0..chunk.len() {
            if i & cm != 0 && i & tm == 0 {
                chunk.swap(i, i | tm);
            }
        }
    };
    if parallel && state.len() > stride {
        state.par_chunks_mut(stride).for_each(apply);
    } else {
        for chunk in state.chunks_exact_mut(stride) {
            apply(chunk);
        }
    }
}

/// CZ fast path: negate amplitudes where both bits are set
pub fn apply_cz(state: &mut [Complex64], a: usize, b: usize, parallel: bool) {
    let mask = (1usize << a) | (1usize << b);
    if parallel {
        state.par_iter_mut().enumerate().for_each(|(i, amp)| {
            if i & mask == mask {
                *amp = -*amp;
            }
        });
    } else {
        for (i, amp) in state.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }
}

#[inline]
fn sub_offset(s: usize, masks: &[usize; 3]) -> usize {
    let mut offset = 0;
    if s & 1 != 0 {
        offset |= masks[0];
    }
    if s & 2 != 0 {
        offset |= masks[1];
    }
    if s & 4 != 0 {
        offset |= masks[2];
    }
    offset
}
