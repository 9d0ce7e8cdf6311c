//! Small dense linear algebra for state inspection
//!
//! Partial trace to a two-qubit reduced density matrix and a complex
//! Jacobi eigensolver for Hermitian 4×4 matrices, enough to evaluate the
//! Wootters concurrence without pulling in a linear-algebra crate.

use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Off-diagonal tolerance for Jacobi convergence
const JACOBI_TOLERANCE: f64 = 1e-12;

/// Jacobi sweep cap; 4×4 Hermitian matrices converge in a handful
const JACOBI_MAX_SWEEPS: usize = 64;

/// Reduced density matrix of qubits (q1, q2), row-major 4×4
///
/// Sub-index convention matches the kernels: bit 0 of the reduced index
/// is q1, bit 1 is q2. Traces out every other qubit of the pure state.
pub fn reduced_density_two(amplitudes: &[Complex64], q1: usize, q2: usize) -> [Complex64; 16] {
    let m1 = 1usize << q1;
    let m2 = 1usize << q2;

    let sub_of = |i: usize| ((i & m1 != 0) as usize) | ((((i & m2) != 0) as usize) << 1);
    let clear = |i: usize| i & !m1 & !m2;

    let mut rho = [ZERO; 16];
    for (i, &ai) in amplitudes.iter().enumerate() {
        if ai == ZERO {
            continue;
        }
        let si = sub_of(i);
        let rest = clear(i);
        // Only indices sharing the residual bits contribute coherences.
        for sj in 0..4 {
            let j = rest | (sj & 1) * m1 | ((sj >> 1) & 1) * m2;
            let aj = amplitudes[j];
            rho[si * 4 + sj] += ai * aj.conj();
        }
    }
    rho
}

/// Eigenvalues of a Hermitian 4×4 matrix, descending
///
/// Classic cyclic Jacobi with complex rotations: each sweep annihilates
/// every off-diagonal pair (p, q) with a unitary plane rotation chosen
/// from θ = ½·atan2(2|a_pq|, a_pp − a_qq) and the phase of a_pq.
pub fn hermitian_eigenvalues_4(matrix: &[Complex64; 16]) -> [f64; 4] {
    let mut a = *matrix;

    for _ in 0..JACOBI_MAX_SWEEPS {
        let mut off_diagonal = 0.0;
        for p in 0..4 {
            for q in (p + 1)..4 {
                off_diagonal += a[p * 4 + q].norm_sqr();
            }
        }
        if off_diagonal < JACOBI_TOLERANCE * JACOBI_TOLERANCE {
            break;
        }

        for p in 0..4 {
            for q in (p + 1)..4 {
                let apq = a[p * 4 + q];
                if apq.norm() < JACOBI_TOLERANCE {
                    continue;
                }

                let app = a[p * 4 + p].re;
                let aqq = a[q * 4 + q].re;
                let theta = 0.5 * (2.0 * apq.norm()).atan2(app - aqq);
                let (sin, cos) = theta.sin_cos();
                let phase = apq / apq.norm(); // e^{iφ}

                // Columns: col_p ← c·col_p + s·e^{-iφ}·col_q
                //          col_q ← -s·e^{iφ}·col_p + c·col_q
                for i in 0..4 {
                    let aip = a[i * 4 + p];
                    let aiq = a[i * 4 + q];
                    a[i * 4 + p] = cos * aip + sin * phase.conj() * aiq;
                    a[i * 4 + q] = -sin * phase * aip + cos * aiq;
                }
                // Rows: row_p ← c·row_p + s·e^{iφ}·row_q
                //       row_q ← -s·e^{-iφ}·row_p + c·row_q
                for j in 0..4 {
                    let apj = a[p * 4 + j];
                    let aqj = a[q * 4 + j];
                    a[p * 4 + j] = cos * apj + sin * phase * aqj;
                    a[q * 4 + j] = -sin * phase.conj() * apj + cos * aqj;
                }
            }
        }
    }

    let mut eigenvalues = [
        a[0].re,
        a[5].re,
        a[10].re,
        a[15].re,
    ];
    eigenvalues.sort_by(|x, y| y.partial_cmp(x).expect("finite eigenvalues"));
    eigenvalues
}

/// Hermitian square root via Jacobi with accumulated eigenvectors
fn hermitian_sqrt_4(matrix: &[Complex64; 16]) -> [Complex64; 16] {
    let mut a = *matrix;
    let mut v = [ZERO; 16];
    for i in 0..4 {
        v[i * 4 + i] = Complex64::new(1.0, 0.0);
    }

    for _ in 0..JACOBI_MAX_SWEEPS {
        let mut off_diagonal = 0.0;
        for p in 0..4 {
            for q in (p + 1)..4 {
                off_diagonal += a[p * 4 + q].norm_sqr();
            }
        }
        if off_diagonal < JACOBI_TOLERANCE * JACOBI_TOLERANCE {
            break;
        }

        for p in 0..4 {
            for q in (p + 1)..4 {
                let apq = a[p * 4 + q];
                if apq.norm() < JACOBI_TOLERANCE {
                    continue;
                }

                let app = a[p * 4 + p].re;
                let aqq = a[q * 4 + q].re;
                let theta = 0.5 * (2.0 * apq.norm()).atan2(app - aqq);
                let (sin, cos) = theta.sin_cos();
                let phase = apq / apq.norm();

                for i in 0..4 {
                    let aip = a[i * 4 + p];
                    let aiq = a[i * 4 + q];
                    a[i * 4 + p] = cos * aip + sin * phase.conj() * aiq;
                    a[i * 4 + q] = -sin * phase * aip + cos * aiq;

                    let vip = v[i * 4 + p];
                    let viq = v[i * 4 + q];
                    v[i * 4 + p] = cos * vip + sin * phase.conj() * viq;
                    v[i * 4 + q] = -sin * phase * vip + cos * viq;
                }
                for j in 0..4 {
                    let apj = a[p * 4 + j];
                    let aqj = a[q * 4 + j];
                    a[p * 4 + j] = cos * apj + sin * phase * aqj;
                    a[q * 4 + j] = -sin * phase.conj() * apj + cos * aqj;
                }
            }
        }
    }

    // √A = V · diag(√λ) · V†; clamp tiny negatives from roundoff.
    let roots: Vec<f64> = (0..4).map(|i| a[i * 4 + i].re.max(0.0).sqrt()).collect();
    let mut sqrt = [ZERO; 16];
    for i in 0..4 {
        for j in 0..4 {
            let mut acc = ZERO;
            for k in 0..4 {
                acc += v[i * 4 + k] * roots[k] * v[j * 4 + k].conj();
            }
            sqrt[i * 4 + j] = acc;
        }
    }
    sqrt
}

fn matmul_4(a: &[Complex64; 16], b: &[Complex64; 16]) -> [Complex64; 16] {
    let mut out = [ZERO; 16];
    for i in 0..4 {
        for k in 0..4 {
            let aik = a[i * 4 + k];
            if aik == ZERO {
                continue;
            }
            for j in 0..4 {
                out[i * 4 + j] += aik * b[k * 4 + j];
            }
        }
    }
    out
}

/// Wootters concurrence of a two-qubit density matrix
///
/// C(ρ) = max(0, λ₁ − λ₂ − λ₃ − λ₄), where the λᵢ are the decreasing
/// square roots of the eigenvalues of ρ·ρ̃ and ρ̃ = (σy⊗σy)ρ*(σy⊗σy).
/// The eigenvalues are taken from the Hermitian similar matrix
/// √ρ·ρ̃·√ρ.
pub fn concurrence(rho: &[Complex64; 16]) -> f64 {
    // ρ̃ = (σy⊗σy) ρ* (σy⊗σy)
    let y = [
        [ZERO, Complex64::new(0.0, -1.0)],
        [Complex64::new(0.0, 1.0), ZERO],
    ];
    let mut yy = [ZERO; 16];
    for s in 0..4 {
        for t in 0..4 {
            yy[s * 4 + t] = y[(s >> 1) & 1][(t >> 1) & 1] * y[s & 1][t & 1];
        }
    }

    let mut rho_conj = [ZERO; 16];
    for (dst, src) in rho_conj.iter_mut().zip(rho.iter()) {
        *dst = src.conj();
    }
    let rho_tilde = matmul_4(&yy, &matmul_4(&rho_conj, &yy));

    // Eigenvalues of ρρ̃ equal those of the Hermitian √ρ ρ̃ √ρ.
    let sqrt_rho = hermitian_sqrt_4(rho);
    let m = matmul_4(&sqrt_rho, &matmul_4(&rho_tilde, &sqrt_rho));

    let eigenvalues = hermitian_eigenvalues_4(&m);
    let lambdas: Vec<f64> = eigenvalues.iter().map(|&e| e.max(0.0).sqrt()).collect();

    (lambdas[0] - lambdas[1] - lambdas[2] - lambdas[3]).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ONE: Complex64 = Complex64::new(1.0, 0.0);
    const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

    fn pure_density(state: &[Complex64; 4]) -> [Complex64; 16] {
        let mut rho = [ZERO; 16];
        for i in 0..4 {
            for j in 0..4 {
                rho[i * 4 + j] = state[i] * state[j].conj();
            }
        }
        rho
    }

    #[test]
    fn test_eigenvalues_of_diagonal() {
        let mut m = [ZERO; 16];
        m[0] = Complex64::new(0.1, 0.0);
        m[5] = Complex64::new(0.4, 0.0);
        m[10] = Complex64::new(0.3, 0.0);
        m[15] = Complex64::new(0.2, 0.0);

        let eig = hermitian_eigenvalues_4(&m);
        assert_relative_eq!(eig[0], 0.4, epsilon = 1e-10);
        assert_relative_eq!(eig[3], 0.1, epsilon = 1e-10);
    }

    #[test]
    fn test_eigenvalues_with_off_diagonal() {
        // [[1, i], [-i, 1]] ⊕ 0 ⊕ 0 has eigenvalues 2 and 0
        let mut m = [ZERO; 16];
        m[0] = ONE;
        m[5] = ONE;
        m[1] = Complex64::new(0.0, 1.0);
        m[4] = Complex64::new(0.0, -1.0);

        let eig = hermitian_eigenvalues_4(&m);
        assert_relative_eq!(eig[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(eig[1], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_sqrt_of_projector() {
        // A rank-1 projector is its own square root.
        let state = [
            Complex64::new(INV_SQRT2, 0.0),
            ZERO,
            ZERO,
            Complex64::new(INV_SQRT2, 0.0),
        ];
        let rho = pure_density(&state);
        let sqrt = hermitian_sqrt_4(&rho);
        let squared = matmul_4(&sqrt, &sqrt);
        for (a, b) in squared.iter().zip(rho.iter()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-9);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_concurrence_bell_state() {
        let state = [
            Complex64::new(INV_SQRT2, 0.0),
            ZERO,
            ZERO,
            Complex64::new(INV_SQRT2, 0.0),
        ];
        let c = concurrence(&pure_density(&state));
        assert_relative_eq!(c, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_concurrence_product_state() {
        // |+⟩⊗|0⟩ is unentangled.
        let state = [
            Complex64::new(INV_SQRT2, 0.0),
            Complex64::new(INV_SQRT2, 0.0),
            ZERO,
            ZERO,
        ];
        let c = concurrence(&pure_density(&state));
        assert_relative_eq!(c, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_concurrence_partial_entanglement() {
        // cos(π/8)|00⟩ + sin(π/8)|11⟩ has C = sin(π/4)
        let angle = std::f64::consts::FRAC_PI_8;
        let state = [
            Complex64::new(angle.cos(), 0.0),
            ZERO,
            ZERO,
            Complex64::new(angle.sin(), 0.0),
        ];
        let c = concurrence(&pure_density(&state));
        assert_relative_eq!(c, (2.0 * angle).sin(), epsilon = 1e-6);
    }

    #[test]
    fn test_reduced_density_of_bell() {
        // Bell pair amplitudes over 2 qubits; tracing nothing out.
        let amplitudes = [
            Complex64::new(INV_SQRT2, 0.0),
            ZERO,
            ZERO,
            Complex64::new(INV_SQRT2, 0.0),
        ];
        let rho = reduced_density_two(&amplitudes, 0, 1);
        assert_relative_eq!(rho[0].re, 0.5, epsilon = 1e-12);
        assert_relative_eq!(rho[15].re, 0.5, epsilon = 1e-12);
        assert_relative_eq!(rho[3].re, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_reduced_density_traces_out_ghz_third_qubit() {
        // GHZ-3 reduced to two qubits is the separable mixture
        // (|00⟩⟨00| + |11⟩⟨11|)/2 with zero concurrence.
        let mut amplitudes = [ZERO; 8];
        amplitudes[0] = Complex64::new(INV_SQRT2, 0.0);
        amplitudes[7] = Complex64::new(INV_SQRT2, 0.0);

        let rho = reduced_density_two(&amplitudes, 0, 1);
        assert_relative_eq!(rho[0].re, 0.5, epsilon = 1e-12);
        assert_relative_eq!(rho[15].re, 0.5, epsilon = 1e-12);
        // No coherence between |00⟩ and |11⟩ once q2 is traced out.
        assert_relative_eq!(rho[3].norm(), 0.0, epsilon = 1e-12);

        assert_relative_eq!(concurrence(&rho), 0.0, epsilon = 1e-6);
    }
}
