//! Gate kernel throughput benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;
use qsc_state::kernels;

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

fn hadamard() -> [[Complex64; 2]; 2] {
    [
        [
            Complex64::new(INV_SQRT2, 0.0),
            Complex64::new(INV_SQRT2, 0.0),
        ],
        [
            Complex64::new(INV_SQRT2, 0.0),
            Complex64::new(-INV_SQRT2, 0.0),
        ],
    ]
}

fn make_state(num_qubits: usize) -> Vec<Complex64> {
    let mut state = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
    state[0] = Complex64::new(1.0, 0.0);
    state
}

fn bench_single_qubit(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit");
    let h = hadamard();

    for num_qubits in [10, 16, 20] {
        group.bench_with_input(
            BenchmarkId::new("scalar", num_qubits),
            &num_qubits,
            |b, &n| {
                let mut state = make_state(n);
                b.iter(|| kernels::apply_single(black_box(&mut state), &h, n / 2, false));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", num_qubits),
            &num_qubits,
            |b, &n| {
                let mut state = make_state(n);
                b.iter(|| kernels::apply_single(black_box(&mut state), &h, n / 2, true));
            },
        );
    }
    group.finish();
}

fn bench_two_qubit(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_qubit");
    let cnot = {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let mut m = [[zero; 4]; 4];
        m[0][0] = one;
        m[2][2] = one;
        m[1][3] = one;
        m[3][1] = one;
        m
    };

    for num_qubits in [10, 16, 20] {
        group.bench_with_input(
            BenchmarkId::new("matrix", num_qubits),
            &num_qubits,
            |b, &n| {
                let mut state = make_state(n);
                b.iter(|| kernels::apply_two(black_box(&mut state), &cnot, 0, n - 1, false));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("cnot_fast_path", num_qubits),
            &num_qubits,
            |b, &n| {
                let mut state = make_state(n);
                b.iter(|| kernels::apply_cnot(black_box(&mut state), 0, n - 1, false));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_single_qubit, bench_two_qubit);
criterion_main!(benches);
