//! Benchmarks for swap-test simulation
//!
//! Run with: cargo bench -p qknn-adapter-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qknn_adapter_sim::SimulatorBackend;
use qknn_hal::Backend;
use qknn_ir::Circuit;

/// Swap test between two uniform `n`-qubit states.
fn swap_test(n: u32) -> Circuit {
    let dim = 1usize << n;
    let amp = vec![(dim as f64).sqrt().recip(); dim];

    let mut circuit = Circuit::new("swap_test");
    let control = circuit.add_qreg("control", 1);
    let a = circuit.add_qreg("a", n);
    let b = circuit.add_qreg("b", n);
    let c = circuit.add_creg("meas", 1);
    circuit.initialize_real(&amp, a.clone()).unwrap();
    circuit.initialize_real(&amp, b.clone()).unwrap();
    circuit.h(control[0]).unwrap();
    for (qa, qb) in a.iter().zip(&b) {
        circuit.cswap(control[0], *qa, *qb).unwrap();
    }
    circuit.h(control[0]).unwrap();
    circuit.measure(control[0], c[0]).unwrap();
    circuit
}

fn bench_swap_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap_test");

    for n in &[1u32, 2, 4, 6] {
        let circuit = swap_test(*n);
        group.bench_with_input(BenchmarkId::new("qasm", n), &circuit, |b, circuit| {
            let backend = SimulatorBackend::qasm().with_seed(1);
            b.iter(|| black_box(backend.run(circuit, 1000).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("statevector", n), &circuit, |b, circuit| {
            let backend = SimulatorBackend::statevector();
            b.iter(|| black_box(backend.run(circuit, 1000).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_swap_test);
criterion_main!(benches);
