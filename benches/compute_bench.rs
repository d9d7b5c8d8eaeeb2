//! Criterion benchmarks for one GPU vector addition versus the host
//! emulation of the same kernel.
//!
//! Run with `cargo bench`.  The GPU bench includes buffer allocation,
//! upload, submission and readback; device and pipeline creation
//! happen once up front.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;

use gpu_vector_add::{
    emulate_dispatch, ContextOptions, GpuContext, Inputs, KernelParams, VectorAdd,
    TOTAL_ELEMENTS,
};

fn vector_add_benchmark(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let cycle_a: Vec<f32> = (0..TOTAL_ELEMENTS).map(|_| rng.gen()).collect();
    let cycle_b: Vec<f32> = (0..TOTAL_ELEMENTS).map(|_| rng.gen()).collect();
    let inputs = Inputs::from_cycles(&cycle_a, &cycle_b).expect("non-empty cycles");
    let params = KernelParams::default();

    match GpuContext::new_blocking(&ContextOptions::default()) {
        Ok(context) => {
            let vector_add =
                VectorAdd::new(&context, params).expect("failed to build pipeline");
            c.bench_function("gpu vector add", |bencher| {
                bencher.iter(|| vector_add.run_blocking(&context, &inputs));
            });
        }
        Err(err) => eprintln!("gpu vector add: skipped ({err})"),
    }

    c.bench_function("host kernel emulation", |bencher| {
        bencher.iter(|| {
            emulate_dispatch(
                &inputs.a,
                &inputs.b,
                TOTAL_ELEMENTS,
                params.chunk_size,
                params.invocations(),
            )
        });
    });
}

criterion_group!(benches, vector_add_benchmark);
criterion_main!(benches);
