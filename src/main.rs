//! Adds `[1, 2, 3]` and `[2, 3, 4]` on the GPU and prints the sum.
//!
//! Set `RUST_LOG=debug` to trace each pipeline stage.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use gpu_vector_add::logging::{init_logging, LoggingConfig};
    use gpu_vector_add::{
        emulate_dispatch, ContextOptions, GpuContext, Inputs, KernelParams, VectorAdd,
        TOTAL_ELEMENTS,
    };

    init_logging(LoggingConfig::default());

    let inputs = Inputs::default();
    let params = KernelParams::default();

    let context = GpuContext::new_blocking(&ContextOptions::default())?;
    let vector_add = VectorAdd::new(&context, params).context("failed to build pipeline")?;
    let result = vector_add
        .run_blocking(&context, &inputs)
        .context("vector addition failed")?;

    let launched = vector_add.params();
    let expected = emulate_dispatch(
        &inputs.a,
        &inputs.b,
        TOTAL_ELEMENTS,
        launched.chunk_size,
        launched.invocations(),
    );
    if expected.output != result {
        log::warn!(
            "GPU result {result:?} differs from host emulation {:?}",
            expected.output
        );
    }

    if result != inputs.expected_sum() {
        log::warn!("GPU result {result:?} is not the elementwise sum of the inputs");
    }

    println!("{result:?}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
