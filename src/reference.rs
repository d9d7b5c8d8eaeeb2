//! Host emulation of the addition kernel.
//!
//! Runs the same per-invocation control flow as [`crate::kernel::SHADER`]
//! so the bounds behaviour can be checked for any launch shape without
//! a GPU.

/// Result of emulating one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Emulation {
    /// Output buffer contents, zero where nothing was written.
    pub output: Vec<f32>,
    /// Every index written, in invocation order.
    pub writes: Vec<usize>,
}

/// Emulate `invocations` kernel invocations over `total_elements`.
///
/// `a` and `b` must hold at least `total_elements` values; that is the
/// same contract the storage bindings carry on the GPU.
pub fn emulate_dispatch(
    a: &[f32],
    b: &[f32],
    total_elements: usize,
    chunk_size: u32,
    invocations: u64,
) -> Emulation {
    let total = total_elements as u64;
    let chunk = u64::from(chunk_size);
    let mut output = vec![0.0; total_elements];
    let mut writes = Vec::new();

    for invocation in 0..invocations {
        let start = invocation * chunk;
        if start >= total {
            // Starts only grow from here on.
            break;
        }
        for i in 0..chunk {
            let idx = start + i;
            if idx < total {
                let idx = idx as usize;
                output[idx] = a[idx] + b[idx];
                writes.push(idx);
            }
        }
    }

    Emulation { output, writes }
}
