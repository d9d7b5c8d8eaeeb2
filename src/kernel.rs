//! The WGSL addition kernel and its launch parameters.
//!
//! Each invocation owns a chunk of `CHUNK_SIZE` consecutive elements
//! starting at `global_id.x * CHUNK_SIZE` and writes only the indices
//! below `TOTAL_ELEMENTS`.  Both values are pipeline-overridable
//! constants supplied when the pipeline is created, so the shader text
//! itself is never edited.

use crate::error::{Error, Result};
use crate::inputs::TOTAL_ELEMENTS;

/// Invocations per workgroup, fixed by `@workgroup_size` in [`SHADER`].
pub const WORKGROUP_SIZE: u32 = 64;

/// Elements handled by a single invocation.
pub const DEFAULT_CHUNK_SIZE: u32 = 10;

/// Workgroups dispatched per run.  Far more than the three elements
/// need; every surplus invocation exits through the bounds check.
pub const DEFAULT_WORKGROUPS: u32 = 1000;

pub const ENTRY_POINT: &str = "main";

pub const CHUNK_SIZE_CONSTANT: &str = "CHUNK_SIZE";
pub const TOTAL_ELEMENTS_CONSTANT: &str = "TOTAL_ELEMENTS";

pub const SHADER: &str = r#"
override CHUNK_SIZE: u32 = 10u;
override TOTAL_ELEMENTS: u32 = 3u;

@group(0) @binding(0)
var<storage, read> a: array<f32>;
@group(0) @binding(1)
var<storage, read> b: array<f32>;
@group(0) @binding(2)
var<storage, read_write> out: array<f32>;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {
    let start = global_id.x * CHUNK_SIZE;
    if (start >= TOTAL_ELEMENTS) {
        return;
    }
    for (var i: u32 = 0u; i < CHUNK_SIZE; i++) {
        let idx = start + i;
        if (idx < TOTAL_ELEMENTS) {
            out[idx] = a[idx] + b[idx];
        }
    }
}
"#;

/// Launch-time parameters of the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelParams {
    pub chunk_size: u32,
    pub workgroups: u32,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            workgroups: DEFAULT_WORKGROUPS,
        }
    }
}

impl KernelParams {
    /// Total invocations launched by one dispatch.
    pub fn invocations(&self) -> u64 {
        u64::from(self.workgroups) * u64::from(WORKGROUP_SIZE)
    }

    /// Reject parameters the device cannot run or that would overflow
    /// the shader's `u32` start index.
    pub fn validate(&self, limits: &wgpu::Limits) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidParams("chunk size must be non-zero".into()));
        }
        if self.workgroups == 0 {
            return Err(Error::InvalidParams(
                "workgroup count must be non-zero".into(),
            ));
        }
        if self.workgroups > limits.max_compute_workgroups_per_dimension {
            return Err(Error::InvalidParams(format!(
                "{} workgroups exceeds the device limit of {}",
                self.workgroups, limits.max_compute_workgroups_per_dimension
            )));
        }
        let last_start = (self.invocations() - 1) * u64::from(self.chunk_size);
        if last_start + u64::from(self.chunk_size) > u64::from(u32::MAX) {
            return Err(Error::InvalidParams(format!(
                "{} invocations with chunk size {} overflow a u32 index",
                self.invocations(),
                self.chunk_size
            )));
        }
        Ok(())
    }

    /// Values for the shader's `override` declarations.
    pub fn override_constants(&self) -> [(&'static str, f64); 2] {
        [
            (CHUNK_SIZE_CONSTANT, f64::from(self.chunk_size)),
            (TOTAL_ELEMENTS_CONSTANT, TOTAL_ELEMENTS as f64),
        ]
    }
}
