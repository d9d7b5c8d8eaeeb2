//! Elementwise addition of two three-element `f32` arrays on the GPU
//! using [wgpu](https://github.com/gfx-rs/wgpu).
//!
//! The whole program is one linear pass: check that a compute-capable
//! backend exists, acquire a device, compile the kernel, allocate and
//! fill the buffers, dispatch a single compute pass, copy the output to
//! a staging buffer and map it back to the host.  Natively the blocking
//! wrappers drive everything with `pollster`; in the browser the same
//! async path runs on the page's event loop.

pub mod buffer;
pub mod compute;
pub mod context;
pub mod error;
pub mod inputs;
pub mod kernel;
pub mod logging;
pub mod reference;

#[cfg(target_arch = "wasm32")]
mod web;

pub use buffer::GpuBuffer;
pub use compute::{run, VectorAdd};
#[cfg(not(target_arch = "wasm32"))]
pub use compute::run_blocking;
pub use context::{check_support, ContextOptions, GpuContext};
pub use error::{Error, Result};
pub use inputs::{fill_cycled, Inputs, TOTAL_ELEMENTS, VALUES_A, VALUES_B};
pub use kernel::KernelParams;
pub use reference::emulate_dispatch;
