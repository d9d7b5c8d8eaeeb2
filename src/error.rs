//! Error type shared by every stage of the pipeline.
//!
//! Only the two initialization failures are expected in practice; the
//! remaining variants cover invalid launch parameters and the readback
//! round trip.

/// Errors surfaced while setting up or running the vector addition.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("WebGPU not supported.")]
    NotSupported,

    #[error("Couldn't request WebGPU adapter.")]
    NoAdapter,

    #[error("failed to request GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("invalid kernel parameters: {0}")]
    InvalidParams(String),

    #[error("value cycle must contain at least one element")]
    EmptyCycle,

    #[error("staging buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("staging buffer map callback was dropped before completing")]
    MapCallbackDropped,

    #[error("device polling failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("read back {actual} elements, expected {expected}")]
    ReadbackLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
