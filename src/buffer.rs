//! Typed GPU buffers and host readback.
//!
//! [`GpuBuffer`] wraps a [`wgpu::Buffer`] together with the number of
//! typed elements it holds.  The three constructors fix the usage flags
//! for the three roles a buffer plays in the pipeline: read-only input,
//! kernel output, and host-mappable staging.

use std::marker::PhantomData;

use bytemuck::{cast_slice, Pod};
use futures::channel::oneshot;
use wgpu::{Buffer, BufferDescriptor, BufferUsages};

use crate::context::GpuContext;
use crate::error::{Error, Result};

/// A typed GPU buffer.
///
/// The underlying size in bytes is `len * size_of::<T>()`.
pub struct GpuBuffer<T: Pod> {
    pub buffer: Buffer,
    pub len: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> GpuBuffer<T> {
    /// Create a read-only input buffer (`STORAGE | COPY_DST`) and upload
    /// `data` through the queue.
    pub fn from_slice(context: &GpuContext, label: &str, data: &[T]) -> Self {
        let bytes = cast_slice(data);
        let buffer = context.device.create_buffer(&BufferDescriptor {
            label: Some(label),
            size: bytes.len() as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // The write is ordered before any later submission on this queue.
        context.queue.write_buffer(&buffer, 0, bytes);
        Self::wrap(buffer, data.len())
    }

    /// Create the kernel output buffer (`STORAGE | COPY_SRC`).
    pub fn new_output(context: &GpuContext, label: &str, len: usize) -> Self {
        let usage = BufferUsages::STORAGE | BufferUsages::COPY_SRC;
        Self::empty(context, label, len, usage)
    }

    /// Create a staging buffer the host can map for reading
    /// (`MAP_READ | COPY_DST`).  It cannot be bound to a shader.
    pub fn new_staging(context: &GpuContext, label: &str, len: usize) -> Self {
        let usage = BufferUsages::MAP_READ | BufferUsages::COPY_DST;
        Self::empty(context, label, len, usage)
    }

    pub fn byte_len(&self) -> u64 {
        (self.len * std::mem::size_of::<T>()) as u64
    }

    fn empty(context: &GpuContext, label: &str, len: usize, usage: BufferUsages) -> Self {
        let buffer = context.device.create_buffer(&BufferDescriptor {
            label: Some(label),
            size: (len * std::mem::size_of::<T>()) as u64,
            usage,
            mapped_at_creation: false,
        });
        Self::wrap(buffer, len)
    }

    fn wrap(buffer: Buffer, len: usize) -> Self {
        Self {
            buffer,
            len,
            _marker: PhantomData,
        }
    }

    /// Map the buffer for reading, copy its contents out and unmap it.
    ///
    /// The buffer must carry `MAP_READ` and all work writing to it must
    /// already be submitted.  Natively the device is polled until the
    /// map completes; in the browser the event loop drives the callback.
    pub async fn read_async(&self, context: &GpuContext) -> Result<Vec<T>> {
        let slice = self.buffer.slice(..);
        let (sender, receiver) = oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            // The receiver only disappears if the caller was dropped.
            let _ = sender.send(result);
        });

        #[cfg(not(target_arch = "wasm32"))]
        context.device.poll(wgpu::PollType::Wait)?;
        #[cfg(target_arch = "wasm32")]
        let _ = context;

        receiver.await.map_err(|_| Error::MapCallbackDropped)??;
        log::debug!("staging buffer mapped ({} bytes)", self.byte_len());

        let mapping = Mapping(&self.buffer);
        let view = slice.get_mapped_range();
        let values = cast_slice::<u8, T>(&view).to_vec();
        drop(view);
        drop(mapping);
        Ok(values)
    }

    /// Blocking wrapper around [`Self::read_async`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_blocking(&self, context: &GpuContext) -> Result<Vec<T>> {
        pollster::block_on(self.read_async(context))
    }
}

/// A successful mapping of a buffer.  Dropping it unmaps the buffer, so
/// every exit path after a completed map releases it exactly once.
struct Mapping<'a>(&'a Buffer);

impl Drop for Mapping<'_> {
    fn drop(&mut self) {
        self.0.unmap();
        log::debug!("staging buffer unmapped");
    }
}
