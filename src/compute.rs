//! Pipeline binding, dispatch and submission.
//!
//! [`VectorAdd`] compiles the kernel once and owns the bind group
//! layout and compute pipeline.  Each call to [`VectorAdd::run_async`]
//! allocates the four buffers, encodes a single compute pass followed
//! by a copy into the staging buffer, submits both as one batch and
//! reads the result back.

use wgpu::{ShaderModuleDescriptor, ShaderSource};

use crate::buffer::GpuBuffer;
use crate::context::{ContextOptions, GpuContext};
use crate::error::{Error, Result};
use crate::inputs::{Inputs, TOTAL_ELEMENTS};
use crate::kernel::{KernelParams, ENTRY_POINT, SHADER};

/// Binding slot of input `a`.
pub const BINDING_A: u32 = 0;
/// Binding slot of input `b`.
pub const BINDING_B: u32 = 1;
/// Binding slot of the output array.
pub const BINDING_OUT: u32 = 2;

/// A compiled vector addition pipeline.
pub struct VectorAdd {
    params: KernelParams,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::ComputePipeline,
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<f32>() as u64),
        },
        count: None,
    }
}

impl VectorAdd {
    /// Validate `params` against the device and compile the pipeline.
    pub fn new(context: &GpuContext, params: KernelParams) -> Result<Self> {
        params.validate(&context.device.limits())?;

        let module = context.device.create_shader_module(ShaderModuleDescriptor {
            label: Some("vector_add_shader"),
            source: ShaderSource::Wgsl(SHADER.into()),
        });

        let bind_group_layout =
            context
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("vector_add_bind_group_layout"),
                    entries: &[
                        storage_entry(BINDING_A, true),
                        storage_entry(BINDING_B, true),
                        storage_entry(BINDING_OUT, false),
                    ],
                });

        let pipeline_layout =
            context
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("vector_add_pipeline_layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    push_constant_ranges: &[],
                });

        let constants = params.override_constants();
        let pipeline = context
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("vector_add_pipeline"),
                layout: Some(&pipeline_layout),
                module: &module,
                entry_point: Some(ENTRY_POINT),
                compilation_options: wgpu::PipelineCompilationOptions {
                    constants: &constants,
                    ..Default::default()
                },
                cache: None,
            });
        log::debug!(
            "kernel compiled (chunk size {}, {} workgroups)",
            params.chunk_size,
            params.workgroups
        );

        Ok(Self {
            params,
            bind_group_layout,
            pipeline,
        })
    }

    pub fn params(&self) -> KernelParams {
        self.params
    }

    /// Add `inputs.a` and `inputs.b` on the GPU.
    pub async fn run_async(
        &self,
        context: &GpuContext,
        inputs: &Inputs,
    ) -> Result<[f32; TOTAL_ELEMENTS]> {
        let buffer_a = GpuBuffer::from_slice(context, "input_a", &inputs.a);
        let buffer_b = GpuBuffer::from_slice(context, "input_b", &inputs.b);
        let output = GpuBuffer::<f32>::new_output(context, "output", TOTAL_ELEMENTS);
        let staging = GpuBuffer::<f32>::new_staging(context, "staging", TOTAL_ELEMENTS);

        let bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vector_add_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: BINDING_A,
                    resource: buffer_a.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: BINDING_B,
                    resource: buffer_b.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: BINDING_OUT,
                    resource: output.buffer.as_entire_binding(),
                },
            ],
        });
        log::debug!("buffers bound");

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("vector_add_encoder"),
            });
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("vector_add_pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.pipeline);
            cpass.set_bind_group(0, &bind_group, &[]);
            cpass.dispatch_workgroups(self.params.workgroups, 1, 1);
        }
        encoder.copy_buffer_to_buffer(
            &output.buffer,
            0,
            &staging.buffer,
            0,
            output.byte_len(),
        );
        log::debug!("dispatched {} workgroups", self.params.workgroups);

        context.queue.submit([encoder.finish()]);
        log::debug!("commands submitted");

        let values = staging.read_async(context).await?;
        let actual = values.len();
        let result: [f32; TOTAL_ELEMENTS] =
            values.try_into().map_err(|_| Error::ReadbackLength {
                expected: TOTAL_ELEMENTS,
                actual,
            })?;
        log::debug!("result read back");
        Ok(result)
    }

    /// Blocking wrapper around [`Self::run_async`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run_blocking(
        &self,
        context: &GpuContext,
        inputs: &Inputs,
    ) -> Result<[f32; TOTAL_ELEMENTS]> {
        pollster::block_on(self.run_async(context, inputs))
    }
}

/// Run the whole program once: acquire a device, compile the kernel,
/// add the inputs and return the result.
pub async fn run(
    options: &ContextOptions,
    params: KernelParams,
    inputs: &Inputs,
) -> Result<[f32; TOTAL_ELEMENTS]> {
    let context = GpuContext::new_async(options).await?;
    let vector_add = VectorAdd::new(&context, params)?;
    vector_add.run_async(&context, inputs).await
}

/// Blocking wrapper around [`run`].
#[cfg(not(target_arch = "wasm32"))]
pub fn run_blocking(
    options: &ContextOptions,
    params: KernelParams,
    inputs: &Inputs,
) -> Result<[f32; TOTAL_ELEMENTS]> {
    pollster::block_on(run(options, params, inputs))
}
