//! GPU context initialization.
//!
//! This module wraps wgpu's instance, adapter, device and queue.  The
//! capability check runs first and fails before anything is created;
//! adapter acquisition follows and fails before any device request.
//! The `new_blocking` constructor hides the asynchronous adapter and
//! device requests behind [`pollster`] on native targets.

use wgpu::{Adapter, Backends, Device, Instance, PowerPreference, Queue};

use crate::error::{Error, Result};

/// Options used when acquiring the adapter and device.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Backends the instance may pick an adapter from.
    pub backends: Backends,
    pub power_preference: PowerPreference,
    /// Request the software fallback adapter instead of real hardware.
    pub force_fallback_adapter: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        #[cfg(target_arch = "wasm32")]
        let backends = Backends::BROWSER_WEBGPU;
        #[cfg(not(target_arch = "wasm32"))]
        let backends = Backends::all();

        Self {
            backends,
            power_preference: PowerPreference::HighPerformance,
            force_fallback_adapter: false,
        }
    }
}

/// Verify that a compute-capable graphics API is reachable at all.
///
/// Fails when none of the requested backends was compiled into wgpu,
/// or, in the browser, when `navigator.gpu` is missing.  Nothing is
/// allocated by this check.
pub async fn check_support(options: &ContextOptions) -> Result<()> {
    if !Instance::enabled_backend_features().intersects(options.backends) {
        return Err(Error::NotSupported);
    }
    #[cfg(target_arch = "wasm32")]
    if options.backends.contains(Backends::BROWSER_WEBGPU)
        && !wgpu::util::is_browser_webgpu_supported().await
    {
        return Err(Error::NotSupported);
    }
    Ok(())
}

/// Turn the outcome of an adapter request into the fatal `NoAdapter`
/// error, keeping the backend's reason in the debug log.
fn require_adapter<A, E: std::fmt::Display>(
    request: std::result::Result<A, E>,
) -> Result<A> {
    request.map_err(|e| {
        log::debug!("adapter request failed: {e}");
        Error::NoAdapter
    })
}

/// A GPU context encapsulates all state needed to submit compute work.
///
/// The device is owned exclusively by the run that created it and is
/// released when the context is dropped.
pub struct GpuContext {
    pub instance: Instance,
    /// The physical device selected for computation.
    pub adapter: Adapter,
    /// Logical device used to create resources and command encoders.
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Create a new GPU context synchronously.
    ///
    /// Blocks the current thread while the asynchronous adapter and
    /// device requests complete.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_blocking(options: &ContextOptions) -> Result<Self> {
        pollster::block_on(Self::new_async(options))
    }

    /// Create a new GPU context asynchronously.
    pub async fn new_async(options: &ContextOptions) -> Result<Self> {
        check_support(options).await?;

        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: options.backends,
            ..Default::default()
        });

        let adapter = require_adapter(
            instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: options.power_preference,
                    compatible_surface: None,
                    force_fallback_adapter: options.force_fallback_adapter,
                })
                .await,
        )?;

        // Downlevel backends (WebGL, some GLES drivers) expose an adapter
        // without compute support.
        let capabilities = adapter.get_downlevel_capabilities();
        if !capabilities
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
        {
            return Err(Error::NotSupported);
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gpu_vector_add_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let context = Self {
            instance,
            adapter,
            device,
            queue,
        };
        log::info!("device ready on {}", context.adapter_summary());
        Ok(context)
    }

    /// Adapter name and backend, e.g. `"NVIDIA GeForce RTX 3080 (Vulkan)"`.
    pub fn adapter_summary(&self) -> String {
        let info = self.adapter.get_info();
        format!("{} ({:?})", info.name, info.backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_backend_set_is_not_supported() {
        let options = ContextOptions {
            backends: Backends::empty(),
            ..Default::default()
        };
        let err = pollster::block_on(check_support(&options)).unwrap_err();
        assert!(matches!(err, Error::NotSupported));
        assert_eq!(err.to_string(), "WebGPU not supported.");
    }

    #[test]
    fn context_creation_stops_at_capability_check() {
        let options = ContextOptions {
            backends: Backends::empty(),
            ..Default::default()
        };
        let err = GpuContext::new_blocking(&options).err().unwrap();
        assert!(matches!(err, Error::NotSupported));
    }

    #[test]
    fn missing_adapter_is_fatal() {
        let err = require_adapter::<(), _>(Err("no adapter on any backend")).unwrap_err();
        assert!(matches!(err, Error::NoAdapter));
        assert_eq!(err.to_string(), "Couldn't request WebGPU adapter.");
        assert_eq!(require_adapter::<_, String>(Ok(7)).unwrap(), 7);
    }

    #[test]
    fn default_options_prefer_high_performance() {
        let options = ContextOptions::default();
        assert_eq!(options.power_preference, PowerPreference::HighPerformance);
        assert!(!options.force_fallback_adapter);
        assert!(!options.backends.is_empty());
    }
}
