//! GPU context management for the wgpu device, queue and the two
//! posterize pipelines.

use std::fmt;

/// WGSL source of both compute entry points.
pub(crate) const POSTERIZE_SHADER: &str = include_str!("posterize.wgsl");

/// Errors that can occur during GPU operations.
#[derive(Debug, Clone)]
pub enum GpuError {
    /// No suitable GPU adapter found
    NoAdapter,
    /// Failed to request GPU device
    DeviceRequest(String),
    /// Buffer mapping or readback failed
    BufferError(String),
    /// Input too large for a single 2D dispatch
    TooLarge {
        /// Elements requested
        elements: u64,
        /// Elements a single dispatch can cover
        max: u64,
    },
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::NoAdapter => write!(f, "No suitable GPU adapter found"),
            GpuError::DeviceRequest(e) => write!(f, "Failed to request GPU device: {}", e),
            GpuError::BufferError(e) => write!(f, "Buffer operation failed: {}", e),
            GpuError::TooLarge { elements, max } => {
                write!(f, "Input too large: {} elements, max supported is {}", elements, max)
            }
        }
    }
}

impl std::error::Error for GpuError {}

/// GPU context holding the wgpu device, queue and compiled pipelines.
///
/// Creating a context compiles the shader, so build one and reuse it
/// across renders.
pub struct GpuContext {
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    pub(crate) posterize: wgpu::ComputePipeline,
    pub(crate) classify: wgpu::ComputePipeline,
    adapter_info: wgpu::AdapterInfo,
}

fn instance() -> wgpu::Instance {
    wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

fn adapter_options() -> wgpu::RequestAdapterOptions<'static, 'static> {
    wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }
}

impl GpuContext {
    /// Check if an adapter is available without creating a device.
    pub fn is_available() -> bool {
        let instance = instance();
        pollster::block_on(instance.request_adapter(&adapter_options())).is_some()
    }

    /// Human-readable name of the adapter that would be used.
    pub fn device_info() -> Option<String> {
        let instance = instance();
        pollster::block_on(instance.request_adapter(&adapter_options())).map(|adapter| {
            let info = adapter.get_info();
            format!("{} ({:?}, {:?})", info.name, info.device_type, info.backend)
        })
    }

    /// Create a context, blocking on device creation.
    pub fn new() -> Result<Self, GpuError> {
        pollster::block_on(Self::new_async())
    }

    pub async fn new_async() -> Result<Self, GpuError> {
        let instance = instance();
        let adapter = instance
            .request_adapter(&adapter_options())
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        let adapter_limits = adapter.limits();

        // Large photos exceed the default 128 MiB storage binding
        let limits = wgpu::Limits {
            max_storage_buffer_binding_size: adapter_limits.max_storage_buffer_binding_size,
            max_buffer_size: adapter_limits.max_buffer_size,
            ..wgpu::Limits::downlevel_defaults()
        };

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("value-study-gpu"),
                    required_features: wgpu::Features::empty(),
                    required_limits: limits,
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| GpuError::DeviceRequest(e.to_string()))?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("posterize"),
            source: wgpu::ShaderSource::Wgsl(POSTERIZE_SHADER.into()),
        });

        // Layouts are derived per entry point: posterize binds 0..=3,
        // classify binds 0, 4 and 5.
        let posterize = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("posterize"),
            layout: None,
            module: &module,
            entry_point: Some("posterize"),
            compilation_options: Default::default(),
            cache: None,
        });

        let classify = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("classify"),
            layout: None,
            module: &module,
            entry_point: Some("classify"),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            posterize,
            classify,
            adapter_info,
        })
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    pub(crate) fn submit_and_wait(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::Maintain::Wait);
    }
}
