//! Backend selection for rendering a study

use value_study::{kernel, PosterizedImage, ShadingParameters, SourceImage, StudyError};

/// Where pixels are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Cpu,
    /// GPU when built with the `gpu` feature and an adapter is present,
    /// CPU otherwise
    Gpu,
}

impl Backend {
    pub fn from_flag(gpu: bool) -> Self {
        if gpu {
            Backend::Gpu
        } else {
            Backend::Cpu
        }
    }
}

/// Whether a GPU adapter can be used by this build
pub fn gpu_available() -> bool {
    #[cfg(feature = "gpu")]
    {
        value_study::gpu::is_gpu_available()
    }
    #[cfg(not(feature = "gpu"))]
    {
        false
    }
}

/// Human readable description of the GPU, if one is usable
pub fn gpu_description() -> Option<String> {
    #[cfg(feature = "gpu")]
    {
        value_study::gpu::gpu_info()
    }
    #[cfg(not(feature = "gpu"))]
    {
        None
    }
}

/// Render `source` with a snapshot of `params`.
///
/// The GPU backend falls back to the CPU kernel (with a warning) when no
/// adapter is available.
pub fn render(
    source: &SourceImage,
    params: &ShadingParameters,
    backend: Backend,
) -> Result<PosterizedImage, StudyError> {
    let snapshot = params.snapshot();

    if backend == Backend::Gpu {
        #[cfg(feature = "gpu")]
        match value_study::gpu::GpuContext::new() {
            Ok(ctx) => {
                tracing::debug!(adapter = %ctx.adapter_info().name, "Rendering on GPU");
                return Ok(value_study::gpu::render_gpu(&ctx, source, &snapshot)?);
            }
            Err(e) => tracing::warn!(%e, "GPU unavailable, rendering on CPU"),
        }
        #[cfg(not(feature = "gpu"))]
        tracing::warn!("Built without GPU support, rendering on CPU");
    }

    tracing::debug!(
        width = source.width(),
        height = source.height(),
        levels = snapshot.level_count(),
        "Rendering on CPU"
    );
    Ok(kernel::render(source, &snapshot))
}
