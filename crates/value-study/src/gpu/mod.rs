//! GPU posterize backend.
//!
//! A WGSL compute version of the [`kernel`](crate::kernel) running on wgpu
//! (Metal on macOS, Vulkan on Linux/Windows, DX12 on Windows). Enabled via
//! the `gpu` feature:
//!
//! ```toml
//! [dependencies]
//! value-study = { version = "0.1", features = ["gpu"] }
//! ```
//!
//! The shader has two entry points sharing one `band_of` function:
//! `posterize` (RGBA in, RGBA and band out) and `classify` (luma in, band
//! out). The second exists so band selection can be checked against the CPU
//! without the luma computation in the way.

mod context;
mod dispatch;

pub use context::{GpuContext, GpuError};
pub use dispatch::{classify_luma_gpu, render_gpu};

/// Check if GPU acceleration is available on this system.
pub fn is_gpu_available() -> bool {
    GpuContext::is_available()
}

/// Get information about the available GPU device.
pub fn gpu_info() -> Option<String> {
    GpuContext::device_info()
}

#[cfg(test)]
mod tests;
