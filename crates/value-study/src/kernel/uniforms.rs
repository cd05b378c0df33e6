//! Uniform block shared with `posterize.wgsl`.
//!
//! Layout must match the WGSL `Uniforms` struct exactly. Uniform-space
//! arrays need a 16-byte stride, so thresholds and colors are stored as
//! `vec4<f32>` lanes.

use bytemuck::{Pod, Zeroable};

use super::RenderSnapshot;
use crate::levels::{MAX_LEVELS, MAX_THRESHOLDS};

/// Threshold lanes: 10 thresholds packed four per `vec4`.
pub const THRESHOLD_LANES: usize = MAX_THRESHOLDS.div_ceil(4);

/// Parameters for one posterize dispatch.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    /// `thresholds[i / 4][i % 4]` is threshold `i`; trailing lanes hold 1.0
    pub thresholds: [[f32; 4]; THRESHOLD_LANES],
    /// RGB per band in `xyz`, `w` unused
    pub colors: [[f32; 4]; MAX_LEVELS],
    /// 1 = posterize, 0 = passthrough
    pub grayscale: u32,
    pub level_count: u32,
    /// Number of valid elements; invocations beyond it return early
    pub pixel_count: u32,
    /// Invocations per dispatch row (`workgroups_x * workgroup_size`)
    pub row_stride: u32,
}

impl ShaderUniforms {
    /// Pack a snapshot for a dispatch over `pixel_count` elements.
    pub fn from_snapshot(snapshot: &RenderSnapshot, pixel_count: u32, row_stride: u32) -> Self {
        let mut thresholds = [[1.0f32; 4]; THRESHOLD_LANES];
        for (i, &t) in snapshot.thresholds().iter().enumerate() {
            thresholds[i / 4][i % 4] = t;
        }

        let mut colors = [[0.0f32; 4]; MAX_LEVELS];
        for (lane, rgb) in colors.iter_mut().zip(snapshot.color_table().as_array()) {
            *lane = [rgb[0], rgb[1], rgb[2], 1.0];
        }

        Self {
            thresholds,
            colors,
            grayscale: u32::from(snapshot.grayscale()),
            level_count: snapshot.level_count() as u32,
            pixel_count,
            row_stride,
        }
    }
}
