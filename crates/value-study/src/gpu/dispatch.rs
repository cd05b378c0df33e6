//! Posterize and classify dispatches.

use wgpu::util::DeviceExt;

use super::context::{GpuContext, GpuError};
use crate::color::Rgba;
use crate::kernel::{RenderSnapshot, ShaderUniforms};
use crate::output::PosterizedImage;
use crate::source::SourceImage;

/// Invocations per workgroup; must match `@workgroup_size` in the shader.
pub(crate) const WORKGROUP_SIZE: u32 = 256;

/// Maximum workgroups per dispatch dimension (wgpu limit).
pub(crate) const MAX_WORKGROUPS_PER_DIM: u32 = 65535;

/// Workgroup grid covering `elements` invocations.
///
/// One row of workgroups when it fits, otherwise a roughly square 2D grid.
fn dispatch_dims(elements: u32) -> Result<(u32, u32), GpuError> {
    let total_workgroups = elements.div_ceil(WORKGROUP_SIZE).max(1);
    if total_workgroups <= MAX_WORKGROUPS_PER_DIM {
        return Ok((total_workgroups, 1));
    }

    let side = ((total_workgroups as f64).sqrt().ceil() as u32).min(MAX_WORKGROUPS_PER_DIM);
    let rows = total_workgroups.div_ceil(side);
    if rows > MAX_WORKGROUPS_PER_DIM {
        return Err(GpuError::TooLarge {
            elements: elements as u64,
            max: MAX_WORKGROUPS_PER_DIM as u64
                * MAX_WORKGROUPS_PER_DIM as u64
                * WORKGROUP_SIZE as u64,
        });
    }
    Ok((side, rows))
}

fn storage_init(ctx: &GpuContext, label: &str, contents: &[u8]) -> wgpu::Buffer {
    ctx.device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::STORAGE,
        })
}

fn storage_output(ctx: &GpuContext, label: &str, size: u64) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    })
}

fn staging(ctx: &GpuContext, label: &str, size: u64) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Map a staging buffer and copy its contents out as `T`.
fn read_back<T: bytemuck::Pod>(ctx: &GpuContext, buffer: &wgpu::Buffer) -> Result<Vec<T>, GpuError> {
    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    ctx.device.poll(wgpu::Maintain::Wait);

    rx.recv()
        .map_err(|e| GpuError::BufferError(e.to_string()))?
        .map_err(|e| GpuError::BufferError(e.to_string()))?;

    let data = slice.get_mapped_range();
    let values = bytemuck::cast_slice(&data).to_vec();
    drop(data);
    buffer.unmap();
    Ok(values)
}

/// Record one dispatch of `pipeline` with `entries` bound to group 0.
fn run(
    ctx: &GpuContext,
    pipeline: &wgpu::ComputePipeline,
    entries: &[wgpu::BindGroupEntry<'_>],
    dims: (u32, u32),
    copies: &[(&wgpu::Buffer, &wgpu::Buffer, u64)],
) {
    let layout = pipeline.get_bind_group_layout(0);
    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("posterize_bind_group"),
        layout: &layout,
        entries,
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("posterize_encoder"),
        });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("posterize_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(dims.0, dims.1, 1);
    }
    for (src, dst, size) in copies {
        encoder.copy_buffer_to_buffer(src, 0, dst, 0, *size);
    }
    ctx.submit_and_wait(encoder);
}

/// Posterize a whole image on the GPU.
///
/// Produces the same bands as [`kernel::render`](crate::kernel::render).
/// Output colors can differ from the CPU in the last bits where the
/// driver fuses the luma multiply-adds; band selection for a given luma
/// does not.
pub fn render_gpu(
    ctx: &GpuContext,
    source: &SourceImage,
    snapshot: &RenderSnapshot,
) -> Result<PosterizedImage, GpuError> {
    let pixel_count = source.len() as u32;
    let dims = dispatch_dims(pixel_count)?;
    let row_stride = dims.0 * WORKGROUP_SIZE;

    let uniforms = ShaderUniforms::from_snapshot(snapshot, pixel_count, row_stride);
    let uniform_buffer = ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("posterize_uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });

    let input: Vec<[f32; 4]> = source.pixels().iter().map(|px| px.to_array()).collect();
    let input_buffer = storage_init(ctx, "posterize_input", bytemuck::cast_slice(&input));

    let pixel_bytes = (input.len() * std::mem::size_of::<[f32; 4]>()) as u64;
    let band_bytes = (input.len() * std::mem::size_of::<u32>()) as u64;
    let output_buffer = storage_output(ctx, "posterize_output", pixel_bytes);
    let bands_buffer = storage_output(ctx, "posterize_bands", band_bytes);
    let output_staging = staging(ctx, "posterize_output_staging", pixel_bytes);
    let bands_staging = staging(ctx, "posterize_bands_staging", band_bytes);

    run(
        ctx,
        &ctx.posterize,
        &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: input_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: output_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: bands_buffer.as_entire_binding(),
            },
        ],
        dims,
        &[
            (&output_buffer, &output_staging, pixel_bytes),
            (&bands_buffer, &bands_staging, band_bytes),
        ],
    );

    let output: Vec<[f32; 4]> = read_back(ctx, &output_staging)?;
    let pixels = output
        .into_iter()
        .map(|[r, g, b, a]| Rgba::new(r, g, b, a))
        .collect();

    let (width, height) = (source.width(), source.height());
    if !snapshot.grayscale() {
        return Ok(PosterizedImage::passthrough(width, height, pixels));
    }

    let bands: Vec<u32> = read_back(ctx, &bands_staging)?;
    Ok(PosterizedImage::posterized(
        width,
        height,
        pixels,
        bands.into_iter().map(|b| b as u8).collect(),
    ))
}

/// Classify raw luma values on the GPU.
///
/// Runs the shader's `band_of` on each value with no luma computation in
/// between, so the result can be compared with
/// [`RenderSnapshot::band_of`] bit for bit.
pub fn classify_luma_gpu(
    ctx: &GpuContext,
    lumas: &[f32],
    snapshot: &RenderSnapshot,
) -> Result<Vec<usize>, GpuError> {
    if lumas.is_empty() {
        return Ok(Vec::new());
    }

    let count = lumas.len() as u32;
    let dims = dispatch_dims(count)?;
    let uniforms = ShaderUniforms::from_snapshot(snapshot, count, dims.0 * WORKGROUP_SIZE);
    let uniform_buffer = ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("classify_uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });

    let luma_buffer = storage_init(ctx, "classify_lumas", bytemuck::cast_slice(lumas));
    let band_bytes = (lumas.len() * std::mem::size_of::<u32>()) as u64;
    let bands_buffer = storage_output(ctx, "classify_bands", band_bytes);
    let bands_staging = staging(ctx, "classify_bands_staging", band_bytes);

    run(
        ctx,
        &ctx.classify,
        &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: luma_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 5,
                resource: bands_buffer.as_entire_binding(),
            },
        ],
        dims,
        &[(&bands_buffer, &bands_staging, band_bytes)],
    );

    let bands: Vec<u32> = read_back(ctx, &bands_staging)?;
    Ok(bands.into_iter().map(|b| b as usize).collect())
}
