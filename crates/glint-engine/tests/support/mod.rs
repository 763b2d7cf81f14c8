use std::env;

use glint_engine::device::{GpuDevice, GpuInit};
use glint_engine::viewport::{FRAGMENT_PRELUDE, Viewport};

pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub fn gpu_tests_enabled() -> bool {
    matches!(
        env::var("GLINT_RUN_GPU_TESTS")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Headless device, or `None` (with a note) when GPU tests are disabled.
pub fn headless(test: &str) -> Option<GpuDevice> {
    if !gpu_tests_enabled() {
        eprintln!("Skipping {test}. Set GLINT_RUN_GPU_TESTS=1 to run.");
        return None;
    }

    let init = GpuInit {
        power_preference: wgpu::PowerPreference::LowPower,
        ..GpuInit::default()
    };
    Some(GpuDevice::new_headless(&init).expect("expected a headless adapter for GPU tests"))
}

/// Complete fragment source writing a constant color.
pub fn solid_fragment(r: f32, g: f32, b: f32) -> String {
    format!(
        "{FRAGMENT_PRELUDE}\n@fragment fn main(in: VertexOutput) -> @location(0) vec4<f32> {{
            return vec4<f32>({r:?}, {g:?}, {b:?}, 1.0);
        }}"
    )
}

/// Renders the viewport once and reads back its top-left pixel.
pub fn render_first_pixel(gpu: &GpuDevice, viewport: &Viewport) -> [u8; 4] {
    let device = gpu.device();
    let extent = viewport.extent();
    let bytes_per_row = (extent.width * 4).next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("test readback"),
        size: u64::from(bytes_per_row) * u64::from(extent.height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    viewport.prepare_frame(gpu.queue(), 0.0);

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("test encoder"),
    });
    viewport.record(&mut encoder);
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: viewport.texture(),
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(extent.height),
            },
        },
        viewport.texture().size(),
    );
    gpu.queue().submit(std::iter::once(encoder.finish()));

    let slice = readback.slice(..);
    slice.map_async(wgpu::MapMode::Read, |result| {
        result.expect("readback mapping failed");
    });
    gpu.flush();

    let data = slice.get_mapped_range();
    [data[0], data[1], data[2], data[3]]
}
