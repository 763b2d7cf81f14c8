use super::{GpuError, GpuInit};

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if caps.formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(caps.formats[0])
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Builds the initial surface configuration from the reported capabilities.
///
/// Fails when the surface reports no formats. The present mode is taken from
/// `init` without negotiation.
pub(crate) fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    init: &GpuInit,
    (width, height): (u32, u32),
) -> Result<wgpu::SurfaceConfiguration, GpuError> {
    let format = choose_surface_format(caps, init.prefer_srgb).ok_or(GpuError::NoSurfaceFormats)?;

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: init.present_mode,
        alpha_mode: choose_alpha_mode(caps, init.alpha_mode),
        view_formats: vec![],
        desired_maximum_frame_latency: init.desired_maximum_frame_latency,
    })
}

/// Applies a new pixel size to `config`.
///
/// Returns `false` for a zero-sized request; wgpu cannot configure a 0x0
/// surface, so the caller keeps the previous configuration.
pub(crate) fn apply_size(config: &mut wgpu::SurfaceConfiguration, width: u32, height: u32) -> bool {
    if width == 0 || height == 0 {
        return false;
    }

    config.width = width;
    config.height = height;
    true
}
