use std::path::Path;

use super::{ShaderError, read_wgsl_file};

/// Where WGSL source comes from.
#[derive(Debug, Clone, Copy)]
pub enum WgslSource<'a> {
    /// Source text; no filesystem access is performed.
    Code(&'a str),
    /// A `.wgsl` file, checked and read before compilation.
    File(&'a Path),
}

/// Wraps WGSL source into a GPU shader module.
///
/// Stateless and without retries; any failure is returned unchanged. Source
/// text is not validated here, see [`validate_fragment`](super::validate_fragment).
pub fn shader_module_from_wgsl(
    device: &wgpu::Device,
    source: WgslSource<'_>,
    label: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    match source {
        WgslSource::Code(code) => Ok(create_module(device, code, label)),
        WgslSource::File(path) => {
            let code = read_wgsl_file(path)?;
            Ok(create_module(device, &code, label))
        }
    }
}

fn create_module(device: &wgpu::Device, code: &str, label: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(code.into()),
    })
}
