use bytemuck::{Pod, Zeroable};

use super::Extent;

/// Uniform block at `@group(0) @binding(0)` of the viewport pipeline.
///
/// Matches the WGSL `Uniforms` struct: `resolution` is a `vec2<f32>` and
/// needs 8-byte alignment.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ViewportUniforms {
    pub time: f32,
    pub _pad: f32,
    pub resolution: [f32; 2],
}

impl ViewportUniforms {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(time: f32, extent: Extent) -> Self {
        Self {
            time,
            _pad: 0.0,
            resolution: [extent.width as f32, extent.height as f32],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_wgsl_struct() {
        assert_eq!(ViewportUniforms::SIZE, 16);
        assert_eq!(std::mem::offset_of!(ViewportUniforms, resolution), 8);
    }

    #[test]
    fn resolution_comes_from_extent() {
        let u = ViewportUniforms::new(1.5, Extent::new(640, 360));
        assert_eq!(u.time, 1.5);
        assert_eq!(u.resolution, [640.0, 360.0]);
    }
}
