/// Per-frame render target produced by [`GpuContext::prepare_new_frame`].
///
/// Owned by the frame driver for exactly one frame and consumed by
/// [`GpuContext::submit_and_present`]. Holding the surface texture prevents
/// acquisition of subsequent frames, so never keep one across frames.
///
/// [`GpuContext::prepare_new_frame`]: super::GpuContext::prepare_new_frame
/// [`GpuContext::submit_and_present`]: super::GpuContext::submit_and_present
pub struct FrameTarget {
    pub surface_texture: wgpu::SurfaceTexture,
    pub surface_view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
