/// Parameters for GPU negotiation and surface configuration.
///
/// Defaults: high-performance adapter, vsync (`Fifo`), the surface's first
/// reported format, no optional features and default limits.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Pick an sRGB format when the surface offers one. The viewport renders
    /// in the surface format, so this also decides how shader output is
    /// encoded.
    pub prefer_srgb: bool,

    /// Used as-is. `Fifo` is the one mode every platform supports.
    pub present_mode: wgpu::PresentMode,

    /// Replaced by the first supported mode when unsupported or `None`.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Frames the surface may queue ahead of presentation (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
