use crate::shader::ShaderError;

/// Rejected viewport requests.
///
/// The current texture and pipeline stay valid after any of these.
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    #[error("viewport extent {width}x{height} has a zero dimension")]
    ZeroExtent { width: u32, height: u32 },

    #[error("viewport extent {width}x{height} exceeds the device limit of {max} pixels per side")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// Passed naga but failed wgpu validation, e.g. a fragment interface
    /// the fixed vertex stage or uniform block cannot satisfy.
    #[error("{what} rejected by the device: {message}")]
    Rejected { what: &'static str, message: String },
}
