//! Offscreen viewport: an independently sized render target, its pipeline and
//! the two-phase resize protocol.

mod aspect;
mod error;
mod offscreen;
mod sizing;
mod uniforms;

pub use aspect::AspectPreset;
pub use error::ViewportError;
pub use offscreen::{FRAGMENT_PRELUDE, PipelineState, Viewport};
pub use sizing::{DisplayMode, Extent, ViewportConfig, ViewportSizing};
pub use uniforms::ViewportUniforms;
