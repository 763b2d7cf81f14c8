//! Shader module creation.
//!
//! Turns WGSL text or `.wgsl` files into wgpu shader modules, and validates
//! user fragment stages on the CPU before they reach the device.

mod error;
mod factory;
mod source;
mod validate;

pub use error::ShaderError;
pub use factory::{WgslSource, shader_module_from_wgsl};
pub use source::{WGSL_EXTENSION, read_wgsl_file};
pub use validate::{ENTRY_POINT, validate_fragment};
