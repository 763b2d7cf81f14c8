//! glint engine crate.
//!
//! GPU context and deferred device errors, the offscreen shader viewport,
//! WGSL loading/validation and the window runtime that drives frames.

pub mod core;
pub mod device;
pub mod logging;
pub mod shader;
pub mod time;
pub mod viewport;
pub mod window;
