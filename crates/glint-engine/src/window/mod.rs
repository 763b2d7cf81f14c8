//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, and wires them to the
//! GPU context and the application's frame phases.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
