//! Core engine-facing contracts.
//!
//! The interface between the runtime (platform loop) and the application:
//! the phased [`App`] trait and the contexts handed to it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
