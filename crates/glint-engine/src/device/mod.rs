//! GPU device + surface management.
//!
//! This module is responsible for:
//! - negotiating the wgpu Instance/Adapter/Device/Queue (blocking, once)
//! - creating & configuring the Surface (swapchain)
//! - capturing device-lost / uncaptured errors into deferred slots
//! - acquiring frames and providing encoders/views for rendering

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::{DeferredError, DeferredErrors, ErrorRecorder, ErrorSlot, GpuError};
pub use frame::FrameTarget;
pub use gpu::{GpuContext, GpuDevice, SurfaceHost};
pub use init::GpuInit;
