use winit::event::WindowEvent;

use crate::device::{FrameTarget, GpuContext};

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Each frame the runtime calls, in order: [`apply_pending`](App::apply_pending)
/// (the safe point, with nothing encoded yet), [`layout`](App::layout) (which
/// may request resizes and rebuilds), then [`record`](App::record). Surface
/// acquisition and the deferred error check happen before all three; submit
/// and present after.
pub trait App {
    /// Called once, after the GPU context is ready and before the first frame.
    fn on_gpu_ready(&mut self, gpu: &GpuContext<'_>) -> anyhow::Result<()>;

    /// Called for window events. Resizes reach the app after the surface has
    /// been reconfigured.
    fn on_window_event(&mut self, window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (window, event);
        AppControl::Continue
    }

    /// Applies state recorded during the previous layout pass.
    fn apply_pending(&mut self, ctx: &mut FrameCtx<'_, '_>);

    /// Per-frame layout/UI pass.
    fn layout(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Encodes this frame's commands. Must not submit.
    fn record(&mut self, ctx: &FrameCtx<'_, '_>, frame: &mut FrameTarget);
}
