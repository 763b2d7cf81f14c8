use std::fmt;

use crossbeam_channel::{Receiver, Sender};

/// A GPU failure recorded by a device callback.
///
/// Plain value; `kind` is the reason/type name reported by wgpu and `message`
/// is the driver's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredError {
    pub kind: String,
    pub message: String,
}

impl DeferredError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub(crate) fn from_device_lost(reason: wgpu::DeviceLostReason, message: String) -> Self {
        Self::new(format!("{reason:?}"), message)
    }

    pub(crate) fn from_uncaptured(error: &wgpu::Error) -> Self {
        #[allow(unreachable_patterns)]
        let kind = match error {
            wgpu::Error::OutOfMemory { .. } => "OutOfMemory",
            wgpu::Error::Validation { .. } => "Validation",
            wgpu::Error::Internal { .. } => "Internal",
            _ => "Unknown",
        };
        Self::new(kind, error.to_string())
    }
}

impl fmt::Display for DeferredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Failures of the GPU layer.
///
/// Every variant is fatal for the current session; there is no local recovery
/// from a lost context or a failed negotiation.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("window has zero size ({width}x{height})")]
    ZeroSizedWindow { width: u32, height: u32 },

    #[error("failed to create GPU surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to request GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormats,

    #[error("GPU device lost ({0})")]
    DeviceLost(DeferredError),

    #[error("uncaptured GPU error ({0})")]
    Uncaptured(DeferredError),

    #[error("failed to acquire surface texture: {status}")]
    SurfaceAcquire { status: String },
}

impl From<wgpu::SurfaceError> for GpuError {
    fn from(err: wgpu::SurfaceError) -> Self {
        Self::SurfaceAcquire {
            status: format!("{err:?}"),
        }
    }
}

/// Write half of an [`ErrorSlot`], handed to device callbacks.
///
/// Recording never blocks and never fails; if the frame loop is gone the
/// record is dropped.
#[derive(Debug, Clone)]
pub struct ErrorRecorder {
    tx: Sender<DeferredError>,
}

impl ErrorRecorder {
    pub fn record(&self, error: DeferredError) {
        let _ = self.tx.send(error);
    }
}

/// Single-consumer mailbox for errors raised asynchronously by the GPU runtime.
///
/// Callbacks write through an [`ErrorRecorder`]; the frame loop reads and
/// clears the slot once per frame with [`ErrorSlot::take`].
#[derive(Debug)]
pub struct ErrorSlot {
    name: &'static str,
    tx: Sender<DeferredError>,
    rx: Receiver<DeferredError>,
}

impl ErrorSlot {
    pub fn new(name: &'static str) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { name, tx, rx }
    }

    pub fn recorder(&self) -> ErrorRecorder {
        ErrorRecorder {
            tx: self.tx.clone(),
        }
    }

    /// Drains the slot and returns the earliest record.
    ///
    /// Later records from the same drain are logged and discarded.
    pub fn take(&self) -> Option<DeferredError> {
        let mut drained = self.rx.try_iter();
        let first = drained.next()?;
        for extra in drained {
            log::warn!("additional {} error discarded: {extra}", self.name);
        }
        Some(first)
    }
}

/// The two deferred error slots owned by a device.
#[derive(Debug)]
pub struct DeferredErrors {
    pub device_lost: ErrorSlot,
    pub uncaptured: ErrorSlot,
}

impl DeferredErrors {
    pub fn new() -> Self {
        Self {
            device_lost: ErrorSlot::new("device-lost"),
            uncaptured: ErrorSlot::new("uncaptured"),
        }
    }

    /// Reads and clears both slots. Device loss takes precedence.
    pub fn check(&self) -> Result<(), GpuError> {
        if let Some(err) = self.device_lost.take() {
            return Err(GpuError::DeviceLost(err));
        }
        if let Some(err) = self.uncaptured.take() {
            return Err(GpuError::Uncaptured(err));
        }
        Ok(())
    }
}

impl Default for DeferredErrors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slots_pass_check() {
        let errors = DeferredErrors::new();
        assert!(errors.check().is_ok());
    }

    #[test]
    fn recorded_error_surfaces_once() {
        let errors = DeferredErrors::new();
        errors
            .uncaptured
            .recorder()
            .record(DeferredError::new("Validation", "bad bind group"));

        match errors.check() {
            Err(GpuError::Uncaptured(err)) => {
                assert_eq!(err.kind, "Validation");
                assert_eq!(err.message, "bad bind group");
            }
            other => panic!("expected uncaptured error, got {other:?}"),
        }

        // Read-and-clear: the next frame sees a clean slot.
        assert!(errors.check().is_ok());
    }

    #[test]
    fn device_lost_wins_over_uncaptured() {
        let errors = DeferredErrors::new();
        errors
            .uncaptured
            .recorder()
            .record(DeferredError::new("Internal", "x"));
        errors
            .device_lost
            .recorder()
            .record(DeferredError::new("Destroyed", "gone"));

        assert!(matches!(errors.check(), Err(GpuError::DeviceLost(_))));
        assert!(matches!(errors.check(), Err(GpuError::Uncaptured(_))));
        assert!(errors.check().is_ok());
    }

    #[test]
    fn earliest_record_is_reported() {
        let slot = ErrorSlot::new("test");
        let recorder = slot.recorder();
        recorder.record(DeferredError::new("Validation", "first"));
        recorder.record(DeferredError::new("Validation", "second"));

        assert_eq!(slot.take().map(|e| e.message), Some("first".to_string()));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn recorder_works_from_another_thread() {
        let errors = DeferredErrors::new();
        let recorder = errors.device_lost.recorder();

        std::thread::spawn(move || recorder.record(DeferredError::new("Unknown", "driver reset")))
            .join()
            .unwrap();

        match errors.check() {
            Err(GpuError::DeviceLost(err)) => assert_eq!(err.message, "driver reset"),
            other => panic!("expected device lost, got {other:?}"),
        }
    }

    #[test]
    fn error_between_frames_fails_the_next_frame() {
        let errors = DeferredErrors::new();

        // Frame N: nothing recorded yet.
        assert!(errors.check().is_ok());

        // Between frame N submission and frame N+1.
        errors
            .uncaptured
            .recorder()
            .record(DeferredError::new("OutOfMemory", "texture allocation failed"));

        let err = errors.check().unwrap_err();
        assert_eq!(
            err.to_string(),
            "uncaptured GPU error (OutOfMemory: texture allocation failed)"
        );
    }

    #[test]
    fn surface_error_carries_status_name() {
        let err: GpuError = wgpu::SurfaceError::Timeout.into();
        assert_eq!(err.to_string(), "failed to acquire surface texture: Timeout");
    }
}
