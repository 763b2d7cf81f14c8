use std::sync::Arc;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use super::error::{DeferredError, DeferredErrors};
use super::surface;
use super::{FrameTarget, GpuError, GpuInit};

/// Window collaborator seen by the GPU layer.
///
/// Anything that can hand out native window/display handles and report its
/// drawable size in physical pixels can host the surface.
pub trait SurfaceHost: HasWindowHandle + HasDisplayHandle {
    fn size_in_pixels(&self) -> (u32, u32);
}

impl SurfaceHost for winit::window::Window {
    fn size_in_pixels(&self) -> (u32, u32) {
        let size = self.inner_size();
        (size.width, size.height)
    }
}

/// Adapter, device and queue plus the device's deferred error slots.
///
/// This is the surface-independent half of [`GpuContext`]; it can also be
/// created headless for offscreen work.
pub struct GpuDevice {
    /// Command queue. Exists as soon as the device does.
    queue: wgpu::Queue,

    /// Logical device.
    device: wgpu::Device,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// wgpu instance used to create the adapter (and surface, if any).
    instance: wgpu::Instance,

    /// Written by device callbacks, drained once per frame.
    errors: DeferredErrors,
}

impl GpuDevice {
    /// Negotiates an adapter and device without a presentable surface.
    pub fn new_headless(init: &GpuInit) -> Result<Self, GpuError> {
        Self::request(create_instance(), None, init)
    }

    /// Blocks until the adapter and device requests complete.
    ///
    /// `pollster` is the wait primitive; the timeout is whatever the backend
    /// applies to its own requests.
    fn request(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
        init: &GpuInit,
    ) -> Result<Self, GpuError> {
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface,
            force_fallback_adapter: false,
        }))?;

        let info = adapter.get_info();
        log::info!(
            "selected adapter: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("glint device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))?;

        let errors = DeferredErrors::new();
        install_error_callbacks(&device, &errors);

        Ok(Self {
            queue,
            device,
            adapter,
            instance,
            errors,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn errors(&self) -> &DeferredErrors {
        &self.errors
    }

    /// Largest 2D texture edge the device accepts.
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Reads and clears the deferred error slots.
    pub fn check_deferred_errors(&self) -> Result<(), GpuError> {
        self.errors.check()
    }

    /// Blocks until all submitted work has completed.
    pub fn flush(&self) {
        if let Err(err) = self.device.poll(wgpu::PollType::wait_indefinitely()) {
            log::warn!("device flush failed: {err}");
        }
    }
}

/// Registers the persistent device callbacks.
///
/// Callbacks only record into the slots. They may run on a backend thread or
/// inside `Device::poll`, so they never touch the GPU or unwind.
fn install_error_callbacks(device: &wgpu::Device, errors: &DeferredErrors) {
    let lost = errors.device_lost.recorder();
    device.set_device_lost_callback(move |reason, message| {
        lost.record(DeferredError::from_device_lost(reason, message));
    });

    let uncaptured = errors.uncaptured.recorder();
    device.on_uncaptured_error(Arc::new(move |error: wgpu::Error| {
        uncaptured.record(DeferredError::from_uncaptured(&error));
    }));
}

fn create_instance() -> wgpu::Instance {
    // Use all backends to allow wgpu to select the optimal platform backend.
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

/// Owns the device and a configured, presentable surface.
///
/// This type is the low-level rendering context:
/// - negotiates Instance/Adapter/Device/Queue (blocking, once)
/// - creates and configures the Surface (swapchain)
/// - turns deferred device errors into fatal per-frame failures
/// - acquires frames and provides an encoder + view for rendering
///
/// Field order is drop order: the surface goes before the device and instance.
pub struct GpuContext<'w> {
    /// Surface bound to the window.
    ///
    /// Surface lifetime is tied to the window; architecture must ensure the window
    /// outlives the `GpuContext` instance.
    surface: wgpu::Surface<'w>,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    gpu: GpuDevice,

    suboptimal_reported: bool,
}

impl<'w> GpuContext<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Any failure is terminal; no partially-initialized context escapes.
    pub fn new<W>(window: &'w W, init: GpuInit) -> Result<Self, GpuError>
    where
        W: SurfaceHost + Sync,
    {
        let (width, height) = window.size_in_pixels();
        if width == 0 || height == 0 {
            return Err(GpuError::ZeroSizedWindow { width, height });
        }

        let instance = create_instance();

        // The GL backend only yields adapters compatible with an existing
        // surface, so the surface is created before the adapter request.
        let surface = instance.create_surface(window)?;

        let gpu = GpuDevice::request(instance, Some(&surface), &init)?;

        let caps = surface.get_capabilities(gpu.adapter());
        let config = surface::surface_config(&caps, &init, (width, height))?;
        surface.configure(gpu.device(), &config);

        log::info!(
            "surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            surface,
            config,
            gpu,
            suboptimal_reported: false,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn surface_config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    /// Returns the configured surface size (physical pixels).
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.gpu.queue()
    }

    pub fn gpu(&self) -> &GpuDevice {
        &self.gpu
    }

    /// Reconfigures the surface after a resize.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size (minimized
    /// windows); such requests keep the previous configuration.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !surface::apply_size(&mut self.config, width, height) {
            log::debug!("ignoring zero-sized surface resize ({width}x{height})");
            return;
        }

        self.surface.configure(self.gpu.device(), &self.config);
    }

    /// Checks the deferred error slots, then acquires the next surface texture
    /// and creates an encoder.
    ///
    /// Both recorded device errors and acquisition failures are fatal.
    pub fn prepare_new_frame(&mut self) -> Result<FrameTarget, GpuError> {
        self.gpu.check_deferred_errors()?;

        let surface_texture = self.surface.get_current_texture()?;
        if surface_texture.suboptimal && !self.suboptimal_reported {
            log::debug!("surface texture is suboptimal; continuing");
            self.suboptimal_reported = true;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("glint frame encoder"),
            });

        Ok(FrameTarget {
            surface_texture,
            surface_view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame and presents it.
    pub fn submit_and_present(&self, frame: FrameTarget) {
        let FrameTarget {
            surface_texture,
            surface_view,
            encoder,
        } = frame;

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        drop(surface_view);
        surface_texture.present();

        // Drives pending callbacks, including the device error callbacks.
        if let Err(err) = self.gpu.device().poll(wgpu::PollType::Poll) {
            log::warn!("device poll failed: {err}");
        }
    }
}

impl Drop for GpuContext<'_> {
    fn drop(&mut self) {
        // All work referencing the surface must complete before it goes away.
        self.gpu.flush();
        log::debug!("GPU context shut down");
    }
}
