use anyhow::Context;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{ModifiersState, PhysicalKey};

use glint_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use glint_engine::device::{FrameTarget, GpuContext};
use glint_engine::viewport::{DisplayMode, Viewport, ViewportConfig, ViewportError};

use crate::assets::Assets;
use crate::code_panel::{self, CodeRaster};
use crate::controls::{self, Action, ResolutionInput};
use crate::editor::Editor;
use crate::layout::{self, Layout, PixelRect};
use crate::present::Presenter;

/// GPU objects that exist once the device does.
struct Ready {
    viewport: Viewport,
    presenter: Presenter,
    resolution: ResolutionInput,
}

/// The studio: editor buffer on the left, shader output on the right.
pub struct Studio {
    editor: Editor,
    layout: Layout,
    viewport_config: ViewportConfig,

    modifiers: ModifiersState,
    /// Key actions since the last layout pass.
    actions: Vec<Action>,

    ready: Option<Ready>,
    image: Option<PixelRect>,
    title: String,

    /// `None` when no usable font was found; the panel stays blank.
    code_raster: Option<CodeRaster>,
    /// Editor panel the uploaded code image was composed for.
    code_rect: PixelRect,
    code_dirty: bool,
}

impl Studio {
    pub fn new(editor: Editor, viewport_config: ViewportConfig) -> Self {
        Self {
            editor,
            layout: Layout::default(),
            viewport_config,
            modifiers: ModifiersState::empty(),
            actions: Vec::new(),
            ready: None,
            image: None,
            title: String::new(),
            code_raster: None,
            code_rect: PixelRect::default(),
            code_dirty: true,
        }
    }
}

impl App for Studio {
    fn on_gpu_ready(&mut self, gpu: &GpuContext<'_>) -> anyhow::Result<()> {
        let device = gpu.device();
        let format = gpu.surface_format();
        let panel_width = self.layout.output_width(gpu.size().0);

        let viewport = match Viewport::new(
            device,
            format,
            &self.viewport_config,
            panel_width,
            &self.editor.combined_code(),
        ) {
            Ok(viewport) => viewport,
            Err(err @ (ViewportError::Shader(_) | ViewportError::Rejected { .. })) => {
                // Start with the bundled shader; the buffer stays as loaded so
                // it can be fixed and re-run.
                log::error!("{err}");
                let fallback = Editor::new(Assets::embedded_default_fragment());
                Viewport::new(
                    device,
                    format,
                    &self.viewport_config,
                    panel_width,
                    &fallback.combined_code(),
                )
                .context("failed to create viewport with the default shader")?
            }
            Err(err) => return Err(err).context("failed to create viewport"),
        };

        let resolution = ResolutionInput::new(viewport.extent(), gpu.gpu().max_texture_dimension());
        let presenter = Presenter::new(device, format);

        self.code_raster = code_panel::load_system_font()
            .map(|font| CodeRaster::new(font, code_panel::FONT_SIZE));
        if self.code_raster.is_none() {
            log::warn!("no usable system font found; the code panel stays blank");
        }

        self.ready = Some(Ready {
            viewport,
            presenter,
            resolution,
        });
        Ok(())
    }

    fn on_window_event(&mut self, _window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::ModifiersChanged(m) => self.modifiers = m.state(),

            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return AppControl::Continue;
                };
                match controls::action_for(code, self.modifiers) {
                    Some(Action::Quit) => return AppControl::Exit,
                    Some(action) => self.actions.push(action),
                    None => {}
                }
            }

            _ => {}
        }

        AppControl::Continue
    }

    fn apply_pending(&mut self, ctx: &mut FrameCtx<'_, '_>) {
        let Some(ready) = self.ready.as_mut() else { return };

        ready.viewport.apply_pending_resize(ctx.device());
        ready.viewport.prepare_frame(ctx.queue(), ctx.time.elapsed);
    }

    fn layout(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(ready) = self.ready.as_mut() else {
            return AppControl::Continue;
        };
        let viewport = &mut ready.viewport;

        let panels = self.layout.panels(ctx.surface_size());
        if let Err(err) = viewport.observe_panel_width(panels.output.width) {
            log::warn!("viewport resize rejected: {err}");
        }

        for action in self.actions.drain(..) {
            let result = match action {
                Action::Run => {
                    match self.editor.reload() {
                        Ok(true) => {
                            log::info!(
                                "editor buffer reloaded ({} bytes)",
                                self.editor.visible_code().len()
                            );
                            self.code_dirty = true;
                        }
                        Ok(false) => {}
                        Err(err) => log::warn!("{err}; compiling the previous buffer"),
                    }
                    if let Err(err) = viewport.run(ctx.device(), &self.editor.combined_code()) {
                        log::error!("shader not applied, keeping the previous pipeline: {err}");
                    }
                    Ok(None)
                }
                Action::ToggleMode => {
                    let mode = match viewport.mode() {
                        DisplayMode::AspectRatio => DisplayMode::Resolution,
                        DisplayMode::Resolution => DisplayMode::AspectRatio,
                    };
                    log::info!("display mode: {mode:?}");
                    viewport.set_mode(mode)
                }
                Action::Preset(preset) => {
                    log::info!("aspect preset: {preset}");
                    viewport.set_ratio_preset(preset)
                }
                Action::Resolution { dx, dy } => {
                    if viewport.mode() != DisplayMode::Resolution {
                        log::debug!("resolution input ignored outside resolution mode");
                        Ok(None)
                    } else if ready.resolution.step(dx, dy) {
                        let value = ready.resolution.value();
                        viewport.request_resolution(value.width, value.height)
                    } else {
                        Ok(None)
                    }
                }
                Action::Quit => return AppControl::Exit,
            };

            if let Err(err) = result {
                log::warn!("viewport request rejected: {err}");
            }
        }

        self.image = layout::image_rect(panels.output, viewport.current_inverse_ratio());

        let rect = panels.editor;
        if self.code_dirty || rect != self.code_rect {
            if let (Some(raster), false) = (self.code_raster.as_mut(), rect.is_empty()) {
                let pixels = raster.compose(self.editor.visible_code(), rect.width, rect.height);
                ready
                    .presenter
                    .upload_code(ctx.device(), ctx.queue(), (rect.width, rect.height), &pixels);
            }
            self.code_rect = rect;
            self.code_dirty = false;
        }

        let title = status_title(&self.editor, viewport);
        if title != self.title {
            ctx.runtime.set_title(title.clone());
            self.title = title;
        }

        AppControl::Continue
    }

    fn record(&mut self, ctx: &FrameCtx<'_, '_>, frame: &mut FrameTarget) {
        let Some(ready) = self.ready.as_mut() else { return };

        ready.viewport.record(&mut frame.encoder);
        ready.presenter.record(
            ctx.device(),
            &mut frame.encoder,
            &frame.surface_view,
            self.code_rect,
            self.image,
            &ready.viewport,
        );
    }
}

fn status_title(editor: &Editor, viewport: &Viewport) -> String {
    let extent = viewport.extent();
    let mode = match viewport.mode() {
        DisplayMode::AspectRatio => viewport.preset().to_string(),
        DisplayMode::Resolution => "fixed".to_string(),
    };
    let source = editor
        .path()
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "default".to_string());

    format!(
        "glint | {source} | {mode} | {}x{}",
        extent.width, extent.height
    )
}
