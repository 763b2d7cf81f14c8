use crate::shader::{self, ENTRY_POINT, WgslSource};

use super::sizing::check_extent;
use super::{
    AspectPreset, DisplayMode, Extent, ViewportConfig, ViewportError, ViewportSizing,
    ViewportUniforms,
};

const VERTEX_SOURCE: &str = include_str!("shaders/viewport.vert.wgsl");

/// Declarations every fragment stage is compiled against: `VertexOutput`,
/// `Uniforms` and the uniform binding `u`.
pub const FRAGMENT_PRELUDE: &str = include_str!("shaders/prelude.wgsl");

const FRAGMENT_LABEL: &str = "viewport fragment";

/// Whether the bound pipeline reflects the staged fragment stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Current,
    /// A fragment stage was staged but the pipeline has not been rebuilt.
    Stale,
}

/// Offscreen render target drawn by a user-supplied fragment stage.
///
/// Resizes are two-phase: [`set_pending_resize`](Self::set_pending_resize)
/// only records the request, [`apply_pending_resize`](Self::apply_pending_resize)
/// recreates the texture at a point where no encoded commands reference it.
/// Pipeline rebuilds only happen through
/// [`update_render_pipeline`](Self::update_render_pipeline).
pub struct Viewport {
    sizing: ViewportSizing,
    format: wgpu::TextureFormat,
    clear_color: wgpu::Color,

    texture: wgpu::Texture,
    view: wgpu::TextureView,
    texture_generation: u64,

    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline_layout: wgpu::PipelineLayout,

    vertex_module: wgpu::ShaderModule,
    /// Compiled fragment stage waiting for the next rebuild.
    staged_fragment: Option<wgpu::ShaderModule>,

    pipeline: wgpu::RenderPipeline,
    pipeline_generation: u64,
}

impl Viewport {
    /// Creates the viewport and its initial texture and pipeline.
    ///
    /// `panel_width` is the width of the hosting panel; the initial height
    /// follows the configured preset. `fragment_code` is complete WGSL
    /// (prelude included).
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        config: &ViewportConfig,
        panel_width: u32,
        fragment_code: &str,
    ) -> Result<Self, ViewportError> {
        let max = device.limits().max_texture_dimension_2d;
        let sizing = ViewportSizing::new(config, panel_width, max)?;

        let vertex_module = shader::shader_module_from_wgsl(
            device,
            WgslSource::Code(VERTEX_SOURCE),
            "viewport vertex",
        )?;
        let fragment_module = compile_fragment(device, fragment_code)?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(ViewportUniforms::SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glint viewport pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glint viewport ubo"),
            size: ViewportUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glint viewport bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline = create_checked(device, "render pipeline", || {
            create_pipeline(
                device,
                &pipeline_layout,
                &vertex_module,
                &fragment_module,
                format,
            )
        })?;

        let extent = sizing.current();
        let (texture, view) = create_target(device, format, extent);
        log::info!(
            "viewport created: {}x{} {:?} ({:?}, {})",
            extent.width,
            extent.height,
            format,
            sizing.mode(),
            sizing.preset()
        );

        Ok(Self {
            sizing,
            format,
            clear_color: config.clear_color,
            texture,
            view,
            texture_generation: 0,
            uniform_buffer,
            bind_group,
            pipeline_layout,
            vertex_module,
            staged_fragment: None,
            pipeline,
            pipeline_generation: 0,
        })
    }

    // ── fragment stage / pipeline ─────────────────────────────────────────

    /// Validates and compiles `code`, then stages it as the fragment stage.
    ///
    /// The bound pipeline is untouched until
    /// [`update_render_pipeline`](Self::update_render_pipeline). On error
    /// nothing is staged and an earlier staged stage is kept.
    pub fn set_fragment_state(
        &mut self,
        device: &wgpu::Device,
        code: &str,
    ) -> Result<(), ViewportError> {
        self.staged_fragment = Some(compile_fragment(device, code)?);
        log::debug!("fragment stage staged ({} bytes)", code.len());
        Ok(())
    }

    /// Rebuilds the pipeline from the staged fragment stage.
    ///
    /// Returns `Ok(false)` when nothing is staged. A pipeline the device
    /// rejects is discarded together with the staged stage; the previous
    /// pipeline stays bound.
    pub fn update_render_pipeline(&mut self, device: &wgpu::Device) -> Result<bool, ViewportError> {
        let Some(fragment) = self.staged_fragment.take() else {
            return Ok(false);
        };

        let pipeline = create_checked(device, "render pipeline", || {
            create_pipeline(
                device,
                &self.pipeline_layout,
                &self.vertex_module,
                &fragment,
                self.format,
            )
        })?;
        self.pipeline = pipeline;
        self.pipeline_generation += 1;
        log::info!("viewport pipeline rebuilt (#{})", self.pipeline_generation);
        Ok(true)
    }

    /// Stages `code` and rebuilds the pipeline in one step.
    ///
    /// On error the previous pipeline stays bound.
    pub fn run(&mut self, device: &wgpu::Device, code: &str) -> Result<(), ViewportError> {
        self.set_fragment_state(device, code)?;
        self.update_render_pipeline(device)?;
        Ok(())
    }

    pub fn pipeline_state(&self) -> PipelineState {
        if self.staged_fragment.is_some() {
            PipelineState::Stale
        } else {
            PipelineState::Current
        }
    }

    /// Incremented on every pipeline rebuild.
    pub fn pipeline_generation(&self) -> u64 {
        self.pipeline_generation
    }

    // ── sizing ────────────────────────────────────────────────────────────

    /// Records a resize; see [`ViewportSizing::set_pending_resize`].
    pub fn set_pending_resize(
        &mut self,
        width: u32,
        height: Option<u32>,
    ) -> Result<Option<Extent>, ViewportError> {
        self.sizing.set_pending_resize(width, height)
    }

    pub fn observe_panel_width(&mut self, width: u32) -> Result<Option<Extent>, ViewportError> {
        self.sizing.observe_panel_width(width)
    }

    pub fn request_resolution(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Option<Extent>, ViewportError> {
        self.sizing.request_resolution(width, height)
    }

    pub fn set_mode(&mut self, mode: DisplayMode) -> Result<Option<Extent>, ViewportError> {
        self.sizing.set_mode(mode)
    }

    pub fn set_ratio_preset(
        &mut self,
        preset: AspectPreset,
    ) -> Result<Option<Extent>, ViewportError> {
        self.sizing.set_ratio_preset(preset)
    }

    /// Recreates the texture and view if a resize is pending.
    ///
    /// Call once per frame, before the layout pass and with no encoded
    /// commands referencing the current view. Returns whether anything was
    /// recreated.
    pub fn apply_pending_resize(&mut self, device: &wgpu::Device) -> bool {
        let Some(extent) = self.sizing.take_pending() else {
            return false;
        };

        // Requests are checked on entry; the device limit cannot shrink.
        if let Err(err) = check_extent(extent, self.sizing.max_dimension()) {
            log::warn!("dropping pending viewport resize: {err}");
            return false;
        }

        let (texture, view) = create_target(device, self.format, extent);
        self.texture = texture;
        self.view = view;
        self.texture_generation += 1;
        self.sizing.commit(extent);

        log::debug!(
            "viewport resized to {}x{} (#{})",
            extent.width,
            extent.height,
            self.texture_generation
        );
        true
    }

    pub fn sizing(&self) -> &ViewportSizing {
        &self.sizing
    }

    pub fn mode(&self) -> DisplayMode {
        self.sizing.mode()
    }

    pub fn preset(&self) -> AspectPreset {
        self.sizing.preset()
    }

    pub fn extent(&self) -> Extent {
        self.sizing.current()
    }

    pub fn current_inverse_ratio(&self) -> f32 {
        self.sizing.current_inverse_ratio()
    }

    // ── target ────────────────────────────────────────────────────────────

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Incremented every time the texture and view are replaced.
    pub fn texture_generation(&self) -> u64 {
        self.texture_generation
    }

    // ── per frame ─────────────────────────────────────────────────────────

    /// Uploads the uniforms for the coming draw.
    pub fn prepare_frame(&self, queue: &wgpu::Queue, time: f32) {
        let uniforms = ViewportUniforms::new(time, self.sizing.current());
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Encodes the viewport pass into `encoder`. Does not submit.
    pub fn record(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glint viewport pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.draw(0..6, 0..1);
    }
}

/// Naga checks first, then module creation under a validation scope.
fn compile_fragment(device: &wgpu::Device, code: &str) -> Result<wgpu::ShaderModule, ViewportError> {
    shader::validate_fragment(code, FRAGMENT_LABEL)?;
    create_checked(device, "fragment module", || {
        shader::shader_module_from_wgsl(device, WgslSource::Code(code), FRAGMENT_LABEL)
    })?
    .map_err(ViewportError::from)
}

/// Runs `create` inside a validation error scope.
///
/// wgpu hands back an object even when it rejects the descriptor; the scope
/// turns that rejection into an error here instead of a deferred uncaptured
/// error on the next frame.
fn create_checked<T>(
    device: &wgpu::Device,
    what: &'static str,
    create: impl FnOnce() -> T,
) -> Result<T, ViewportError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(scope.pop()) {
        None => Ok(value),
        Some(error) => {
            log::debug!("{what} rejected by the device");
            Err(ViewportError::Rejected {
                what,
                message: error.to_string(),
            })
        }
    }
}

fn create_target(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    extent: Extent,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("glint viewport texture"),
        size: wgpu::Extent3d {
            width: extent.width,
            height: extent.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("glint viewport pipeline"),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: Some(ENTRY_POINT),
            compilation_options: Default::default(),
            buffers: &[],
        },

        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: Some(ENTRY_POINT),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
