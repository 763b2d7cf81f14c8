use glint_engine::viewport::Viewport;

use crate::layout::PixelRect;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.08,
    b: 0.09,
    a: 1.0,
};

/// CPU-composed image shown in the editor panel.
struct PanelImage {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Draws the studio frame: background, the code panel and the viewport image.
///
/// The bind group references the viewport's current view and is rebuilt
/// whenever the viewport recreates its texture.
pub struct Presenter {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    bind_group: Option<wgpu::BindGroup>,
    /// Viewport texture generation the bind group was built for.
    bound_generation: Option<u64>,

    code: Option<PanelImage>,
}

impl Presenter {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glint present shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/present.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint present bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glint present pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glint present pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glint present sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            pipeline,
            bind_group_layout,
            sampler,
            bind_group: None,
            bound_generation: None,
            code: None,
        }
    }

    /// Uploads RGBA8 `pixels` as the code panel image, recreating the texture
    /// when the size changed.
    pub fn upload_code(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        (width, height): (u32, u32),
        pixels: &[u8],
    ) {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let reuse = self
            .code
            .as_ref()
            .is_some_and(|image| image.texture.size() == size);
        if !reuse {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("glint code texture"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let bind_group = sampled_bind_group(
                device,
                "glint code bind group",
                &self.bind_group_layout,
                &view,
                &self.sampler,
            );
            self.code = Some(PanelImage {
                texture,
                bind_group,
            });
        }

        let Some(image) = self.code.as_ref() else { return };
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &image.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );
    }


    fn ensure_bind_group(&mut self, device: &wgpu::Device, viewport: &Viewport) {
        let generation = viewport.texture_generation();
        if self.bound_generation == Some(generation) && self.bind_group.is_some() {
            return;
        }

        self.bind_group = Some(sampled_bind_group(
            device,
            "glint present bind group",
            &self.bind_group_layout,
            viewport.view(),
            &self.sampler,
        ));
        self.bound_generation = Some(generation);
    }

    /// Clears the surface, draws the uploaded code image into `code` and, if
    /// `image` is set, the viewport texture into that rectangle.
    pub fn record(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        code: PixelRect,
        image: Option<PixelRect>,
        viewport: &Viewport,
    ) {
        self.ensure_bind_group(device, viewport);

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glint present pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND),
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

        // A stale-sized code image is skipped until the next upload.
        if let Some(panel) = self.code.as_ref() {
            let size = panel.texture.size();
            if !code.is_empty() && (size.width, size.height) == (code.width, code.height) {
                draw_into(&mut rpass, &panel.bind_group, code);
            }
        }

        if let (Some(rect), Some(bind_group)) = (image, self.bind_group.as_ref()) {
            draw_into(&mut rpass, bind_group, rect);
        }
    }
}

fn draw_into(rpass: &mut wgpu::RenderPass<'_>, bind_group: &wgpu::BindGroup, rect: PixelRect) {
    rpass.set_bind_group(0, bind_group, &[]);
    rpass.set_viewport(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
        0.0,
        1.0,
    );
    rpass.draw(0..6, 0..1);
}

fn sampled_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
