use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{Mesh, Scene, Vertex};

/// Depth buffer format used by the cube pass.
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Color the frame clears to before the cube is drawn.
const CLEAR_COLOR: Color = Color::BLACK;

/// Cube renderer (single flat-colored mesh).
///
/// GPU resources are created lazily on first use and keyed to the surface
/// format and viewport size, so a surface reconfigure rebuilds exactly what it
/// invalidated. [`release`](Self::release) drops everything; the driver calls
/// it on teardown.
#[derive(Default)]
pub struct CubeRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    mesh_ubo: Option<wgpu::Buffer>,

    mesh_vbo: Option<wgpu::Buffer>,
    mesh_ibo: Option<wgpu::Buffer>,
    index_count: u32,

    target_size: Option<(u32, u32)>,
    msaa_view: Option<wgpu::TextureView>,
    depth_view: Option<wgpu::TextureView>,

    warned_extra_meshes: bool,
}

impl CubeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any GPU resource is held.
    pub fn has_resources(&self) -> bool {
        self.pipeline.is_some() || self.mesh_vbo.is_some() || self.depth_view.is_some()
    }

    /// Drops every GPU resource; the next `render` recreates them.
    pub fn release(&mut self) {
        *self = Self {
            warned_extra_meshes: self.warned_extra_meshes,
            ..Self::default()
        };
    }

    /// Renders `scene` into `target` through `camera`.
    ///
    /// Supported:
    /// - a single mesh (the driver builds exactly one)
    ///
    /// Additional meshes are ignored (one-time debug message). Zero-size
    /// contexts are refused: targets sized from them could not match the
    /// surface the pass resolves into.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &Scene,
        camera: &Camera,
    ) {
        if ctx.size.width == 0 || ctx.size.height == 0 {
            return;
        }
        let Some(mesh) = scene.meshes().first() else {
            return;
        };
        if scene.meshes().len() > 1 && !self.warned_extra_meshes {
            log::debug!("CubeRenderer: multiple meshes in scene; drawing the first only");
            self.warned_extra_meshes = true;
        }

        self.ensure_pipeline(ctx);
        self.ensure_mesh_buffers(ctx, mesh);
        self.ensure_bindings(ctx);
        self.ensure_targets(ctx);

        // Per-frame uniform: premultiplied camera * model, plus material color.
        let mvp = camera.view_projection() * mesh.model_matrix();
        let u = MeshUniform {
            mvp: mvp.to_cols_array_2d(),
            color: mesh.material().color.to_array(),
        };
        if let Some(ubo) = self.mesh_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vbo) = self.mesh_vbo.as_ref() else { return };
        let Some(ibo) = self.mesh_ibo.as_ref() else { return };
        let Some(depth_view) = self.depth_view.as_ref() else { return };

        // With MSAA on, draw into the multisampled target and resolve into the
        // surface view; with sample count 1 draw straight to the surface.
        let (view, resolve_target) = match self.msaa_view.as_ref() {
            Some(msaa) => (msaa, Some(target.color_view)),
            None => (target.color_view, None),
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tumble cube pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/cube.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tumble cube shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("tumble cube bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(
                                std::num::NonZeroU64::new(
                                    std::mem::size_of::<MeshUniform>() as u64,
                                )
                                .unwrap(),
                            ),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("tumble cube pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    // Newer wgpu uses immediate constants; keep disabled for now.
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tumble cube pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),

            multisample: wgpu::MultisampleState {
                count: ctx.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },

            // Newer wgpu field names:
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.mesh_ubo = None;

        // A format change invalidates the MSAA target as well.
        self.target_size = None;
        self.msaa_view = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.mesh_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let mesh_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tumble cube ubo"),
            size: std::mem::size_of::<MeshUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tumble cube bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mesh_ubo.as_entire_binding(),
            }],
        });

        self.mesh_ubo = Some(mesh_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_mesh_buffers(&mut self, ctx: &RenderCtx<'_>, mesh: &Mesh) {
        if self.mesh_vbo.is_some() && self.mesh_ibo.is_some() {
            return;
        }

        self.mesh_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tumble cube vbo"),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.mesh_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tumble cube ibo"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        }));

        self.index_count = mesh.index_count();
    }

    fn ensure_targets(&mut self, ctx: &RenderCtx<'_>) {
        // `render` rejects zero-size contexts before reaching this point.
        let size = (ctx.size.width, ctx.size.height);
        if self.target_size == Some(size)
            && self.depth_view.is_some()
            && (ctx.sample_count == 1 || self.msaa_view.is_some())
        {
            return;
        }

        let extent = wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        };

        self.depth_view = Some(make_target_view(ctx, extent, DEPTH_FORMAT, "tumble cube depth"));
        self.msaa_view = (ctx.sample_count > 1)
            .then(|| make_target_view(ctx, extent, ctx.surface_format, "tumble cube msaa"));
        self.target_size = Some(size);
    }
}

fn make_target_view(
    ctx: &RenderCtx<'_>,
    size: wgpu::Extent3d,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::TextureView {
    ctx.device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: ctx.sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

/// Uniform block shared by both shader stages.
///
/// Layout must match `MeshUniform` in `shaders/cube.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshUniform {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
}
