use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::render::{RenderCtx, RenderTarget};

/// Fixed-function state for a [`MeshRenderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MeshStyle {
    /// Drop triangles whose counter-clockwise front faces away from the camera.
    pub cull_back_faces: bool,
    /// Straight-alpha blending instead of overwrite.
    pub alpha_blend: bool,
}

impl MeshStyle {
    /// Closed, opaque geometry.
    pub const OPAQUE: Self = Self { cull_back_faces: true, alpha_blend: false };

    /// Open or translucent geometry seen from both sides.
    pub const TWO_SIDED_BLENDED: Self = Self { cull_back_faces: false, alpha_blend: true };

    /// Open, opaque geometry seen from both sides.
    pub const TWO_SIDED: Self = Self { cull_back_faces: false, alpha_blend: false };
}

impl Default for MeshStyle {
    fn default() -> Self {
        Self::OPAQUE
    }
}

/// Borrowed triangle-list data for one draw.
///
/// `positions` and `colors` are parallel arrays; every three entries form a
/// triangle.
#[derive(Debug, Copy, Clone)]
pub struct Mesh<'a> {
    pub positions: &'a [[f32; 3]],
    pub colors: &'a [[f32; 4]],
}

impl<'a> Mesh<'a> {
    #[inline]
    pub fn new(positions: &'a [[f32; 3]], colors: &'a [[f32; 4]]) -> Self {
        Self { positions, colors }
    }

    /// Number of vertices that can be drawn (whole triangles only).
    #[inline]
    pub fn drawable_vertices(&self) -> usize {
        let n = self.positions.len().min(self.colors.len());
        n - n % 3
    }
}

/// Flat-colored triangle-list renderer.
///
/// Positions and colors live in two vertex buffers (slots 0 and 1) that grow
/// to the next power of two when the mesh outgrows them. The MVP matrix is a
/// uniform written before each draw.
///
/// Vertex data is re-uploaded when the vertex count changes or after
/// [`MeshRenderer::invalidate`]. Callers that edit vertices in place must
/// invalidate; the flag survives frames that are skipped before drawing.
pub struct MeshRenderer {
    style: MeshStyle,

    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    transform_ubo: Option<wgpu::Buffer>,

    position_vbo: Option<wgpu::Buffer>,
    color_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    upload: UploadState,

    warned_mismatch: bool,
}

/// Attachment layout a pipeline was built for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct PipelineKey {
    color: wgpu::TextureFormat,
    depth: Option<wgpu::TextureFormat>,
    samples: u32,
}

impl PipelineKey {
    fn of(ctx: &RenderCtx<'_>) -> Self {
        Self {
            color: ctx.surface_format,
            depth: ctx.depth_format,
            samples: ctx.sample_count,
        }
    }
}

/// Tracks whether the vertex buffers hold the caller's current data.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
struct UploadState {
    /// Vertex count of the last upload; `None` before the first one and after
    /// the buffers are regrown.
    uploaded: Option<usize>,
    stale: bool,
}

impl UploadState {
    fn needs_upload(&self, count: usize) -> bool {
        self.stale || self.uploaded != Some(count)
    }

    fn invalidate(&mut self) {
        self.stale = true;
    }

    fn mark_uploaded(&mut self, count: usize) {
        self.uploaded = Some(count);
        self.stale = false;
    }

    fn forget(&mut self) {
        self.uploaded = None;
    }
}

impl MeshRenderer {
    pub fn new(style: MeshStyle) -> Self {
        Self {
            style,
            pipeline_key: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            transform_ubo: None,
            position_vbo: None,
            color_vbo: None,
            vertex_capacity: 0,
            upload: UploadState::default(),
            warned_mismatch: false,
        }
    }

    /// Forces the next [`render`](Self::render) that reaches the GPU to
    /// re-upload vertex data.
    pub fn invalidate(&mut self) {
        self.upload.invalidate();
    }

    /// Uploads `mesh` if needed and draws it with `mvp`.
    ///
    /// Color and depth are loaded, not cleared; `FrameCtx::render` clears both
    /// before handing out the target.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        mvp: Mat4,
        mesh: &Mesh<'_>,
    ) {
        if mesh.positions.len() != mesh.colors.len() && !self.warned_mismatch {
            log::warn!(
                "MeshRenderer: {} positions vs {} colors; drawing the common prefix",
                mesh.positions.len(),
                mesh.colors.len()
            );
            self.warned_mismatch = true;
        }

        let count = mesh.drawable_vertices();
        if count == 0 {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.write_transform(ctx, mvp);

        if self.upload.needs_upload(count) || self.position_vbo.is_none() {
            self.ensure_vertex_capacity(ctx, count);
            let (Some(pos_vbo), Some(col_vbo)) = (self.position_vbo.as_ref(), self.color_vbo.as_ref())
            else {
                return;
            };
            ctx.queue
                .write_buffer(pos_vbo, 0, bytemuck::cast_slice(&mesh.positions[..count]));
            ctx.queue
                .write_buffer(col_vbo, 0, bytemuck::cast_slice(&mesh.colors[..count]));
            self.upload.mark_uploaded(count);
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(pos_vbo) = self.position_vbo.as_ref() else { return };
        let Some(col_vbo) = self.color_vbo.as_ref() else { return };

        let depth_stencil_attachment =
            target
                .depth_view
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gochi mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: target.resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let bytes = |n: usize, stride: usize| (n * stride) as u64;

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, pos_vbo.slice(..bytes(count, POSITION_STRIDE)));
        rpass.set_vertex_buffer(1, col_vbo.slice(..bytes(count, COLOR_STRIDE)));
        rpass.draw(0..count as u32, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let key = PipelineKey::of(ctx);
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gochi mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("gochi mesh bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<TransformUniform>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("gochi mesh pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let depth_stencil = ctx.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gochi mesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[position_layout(), color_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: self.style.alpha_blend.then_some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: self.style.cull_back_faces.then_some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil,
            multisample: wgpu::MultisampleState {
                count: key.samples,
                ..Default::default()
            },
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "mesh pipeline built for {:?} / depth {:?} / {}x",
            key.color,
            key.depth,
            key.samples
        );

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.transform_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.transform_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let transform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gochi mesh transform ubo"),
            size: std::mem::size_of::<TransformUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gochi mesh bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_ubo.as_entire_binding(),
            }],
        });

        self.transform_ubo = Some(transform_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_transform(&mut self, ctx: &RenderCtx<'_>, mvp: Mat4) {
        let Some(ubo) = self.transform_ubo.as_ref() else { return };
        let u = TransformUniform { mvp };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required_vertices: usize) {
        if required_vertices <= self.vertex_capacity && self.position_vbo.is_some() {
            return;
        }

        let new_cap = grown_capacity(required_vertices);
        let make = |label: &'static str, stride: usize| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: (new_cap * stride) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        self.position_vbo = Some(make("gochi mesh position vbo", POSITION_STRIDE));
        self.color_vbo = Some(make("gochi mesh color vbo", COLOR_STRIDE));
        self.vertex_capacity = new_cap;
        self.upload.forget();

        log::debug!("mesh vertex buffers grown to {new_cap} vertices");
    }
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self::new(MeshStyle::default())
    }
}

const POSITION_STRIDE: usize = std::mem::size_of::<[f32; 3]>();
const COLOR_STRIDE: usize = std::mem::size_of::<[f32; 4]>();

/// Vertex-buffer capacity for `required` vertices: next power of two, at least 256.
fn grown_capacity(required: usize) -> usize {
    required.next_power_of_two().max(256)
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TransformUniform {
    mvp: Mat4,
}

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: POSITION_STRIDE as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

fn color_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];
    wgpu::VertexBufferLayout {
        array_stride: COLOR_STRIDE as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Mesh ──────────────────────────────────────────────────────────────

    #[test]
    fn drawable_vertices_truncates_to_triangles() {
        let p = [[0.0; 3]; 7];
        let c = [[0.0; 4]; 7];
        assert_eq!(Mesh::new(&p, &c).drawable_vertices(), 6);
    }

    #[test]
    fn drawable_vertices_uses_shorter_array() {
        let p = [[0.0; 3]; 9];
        let c = [[0.0; 4]; 6];
        assert_eq!(Mesh::new(&p, &c).drawable_vertices(), 6);
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn capacity_has_floor_and_rounds_up() {
        assert_eq!(grown_capacity(3), 256);
        assert_eq!(grown_capacity(257), 512);
        assert_eq!(grown_capacity(1024), 1024);
    }

    #[test]
    fn uniform_is_one_mat4() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 64);
    }

    #[test]
    fn uniform_bytes_are_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let u = TransformUniform { mvp: m };
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(floats, &m.to_cols_array()[..]);
        assert_eq!(&floats[12..15], &[1.0, 2.0, 3.0]);
    }

    // ── upload tracking ───────────────────────────────────────────────────

    #[test]
    fn first_draw_uploads() {
        assert!(UploadState::default().needs_upload(6));
    }

    #[test]
    fn same_count_skips_upload_until_invalidated() {
        let mut u = UploadState::default();
        u.mark_uploaded(6);
        assert!(!u.needs_upload(6));
        assert!(u.needs_upload(9));

        u.invalidate();
        assert!(u.needs_upload(6));
        u.mark_uploaded(6);
        assert!(!u.needs_upload(6));
    }

    #[test]
    fn invalidation_survives_skipped_frames() {
        let mut u = UploadState::default();
        u.mark_uploaded(6);
        u.invalidate();
        // Frames that never reach the GPU leave the state alone.
        for _ in 0..3 {
            assert!(u.needs_upload(6));
        }
    }

    #[test]
    fn regrown_buffers_force_upload() {
        let mut u = UploadState::default();
        u.mark_uploaded(6);
        u.forget();
        assert!(u.needs_upload(6));
    }

    // ── pipeline key ──────────────────────────────────────────────────────

    #[test]
    fn sample_count_distinguishes_pipelines() {
        let base = PipelineKey {
            color: wgpu::TextureFormat::Bgra8Unorm,
            depth: Some(wgpu::TextureFormat::Depth32Float),
            samples: 4,
        };
        assert_ne!(base, PipelineKey { samples: 1, ..base });
        assert_eq!(base, PipelineKey { ..base });
    }
}
