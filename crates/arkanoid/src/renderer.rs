use std::ops::Range;

use anyhow::{bail, Context, Result};
use arkanoid_engine::render::{RenderCtx, RenderTarget};
use glam::Mat4;
use winit::dpi::PhysicalSize;

use crate::model::Model;
use crate::shader::{Shader, ShaderInterface, ATTRIBUTE_STREAMS};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const FLOATS_PER_VERTEX: usize = 4;
const MAT4_BYTES: u32 = 64;

/// The three matrices uploaded for one draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrices {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
}

/// Everything needed to draw one model instance.
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub matrices: Matrices,
    pub vertices: &'static [f32],
    pub colors: &'static [f32],
    pub normals: &'static [f32],
    pub vertex_count: u32,
}

impl DrawCall {
    /// Snapshots `model`'s current transform together with the camera
    /// matrices.
    pub fn for_model(model: &dyn Model, projection: Mat4, view: Mat4) -> Self {
        Self {
            matrices: Matrices {
                projection,
                view,
                model: model.transform(),
            },
            vertices: model.vertices(),
            colors: model.colors(),
            normals: model.normals(),
            vertex_count: model.vertex_count(),
        }
    }
}

/// Byte offsets of `P`, `V` and `M` inside the matrix uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLayout {
    pub projection: u32,
    pub view: u32,
    pub model: u32,
    pub block_size: u32,
}

impl UniformLayout {
    pub fn from_interface(interface: &ShaderInterface) -> Result<Self> {
        let offset = |name: &str| -> Result<u32> {
            let loc = interface
                .uniform_location(name)
                .with_context(|| format!("shader has no `{name}` uniform"))?;
            Ok(loc.offset)
        };

        let layout = Self {
            projection: offset("P")?,
            view: offset("V")?,
            model: offset("M")?,
            block_size: interface
                .block_size(0, 0)
                .context("shader has no uniform block at @group(0) @binding(0)")?,
        };

        for o in [layout.projection, layout.view, layout.model] {
            if o + MAT4_BYTES > layout.block_size {
                bail!("matrix at offset {o} overruns a {}-byte block", layout.block_size);
            }
        }
        Ok(layout)
    }
}

/// Rounds `block_size` up to the device's dynamic offset alignment.
pub fn uniform_stride(block_size: u64, alignment: u32) -> u64 {
    let alignment = u64::from(alignment.max(1));
    block_size.div_ceil(alignment) * alignment
}

/// Lays out one matrix block per draw call, `stride` bytes apart.
///
/// Matrices are written column-major, the layout WGSL expects.
pub fn pack_uniforms(layout: &UniformLayout, calls: &[DrawCall], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; stride * calls.len()];

    for (i, call) in calls.iter().enumerate() {
        let block = &mut bytes[i * stride..(i + 1) * stride];
        let m = &call.matrices;
        for (offset, matrix) in [
            (layout.projection, m.projection),
            (layout.view, m.view),
            (layout.model, m.model),
        ] {
            let cols = matrix.to_cols_array();
            let src: &[u8] = bytemuck::cast_slice(&cols);
            let at = offset as usize;
            block[at..at + src.len()].copy_from_slice(src);
        }
    }

    bytes
}

/// Attribute streams for a whole frame, concatenated per attribute.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Streams {
    pub vertices: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Vec<f32>,
    /// Vertex range of each draw call inside the streams.
    pub ranges: Vec<Range<u32>>,
}

impl Streams {
    pub fn pack(calls: &[DrawCall]) -> Self {
        let mut out = Self::default();
        let mut first = 0u32;

        for call in calls {
            let floats = call.vertex_count as usize * FLOATS_PER_VERTEX;
            out.vertices.extend_from_slice(&call.vertices[..floats]);
            out.colors.extend_from_slice(&call.colors[..floats]);
            out.normals.extend_from_slice(&call.normals[..floats]);
            out.ranges.push(first..first + call.vertex_count);
            first += call.vertex_count;
        }

        out
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    fn by_slot(&self) -> [&[f32]; ATTRIBUTE_STREAMS.len()] {
        [self.vertices.as_slice(), self.colors.as_slice(), self.normals.as_slice()]
    }
}

/// Draws a list of models with one shader program.
///
/// Each frame clears color and depth, then issues one non-indexed triangle
/// draw per call, in call order. The renderer owns the depth target and the
/// per-frame uniform and vertex buffers; all are grown or recreated lazily.
pub struct ModelRenderer {
    layout: UniformLayout,

    depth_size: Option<PhysicalSize<u32>>,
    depth_view: Option<wgpu::TextureView>,

    uniform_ubo: Option<wgpu::Buffer>,
    uniform_capacity: usize,
    uniform_stride: u64,
    bind_group: Option<wgpu::BindGroup>,

    stream_vbos: [Option<wgpu::Buffer>; ATTRIBUTE_STREAMS.len()],
    stream_capacity: usize,
}

impl ModelRenderer {
    /// Creates a renderer for programs exposing `interface`.
    pub fn new(interface: &ShaderInterface) -> Result<Self> {
        Ok(Self {
            layout: UniformLayout::from_interface(interface)?,
            depth_size: None,
            depth_view: None,
            uniform_ubo: None,
            uniform_capacity: 0,
            uniform_stride: 0,
            bind_group: None,
            stream_vbos: [None, None, None],
            stream_capacity: 0,
        })
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        shader: &Shader,
        calls: &[DrawCall],
    ) {
        self.ensure_depth(ctx);
        self.ensure_uniforms(ctx, shader, calls.len());

        let streams = Streams::pack(calls);
        self.ensure_streams(ctx, streams.vertex_count());

        if let Some(ubo) = self.uniform_ubo.as_ref() {
            if !calls.is_empty() {
                let bytes = pack_uniforms(&self.layout, calls, self.uniform_stride);
                ctx.queue.write_buffer(ubo, 0, &bytes);
            }
        }
        for (vbo, data) in self.stream_vbos.iter().zip(streams.by_slot()) {
            if let (Some(vbo), false) = (vbo, data.is_empty()) {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(data));
            }
        }

        let Some(depth_view) = self.depth_view.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("arkanoid model pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(target.clear),
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

        if calls.is_empty() {
            return;
        }

        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let [Some(vertex_vbo), Some(color_vbo), Some(normal_vbo)] = &self.stream_vbos else {
            return;
        };

        shader.activate(&mut rpass);

        for (i, range) in streams.ranges.iter().enumerate() {
            let offset = (i as u64 * self.uniform_stride) as u32;
            rpass.set_bind_group(0, bind_group, &[offset]);

            let bytes = stream_bytes(range);
            rpass.set_vertex_buffer(0, vertex_vbo.slice(bytes.clone()));
            rpass.set_vertex_buffer(1, color_vbo.slice(bytes.clone()));
            rpass.set_vertex_buffer(2, normal_vbo.slice(bytes));

            rpass.draw(0..range.end - range.start, 0..1);
        }
    }

    fn ensure_depth(&mut self, ctx: &RenderCtx<'_>) {
        if self.depth_size == Some(ctx.size) && self.depth_view.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("arkanoid depth"),
            size: wgpu::Extent3d {
                width: ctx.size.width.max(1),
                height: ctx.size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        self.depth_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.depth_size = Some(ctx.size);
    }

    fn ensure_uniforms(&mut self, ctx: &RenderCtx<'_>, shader: &Shader, draws: usize) {
        if draws <= self.uniform_capacity && self.uniform_ubo.is_some() {
            return;
        }

        let alignment = ctx.device.limits().min_uniform_buffer_offset_alignment;
        let stride = uniform_stride(u64::from(self.layout.block_size), alignment);
        let capacity = draws.next_power_of_two().max(8);

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("arkanoid matrices ubo"),
            size: capacity as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("arkanoid matrices bind group"),
            layout: shader.bind_group_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(u64::from(self.layout.block_size)),
                }),
            }],
        });

        log::debug!("matrix buffer grown to {capacity} draws ({stride} bytes each)");

        self.uniform_ubo = Some(ubo);
        self.uniform_capacity = capacity;
        self.uniform_stride = stride;
        self.bind_group = Some(bind_group);
    }

    fn ensure_streams(&mut self, ctx: &RenderCtx<'_>, vertices: usize) {
        if vertices <= self.stream_capacity && self.stream_vbos.iter().all(Option::is_some) {
            return;
        }

        let capacity = vertices.next_power_of_two().max(64);
        let size = (capacity * FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;

        for (vbo, name) in self.stream_vbos.iter_mut().zip(ATTRIBUTE_STREAMS) {
            *vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("arkanoid {name} vbo")),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        self.stream_capacity = capacity;
    }
}

/// Byte range of a vertex range inside one 4 x f32 stream.
fn stream_bytes(range: &Range<u32>) -> Range<u64> {
    let stride = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;
    u64::from(range.start) * stride..u64::from(range.end) * stride
}
