use bytemuck::{cast_slice, Pod, Zeroable};
use glam::Vec2;
use wgpu::RenderPass;

use crate::wgpu::Wgpu;

const MAX_TRIANGLE_VERTICES: usize = 8192;
const MAX_LINE_VERTICES: usize = 1024;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, Default)]
pub struct ShapeVertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl ShapeVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

struct Drawing {
    vertices: Vec<ShapeVertex>,
    buffer: wgpu::Buffer,
    pipeline: wgpu::RenderPipeline,
    capacity: usize,
}

impl Drawing {
    fn upload(&mut self, queue: &wgpu::Queue) {
        if self.vertices.len() > self.capacity {
            log::warn!(
                "shape overflow: {} vertices, drawing the first {}",
                self.vertices.len(),
                self.capacity
            );
            self.vertices.truncate(self.capacity);
        }
        queue.write_buffer(&self.buffer, 0, cast_slice(&self.vertices));
    }

    fn render<'pass>(&'pass self, render_pass: &mut RenderPass<'pass>) {
        if self.vertices.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.buffer.slice(..));
        render_pass.draw(0..self.vertices.len() as u32, 0..1);
    }
}

/// Immediate-mode colored geometry: the scene pushes triangles and lines
/// every frame and the whole batch is rewritten into two vertex buffers.
pub struct ShapeRenderer {
    triangles: Drawing,
    lines: Drawing,
}

impl ShapeRenderer {
    pub fn new(wgpu: &Wgpu) -> Self {
        Self {
            triangles: Self::drawing(wgpu, wgpu::PrimitiveTopology::TriangleList, MAX_TRIANGLE_VERTICES),
            lines: Self::drawing(wgpu, wgpu::PrimitiveTopology::LineList, MAX_LINE_VERTICES),
        }
    }

    fn drawing(wgpu: &Wgpu, topology: wgpu::PrimitiveTopology, capacity: usize) -> Drawing {
        let pipeline = wgpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Shape Pipeline"),
                layout: Some(&wgpu.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &wgpu.shader,
                    entry_point: Some("shape_vertex"),
                    compilation_options: Default::default(),
                    buffers: &[ShapeVertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &wgpu.shader,
                    entry_point: Some("shape_fragment"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: wgpu.surface_configuration.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });
        let buffer = wgpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shape Buffer"),
            size: (capacity * std::mem::size_of::<ShapeVertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Drawing {
            vertices: Vec::with_capacity(capacity),
            buffer,
            pipeline,
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.triangles.vertices.clear();
        self.lines.vertices.clear();
    }

    pub fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        for point in [a, b, c] {
            self.triangles.vertices.push(ShapeVertex {
                position: point.to_array(),
                color,
            });
        }
    }

    /// A filled quad from corners given counterclockwise.
    pub fn push_quad(&mut self, corners: [Vec2; 4], color: [f32; 4]) {
        let [a, b, c, d] = corners;
        self.push_triangle(a, b, c, color);
        self.push_triangle(a, c, d, color);
    }

    /// The outline of a quad as four line segments.
    pub fn push_quad_outline(&mut self, corners: [Vec2; 4], color: [f32; 4]) {
        for index in 0..4 {
            self.push_line(corners[index], corners[(index + 1) % 4], color);
        }
    }

    pub fn push_line(&mut self, a: Vec2, b: Vec2, color: [f32; 4]) {
        for point in [a, b] {
            self.lines.vertices.push(ShapeVertex {
                position: point.to_array(),
                color,
            });
        }
    }

    pub fn upload(&mut self, queue: &wgpu::Queue) {
        self.triangles.upload(queue);
        self.lines.upload(queue);
    }

    pub fn render<'pass>(&'pass self, render_pass: &mut RenderPass<'pass>) {
        self.triangles.render(render_pass);
        self.lines.render(render_pass);
    }
}
