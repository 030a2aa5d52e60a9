use std::ops::Range;
use std::path::Path;

use bytemuck::{cast_slice, Pod, Zeroable};
use glam::Vec2;
use wgpu::RenderPass;

use crate::creature::{BoneName, Quadruped};
use crate::units::PIXELS_PER_METER;
use crate::wgpu::Wgpu;
use crate::world::World;

/// Folder searched for the fox cutout textures.
pub const PARTS_FOLDER: &str = "fox_parts";

/// All cutouts share this base scale; per-part factors multiply it.
const GLOBAL_SCALE: f32 = 0.3;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, Default)]
struct SpriteVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

impl SpriteVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

struct PartSpec {
    bone: BoneName,
    file: &'static str,
    scale: f32,
    offset_px: [f32; 2],
    rotation_offset_deg: f32,
}

/// Calibrated against the cutout artwork: per-part scale, pixel nudge and
/// rotation correction, listed back-to-front.
const DRAW_ORDER: [PartSpec; 14] = [
    PartSpec {
        bone: BoneName::TailTip,
        file: "fox_texture_tail_high.png",
        scale: 1.3,
        offset_px: [0.0, -10.0],
        rotation_offset_deg: 298.06,
    },
    PartSpec {
        bone: BoneName::TailMid,
        file: "fox_texture_tail_mid.png",
        scale: 1.3,
        offset_px: [0.0, 0.0],
        rotation_offset_deg: -30.63,
    },
    PartSpec {
        bone: BoneName::TailBase,
        file: "fox_texture_tail_bottom.png",
        scale: 1.3,
        offset_px: [0.0, 0.0],
        rotation_offset_deg: -12.67,
    },
    PartSpec {
        bone: BoneName::BackFoot,
        file: "fox_texture_back_foot.png",
        scale: 1.3,
        offset_px: [0.0, 0.0],
        rotation_offset_deg: 87.51,
    },
    PartSpec {
        bone: BoneName::BackAnkle,
        file: "fox_texture_back_ankle.png",
        scale: 1.3,
        offset_px: [0.0, -5.0],
        rotation_offset_deg: 0.0,
    },
    PartSpec {
        bone: BoneName::BackShin,
        file: "fox_texture_back_shin.png",
        scale: 1.3,
        offset_px: [0.0, 0.0],
        rotation_offset_deg: -6.57,
    },
    PartSpec {
        bone: BoneName::BackThigh,
        file: "fox_texture_back_thigh.png",
        scale: 1.0,
        offset_px: [0.0, 0.0],
        rotation_offset_deg: -4.55,
    },
    PartSpec {
        bone: BoneName::FrontFoot,
        file: "fox_texture_front_foot.png",
        scale: 1.0,
        offset_px: [0.0, 0.0],
        rotation_offset_deg: 82.07,
    },
    PartSpec {
        bone: BoneName::FrontAnkle,
        file: "fox_texture_front_ankle.png",
        scale: 1.2,
        offset_px: [0.0, 7.0],
        rotation_offset_deg: -5.86,
    },
    PartSpec {
        bone: BoneName::FrontShin,
        file: "fox_texture_front_shin.png",
        scale: 1.5,
        offset_px: [-5.0, 0.0],
        rotation_offset_deg: -6.55,
    },
    PartSpec {
        bone: BoneName::FrontThigh,
        file: "fox_texture_front_thigh.png",
        scale: 1.1,
        offset_px: [0.0, 0.0],
        rotation_offset_deg: -10.0,
    },
    PartSpec {
        bone: BoneName::Neck,
        file: "fox_texture_neck.png",
        scale: 1.2,
        offset_px: [0.0, 20.0],
        rotation_offset_deg: 126.27,
    },
    PartSpec {
        bone: BoneName::Head,
        file: "fox_texture_head.png",
        scale: 1.2,
        offset_px: [0.0, -10.0],
        rotation_offset_deg: -116.0,
    },
    PartSpec {
        bone: BoneName::Spine,
        file: "fox_texture_body.png",
        scale: 1.3,
        offset_px: [-10.0, 0.0],
        rotation_offset_deg: 0.24,
    },
];

struct LoadedPart {
    bind_group: wgpu::BindGroup,
    size_px: Vec2,
}

/// Draws the fox as textured cutouts pinned to its bones. Parts whose PNG
/// is missing stay unloaded; the scene falls back to their skeleton quads.
pub struct SpriteRenderer {
    pipeline: wgpu::RenderPipeline,
    parts: Vec<Option<LoadedPart>>,
    vertices: Vec<SpriteVertex>,
    vertex_buffer: wgpu::Buffer,
    ranges: Vec<(usize, Range<u32>)>,
}

impl SpriteRenderer {
    pub fn new(wgpu: &Wgpu, folder: &Path) -> Self {
        let texture_bind_group_layout =
            wgpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Sprite Bind Group Layout"),
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
        let pipeline_layout = wgpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sprite Pipeline Layout"),
                bind_group_layouts: &[&wgpu.uniform_bind_group_layout, &texture_bind_group_layout],
                push_constant_ranges: &[],
            });
        let pipeline = wgpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Sprite Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &wgpu.shader,
                    entry_point: Some("sprite_vertex"),
                    compilation_options: Default::default(),
                    buffers: &[SpriteVertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &wgpu.shader,
                    entry_point: Some("sprite_fragment"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: wgpu.surface_configuration.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });
        let sampler = wgpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let parts = DRAW_ORDER
            .iter()
            .map(|spec| Self::load_part(wgpu, &texture_bind_group_layout, &sampler, folder, spec))
            .collect::<Vec<_>>();
        let loaded = parts.iter().flatten().count();
        if loaded == 0 {
            log::warn!(
                "no fox textures found under {folder:?}, textured mode falls back to the skeleton"
            );
        } else {
            log::info!("loaded {loaded}/{} fox textures", DRAW_ORDER.len());
        }
        let capacity = DRAW_ORDER.len() * 6;
        let vertex_buffer = wgpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Vertex Buffer"),
            size: (capacity * std::mem::size_of::<SpriteVertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            pipeline,
            parts,
            vertices: Vec::with_capacity(capacity),
            vertex_buffer,
            ranges: Vec::new(),
        }
    }

    fn load_part(
        wgpu: &Wgpu,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        folder: &Path,
        spec: &PartSpec,
    ) -> Option<LoadedPart> {
        let path = folder.join(spec.file);
        let image = match image::open(&path) {
            Ok(image) => image.to_rgba8(),
            Err(error) => {
                log::warn!("texture {path:?} not loaded: {error}");
                return None;
            }
        };
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = wgpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(spec.file),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        wgpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = wgpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(spec.file),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        log::info!("texture {path:?} loaded ({width}x{height})");
        Some(LoadedPart {
            bind_group,
            size_px: Vec2::new(width as f32, height as f32),
        })
    }

    pub fn loaded_count(&self) -> usize {
        self.parts.iter().flatten().count()
    }

    pub fn is_loaded(&self, bone: BoneName) -> bool {
        DRAW_ORDER
            .iter()
            .zip(&self.parts)
            .any(|(spec, part)| spec.bone == bone && part.is_some())
    }

    /// Rebuild the quad for every loaded part from the current bone poses.
    pub fn update(&mut self, world: &World, creature: &Quadruped, queue: &wgpu::Queue) {
        self.vertices.clear();
        self.ranges.clear();
        for (index, (spec, part)) in DRAW_ORDER.iter().zip(&self.parts).enumerate() {
            let Some(part) = part else {
                continue;
            };
            let bone = creature.bone(spec.bone);
            let position = world.position(bone.body);
            let angle = world.angle(bone.body);
            let center = Vec2::new(position.x, position.y)
                + Vec2::from_angle(angle).rotate(Vec2::from(spec.offset_px) / PIXELS_PER_METER);
            let half = part.size_px * GLOBAL_SCALE * spec.scale / PIXELS_PER_METER / 2.0;
            let rotation = Vec2::from_angle(angle - spec.rotation_offset_deg.to_radians());
            let corner = |x: f32, y: f32, u: f32, v: f32| SpriteVertex {
                position: (center + rotation.rotate(Vec2::new(x * half.x, y * half.y))).to_array(),
                uv: [u, v],
            };
            let start = self.vertices.len() as u32;
            // two triangles; v runs top-down while y runs bottom-up
            self.vertices.extend([
                corner(-1.0, -1.0, 0.0, 1.0),
                corner(1.0, -1.0, 1.0, 1.0),
                corner(1.0, 1.0, 1.0, 0.0),
                corner(-1.0, -1.0, 0.0, 1.0),
                corner(1.0, 1.0, 1.0, 0.0),
                corner(-1.0, 1.0, 0.0, 0.0),
            ]);
            self.ranges.push((index, start..self.vertices.len() as u32));
        }
        queue.write_buffer(&self.vertex_buffer, 0, cast_slice(&self.vertices));
    }

    pub fn render<'pass>(&'pass self, render_pass: &mut RenderPass<'pass>) {
        if self.ranges.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        for (index, range) in &self.ranges {
            if let Some(part) = &self.parts[*index] {
                render_pass.set_bind_group(1, &part.bind_group, &[]);
                render_pass.draw(range.clone(), 0..1);
            }
        }
    }
}
