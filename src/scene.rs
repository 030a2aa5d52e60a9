use std::path::Path;

use glam::Vec2;
use strum::IntoEnumIterator;

use crate::camera::Camera;
use crate::choreography::lab::CREATURE_START;
use crate::creature::{BoneName, Quadruped};
use crate::crucible::Crucible;
use crate::parallax::Parallax;
use crate::wgpu::shape_renderer::ShapeRenderer;
use crate::wgpu::sky_renderer::SkyRenderer;
use crate::wgpu::sprite_renderer::{SpriteRenderer, PARTS_FOLDER};
use crate::wgpu::Wgpu;
use crate::world::World;
use crate::RenderStyle;

const GROUND_COLOR: [f32; 4] = [0.39, 0.59, 0.39, 1.0];
const BONE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BONE_OVERLAY_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.39];
const BONE_OUTLINE_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 0.78];
const MUSCLE_RELAXED: [f32; 4] = [1.0, 0.39, 0.39, 1.0];
const MUSCLE_ACTIVE: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
const MUSCLE_OVERLAY: [f32; 4] = [1.0, 0.39, 0.39, 0.59];

/// Everything between the crucible and the screen: camera, renderers and
/// the current render style. Drawing layers back to front: sky, parallax
/// and ground, textures, then skeleton figures, so the overlay style can
/// paint its translucent skeleton on top of the fox artwork.
pub struct Scene {
    wgpu: Wgpu,
    camera: Camera,
    sky: SkyRenderer,
    parallax: Parallax,
    background: ShapeRenderer,
    figures: ShapeRenderer,
    sprites: SpriteRenderer,
    render_style: RenderStyle,
}

impl Scene {
    pub fn new(wgpu: Wgpu) -> Self {
        let sky = SkyRenderer::new(&wgpu);
        let background = ShapeRenderer::new(&wgpu);
        let figures = ShapeRenderer::new(&wgpu);
        let sprites = SpriteRenderer::new(&wgpu, Path::new(PARTS_FOLDER));
        let (x, y) = CREATURE_START;
        let camera = Camera::new(
            Vec2::new(x, y),
            wgpu.surface_configuration.width as f32,
            wgpu.surface_configuration.height as f32,
        );
        let render_style = if sprites.loaded_count() == 0 {
            RenderStyle::Skeleton
        } else {
            RenderStyle::default()
        };
        Self {
            wgpu,
            camera,
            sky,
            parallax: Parallax::new(),
            background,
            figures,
            sprites,
            render_style,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.wgpu.resize((width, height));
        self.camera.set_size(width as f32, height as f32);
    }

    pub fn toggle_render_style(&mut self) {
        self.render_style = self.render_style.next();
        log::info!("render style: {}", self.render_style);
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    pub fn redraw(&mut self, crucible: &Crucible) {
        let world = crucible.world();
        if let Some(creature) = crucible.creature() {
            let spine = world.position(creature.spine());
            self.camera.target_approach(Vec2::new(spine.x, spine.y));
        }

        self.background.clear();
        self.figures.clear();
        let half_width = self.camera.half_extent().x + 4.0;
        self.parallax.draw(
            &mut self.background,
            self.camera.travel(),
            self.camera.center.x,
            half_width,
        );
        self.draw_ground();
        if let Some(creature) = crucible.creature() {
            self.draw_creature(world, creature);
        }

        self.background.upload(&self.wgpu.queue);
        self.figures.upload(&self.wgpu.queue);
        self.wgpu.update_mvp_matrix(self.camera.mvp_matrix());
        self.render();
    }

    fn draw_ground(&mut self) {
        self.background.push_quad(
            [
                Vec2::new(-80.0, -0.5),
                Vec2::new(80.0, -0.5),
                Vec2::new(80.0, 0.5),
                Vec2::new(-80.0, 0.5),
            ],
            GROUND_COLOR,
        );
    }

    fn draw_creature(&mut self, world: &World, creature: &Quadruped) {
        let style = self.render_style;
        if style.show_texture() {
            self.sprites.update(world, creature, &self.wgpu.queue);
            // parts without artwork keep their skeleton look
            for bone_name in BoneName::iter() {
                if !self.sprites.is_loaded(bone_name) {
                    let corners = bone_corners(world, creature, bone_name);
                    self.figures.push_quad(corners, BONE_COLOR);
                }
            }
        }
        if style.show_skeleton() {
            let translucent = style == RenderStyle::Overlay;
            let bone_color = if translucent {
                BONE_OVERLAY_COLOR
            } else {
                BONE_COLOR
            };
            for bone_name in BoneName::iter() {
                let corners = bone_corners(world, creature, bone_name);
                self.figures.push_quad(corners, bone_color);
                if translucent {
                    self.figures.push_quad_outline(corners, BONE_OUTLINE_COLOR);
                }
            }
            for muscle in &creature.muscles {
                let (near, far) = muscle.endpoints(world);
                let color = if translucent {
                    MUSCLE_OVERLAY
                } else if muscle.is_active() {
                    MUSCLE_ACTIVE
                } else {
                    MUSCLE_RELAXED
                };
                self.figures.push_line(
                    Vec2::new(near.x, near.y),
                    Vec2::new(far.x, far.y),
                    color,
                );
            }
        }
    }

    fn render(&mut self) {
        let surface_texture = match self.wgpu.get_surface_texture() {
            Ok(surface_texture) => surface_texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let width = self.wgpu.surface_configuration.width;
                let height = self.wgpu.surface_configuration.height;
                self.wgpu.resize((width, height));
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => return,
            Err(error) => {
                log::error!("surface error: {error}");
                return;
            }
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.wgpu.create_encoder();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.12,
                            g: 0.12,
                            b: 0.16,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.sky.render(&mut render_pass);
            render_pass.set_bind_group(0, &self.wgpu.uniform_bind_group, &[]);
            self.background.render(&mut render_pass);
            if self.render_style.show_texture() {
                self.sprites.render(&mut render_pass);
            }
            self.figures.render(&mut render_pass);
        }
        self.wgpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }
}

fn bone_corners(world: &World, creature: &Quadruped, bone_name: BoneName) -> [Vec2; 4] {
    creature
        .bone(bone_name)
        .corners(world)
        .map(|corner| Vec2::new(corner.x, corner.y))
}
