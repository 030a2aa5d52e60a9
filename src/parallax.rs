use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::wgpu::shape_renderer::ShapeRenderer;

/// Fixed seed so every run sees the same skyline.
const MOUNTAIN_SEED: u64 = 42;

/// Top surface of the ground slab, where the silhouettes stand.
const GROUND_TOP: f32 = 0.5;

struct Mountain {
    peak_x: f32,
    peak_height: f32,
    half_base: f32,
    color: [f32; 4],
}

/// A band of mountain silhouettes repeating horizontally with a parallax
/// depth: 0.0 pins the band to the screen, 1.0 moves it with the world.
pub struct ParallaxLayer {
    depth: f32,
    period: f32,
    mountains: Vec<Mountain>,
}

impl ParallaxLayer {
    fn generate(
        rng: &mut ChaCha8Rng,
        depth: f32,
        period: f32,
        count: usize,
        height_range: std::ops::Range<f32>,
        base_color: [f32; 3],
    ) -> Self {
        let mountains = (0..count)
            .map(|index| {
                let slot = period / count as f32;
                let shade = rng.random_range(-0.08..0.08);
                Mountain {
                    peak_x: slot * index as f32 + rng.random_range(-slot * 0.3..slot * 0.3),
                    peak_height: rng.random_range(height_range.clone()),
                    half_base: rng.random_range(1.5..3.5),
                    color: [
                        (base_color[0] + shade).clamp(0.0, 1.0),
                        (base_color[1] + shade).clamp(0.0, 1.0),
                        (base_color[2] + shade).clamp(0.0, 1.0),
                        1.0,
                    ],
                }
            })
            .collect();
        Self {
            depth,
            period,
            mountains,
        }
    }

    /// Push this layer's triangles, shifted so the layer appears to move at
    /// `depth` times the camera speed, tiled to cover the visible span.
    fn draw(&self, shapes: &mut ShapeRenderer, travel: Vec2, view_center_x: f32, half_width: f32) {
        let shift = travel.x * (1.0 - self.depth);
        let left = view_center_x - half_width;
        let right = view_center_x + half_width;
        let mut tile = ((left - shift) / self.period).floor() * self.period;
        while tile + shift < right + self.period {
            for mountain in &self.mountains {
                let peak_x = mountain.peak_x + tile + shift;
                if peak_x + mountain.half_base < left || peak_x - mountain.half_base > right {
                    continue;
                }
                shapes.push_triangle(
                    Vec2::new(peak_x - mountain.half_base, GROUND_TOP),
                    Vec2::new(peak_x + mountain.half_base, GROUND_TOP),
                    Vec2::new(peak_x, GROUND_TOP + mountain.peak_height),
                    mountain.color,
                );
            }
            tile += self.period;
        }
    }
}

/// The layered backdrop between the sky and the ground.
pub struct Parallax {
    layers: Vec<ParallaxLayer>,
}

impl Default for Parallax {
    fn default() -> Self {
        Self::new()
    }
}

impl Parallax {
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(MOUNTAIN_SEED);
        let far = ParallaxLayer::generate(&mut rng, 0.2, 36.0, 5, 3.0..5.5, [0.39, 0.47, 0.55]);
        let near = ParallaxLayer::generate(&mut rng, 0.45, 28.0, 5, 1.5..3.0, [0.31, 0.39, 0.45]);
        Self {
            layers: vec![far, near],
        }
    }

    /// Farthest layer first, so closer silhouettes paint over it.
    pub fn draw(
        &self,
        shapes: &mut ShapeRenderer,
        travel: Vec2,
        view_center_x: f32,
        half_width: f32,
    ) {
        for layer in &self.layers {
            layer.draw(shapes, travel, view_center_x, half_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_are_ordered_far_to_near() {
        let parallax = Parallax::new();
        let depths: Vec<f32> = parallax.layers.iter().map(|layer| layer.depth).collect();
        assert!(depths.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn generation_is_reproducible() {
        let first = Parallax::new();
        let second = Parallax::new();
        let peaks = |parallax: &Parallax| {
            parallax.layers[0]
                .mountains
                .iter()
                .map(|mountain| mountain.peak_x)
                .collect::<Vec<f32>>()
        };
        assert_eq!(peaks(&first), peaks(&second));
    }
}
