use rapier2d::prelude::*;

use crate::world::World;

const BONE_FRICTION: f32 = 0.5;

/// One rigid segment of the skeleton: a dynamic body with a single cuboid
/// collider. Dimensions are full width/height in meters.
pub struct Bone {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub half_width: f32,
    pub half_height: f32,
}

impl Bone {
    pub fn new(world: &mut World, x: f32, y: f32, width: f32, height: f32, density: f32) -> Self {
        let body = world
            .bodies
            .insert(RigidBodyBuilder::dynamic().translation(vector![x, y]).build());
        let collider = world.colliders.insert_with_parent(
            ColliderBuilder::cuboid(width / 2.0, height / 2.0)
                .density(density)
                .friction(BONE_FRICTION)
                .build(),
            body,
            &mut world.bodies,
        );
        Self {
            body,
            collider,
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }

    /// The four collider corners in world coordinates, counterclockwise.
    pub fn corners(&self, world: &World) -> [Point<f32>; 4] {
        let position = world.bodies[self.body].position();
        let (hw, hh) = (self.half_width, self.half_height);
        [
            position * point![-hw, -hh],
            position * point![hw, -hh],
            position * point![hw, hh],
            position * point![-hw, hh],
        ]
    }
}
