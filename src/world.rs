use rapier2d::prelude::*;

use crate::TIME_STEP;

/// Ground slab half extents in meters
const GROUND_HALF_WIDTH: f32 = 80.0;
const GROUND_HALF_HEIGHT: f32 = 0.5;
const GROUND_FRICTION: f32 = 0.8;

/// The rapier simulation state: one static ground slab plus whatever bodies,
/// colliders and joints the creature adds.
pub struct World {
    pipeline: PhysicsPipeline,
    gravity: Vector<f32>,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    pub ground_body: RigidBodyHandle,
    pub ground_collider: ColliderHandle,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = TIME_STEP;

        let ground_body = bodies.insert(RigidBodyBuilder::fixed().build());
        let ground_collider = colliders.insert_with_parent(
            ColliderBuilder::cuboid(GROUND_HALF_WIDTH, GROUND_HALF_HEIGHT)
                .friction(GROUND_FRICTION)
                .build(),
            ground_body,
            &mut bodies,
        );

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, -10.0],
            integration_parameters,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            ground_body,
            ground_collider,
        }
    }

    /// Advance the simulation one tick of `TIME_STEP`.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Vector<f32> {
        *self.bodies[handle].translation()
    }

    pub fn angle(&self, handle: RigidBodyHandle) -> f32 {
        self.bodies[handle].rotation().angle()
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Vector<f32> {
        *self.bodies[handle].linvel()
    }

    pub fn angular_velocity(&self, handle: RigidBodyHandle) -> f32 {
        self.bodies[handle].angvel()
    }

    /// Transform a point given in a body's local frame into world coordinates.
    pub fn world_point(&self, handle: RigidBodyHandle, local: Point<f32>) -> Point<f32> {
        self.bodies[handle].position() * local
    }
}
