use rapier2d::prelude::*;

use crate::world::World;
use crate::MuscleCommand;

/// Damping applied by the velocity motor when chasing its target speed.
const MOTOR_GAIN: f32 = 12.0;

/// Default no-load speed of a muscle motor in rad/s
pub const DEFAULT_MAX_SPEED: f32 = 3.0;

/// Below this target speed a muscle counts as relaxed (for rendering and
/// energy accounting).
pub const ACTIVE_THRESHOLD: f32 = 0.1;

/// A motorized revolute joint between two bones. Contraction drives the
/// motor toward negative angles, extension toward positive ones; the joint
/// limits and the torque bound come from the skeleton tables.
pub struct Muscle {
    pub joint: ImpulseJointHandle,
    pub bone_a: RigidBodyHandle,
    pub bone_b: RigidBodyHandle,
    pub anchor_a: Point<f32>,
    pub anchor_b: Point<f32>,
    target_speed: f32,
    max_speed: f32,
}

impl Muscle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        world: &mut World,
        bone_a: RigidBodyHandle,
        bone_b: RigidBodyHandle,
        anchor_a: Point<f32>,
        anchor_b: Point<f32>,
        min_angle: f32,
        max_angle: f32,
        max_torque: f32,
    ) -> Self {
        let joint = RevoluteJointBuilder::new()
            .local_anchor1(anchor_a)
            .local_anchor2(anchor_b)
            .limits([min_angle, max_angle])
            .motor_model(MotorModel::ForceBased)
            .motor_velocity(0.0, MOTOR_GAIN)
            .motor_max_force(max_torque)
            .contacts_enabled(false)
            .build();
        let joint = world.impulse_joints.insert(bone_a, bone_b, joint, true);
        Self {
            joint,
            bone_a,
            bone_b,
            anchor_a,
            anchor_b,
            target_speed: 0.0,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }

    pub fn contract(&mut self, strength: f32) {
        self.target_speed = -self.max_speed * strength;
    }

    pub fn extend(&mut self, strength: f32) {
        self.target_speed = self.max_speed * strength;
    }

    pub fn relax(&mut self) {
        self.target_speed = 0.0;
    }

    pub fn command(&mut self, command: MuscleCommand) {
        match command {
            MuscleCommand::Contract => self.contract(1.0),
            MuscleCommand::Extend => self.extend(1.0),
            MuscleCommand::Relax => self.relax(),
        }
    }

    /// Write the current target speed into the joint motor. Called once per
    /// frame before stepping the world.
    pub fn apply(&self, impulse_joints: &mut ImpulseJointSet) {
        if let Some(joint) = impulse_joints.get_mut(self.joint, true) {
            joint
                .data
                .set_motor_velocity(JointAxis::AngX, self.target_speed, MOTOR_GAIN);
        }
    }

    /// Relative rotation between the two bones. Bones spawn unrotated, so
    /// this matches the joint angle directly.
    pub fn angle(&self, world: &World) -> f32 {
        world.angle(self.bone_b) - world.angle(self.bone_a)
    }

    /// Relative angular velocity between the two bones in rad/s.
    pub fn speed(&self, world: &World) -> f32 {
        world.angular_velocity(self.bone_b) - world.angular_velocity(self.bone_a)
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    pub fn is_active(&self) -> bool {
        self.target_speed.abs() > ACTIVE_THRESHOLD
    }

    /// World positions of the two anchor points, for drawing the muscle.
    pub fn endpoints(&self, world: &World) -> (Point<f32>, Point<f32>) {
        (
            world.world_point(self.bone_a, self.anchor_a),
            world.world_point(self.bone_b, self.anchor_b),
        )
    }
}
