use std::f32::consts::PI;

use rapier2d::prelude::*;

use crate::world::World;
use crate::MuscleCommand;

pub mod bone;
pub mod muscle;

pub use bone::Bone;
pub use muscle::Muscle;

/// Only the leg muscles are actuated; neck and tail joints are posture
/// springs with locked limits.
pub const ACTUATED_MUSCLES: usize = 8;

/// A creature tipped more than this far from upright counts as fallen.
const UPSIDE_DOWN_THRESHOLD: f32 = PI / 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum BoneName {
    Spine,
    FrontThigh,
    FrontShin,
    FrontAnkle,
    FrontFoot,
    BackThigh,
    BackShin,
    BackAnkle,
    BackFoot,
    Neck,
    Head,
    TailBase,
    TailMid,
    TailTip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum MuscleName {
    FrontHip,
    FrontKnee,
    FrontAnkle,
    FrontToe,
    BackHip,
    BackKnee,
    BackAnkle,
    BackToe,
    NeckJoint,
    HeadJoint,
    TailBaseJoint,
    TailMidJoint,
    TailTipJoint,
}

// Skeleton dimensions in meters
const BONE_WIDTH: f32 = 0.05;
const SPINE_LENGTH: f32 = 1.3;
const SPINE_FULL_LENGTH: f32 = 1.4;
const BONE_DENSITY: f32 = 0.5;
const TAIL_DENSITY: f32 = 0.1;
const THIGH: f32 = 0.5;
const FRONT_SHIN: f32 = 0.3;
const BACK_SHIN: f32 = 0.4;
const FOOT: f32 = 0.2;
const ANKLE: f32 = 0.2;
const NECK: f32 = 0.4;
const TAIL: f32 = 0.4;
const MARGIN: f32 = 0.05;

struct BoneSpec {
    name: BoneName,
    dx: f32,
    dy: f32,
    width: f32,
    height: f32,
    density: f32,
}

struct MuscleSpec {
    name: MuscleName,
    bone_a: BoneName,
    bone_b: BoneName,
    anchor_a: [f32; 2],
    anchor_b: [f32; 2],
    min_angle: f32,
    max_angle: f32,
    max_torque: f32,
}

fn bone_specs() -> Vec<BoneSpec> {
    use BoneName::*;
    let bone = |name, dx, dy, width, height, density| BoneSpec {
        name,
        dx,
        dy,
        width,
        height,
        density,
    };
    vec![
        bone(Spine, 0.0, 0.0, SPINE_FULL_LENGTH, BONE_WIDTH, BONE_DENSITY),
        bone(FrontThigh, 0.8, -0.5, BONE_WIDTH, THIGH, BONE_DENSITY),
        bone(FrontShin, 0.8, -1.3, BONE_WIDTH, FRONT_SHIN, BONE_DENSITY),
        bone(FrontAnkle, 0.8, -1.4, BONE_WIDTH, ANKLE, BONE_DENSITY),
        bone(FrontFoot, 0.7, -1.5, BONE_WIDTH, FOOT, BONE_DENSITY),
        bone(BackThigh, -0.8, -0.5, BONE_WIDTH, THIGH, BONE_DENSITY),
        bone(BackShin, -0.8, -1.3, BONE_WIDTH, BACK_SHIN, BONE_DENSITY),
        bone(BackAnkle, -0.8, -1.4, BONE_WIDTH, ANKLE, BONE_DENSITY),
        bone(BackFoot, -0.7, -1.5, BONE_WIDTH, FOOT, BONE_DENSITY),
        bone(Neck, 0.9, 0.1, BONE_WIDTH, NECK, BONE_DENSITY),
        bone(Head, 0.99, 0.1, BONE_WIDTH, NECK, BONE_DENSITY),
        bone(TailBase, -0.9, 0.1, BONE_WIDTH, TAIL, TAIL_DENSITY),
        bone(TailMid, -1.0, 0.3, BONE_WIDTH, TAIL / 2.0, TAIL_DENSITY),
        bone(TailTip, -1.1, 0.4, BONE_WIDTH, TAIL / 2.0, TAIL_DENSITY),
    ]
}

fn muscle_specs() -> Vec<MuscleSpec> {
    use BoneName::*;
    use MuscleName::*;
    let muscle = |name, bone_a, bone_b, anchor_a, anchor_b, min_angle, max_angle, max_torque| {
        MuscleSpec {
            name,
            bone_a,
            bone_b,
            anchor_a,
            anchor_b,
            min_angle,
            max_angle,
            max_torque,
        }
    };
    vec![
        muscle(
            FrontHip,
            Spine,
            FrontThigh,
            [SPINE_LENGTH / 2.0, -BONE_WIDTH],
            [0.0, THIGH / 2.0 + MARGIN],
            -PI * 0.45,
            PI * 0.1,
            4000.0,
        ),
        muscle(
            FrontKnee,
            FrontThigh,
            FrontShin,
            [0.0, -THIGH / 2.0 + MARGIN],
            [0.0, FRONT_SHIN / 2.0 + MARGIN],
            0.0,
            PI * 0.8,
            5000.0,
        ),
        muscle(
            MuscleName::FrontAnkle,
            FrontShin,
            BoneName::FrontAnkle,
            [BONE_WIDTH, -(FRONT_SHIN / 2.0 + MARGIN)],
            [BONE_WIDTH, ANKLE / 2.0 + MARGIN],
            0.0,
            PI * 0.4,
            5000.0,
        ),
        muscle(
            FrontToe,
            BoneName::FrontAnkle,
            FrontFoot,
            [BONE_WIDTH, -(ANKLE / 2.0 + MARGIN)],
            [BONE_WIDTH, MARGIN],
            PI * 0.3,
            PI * 0.6,
            2000.0,
        ),
        muscle(
            BackHip,
            Spine,
            BackThigh,
            [-SPINE_LENGTH / 2.0, -BONE_WIDTH],
            [0.0, THIGH / 2.0 + MARGIN],
            -PI * 0.3,
            PI * 0.35,
            4000.0,
        ),
        muscle(
            BackKnee,
            BackThigh,
            BackShin,
            [0.0, -THIGH / 2.0 + MARGIN],
            [0.0, BACK_SHIN / 2.0 + MARGIN],
            -PI * 0.7,
            0.0,
            5000.0,
        ),
        muscle(
            MuscleName::BackAnkle,
            BackShin,
            BoneName::BackAnkle,
            [0.0, -BACK_SHIN / 2.0 + MARGIN],
            [0.0, ANKLE / 2.0 + MARGIN],
            -PI * 0.7,
            0.0,
            5000.0,
        ),
        muscle(
            BackToe,
            BoneName::BackAnkle,
            BackFoot,
            [BONE_WIDTH, -(ANKLE / 2.0 + MARGIN)],
            [BONE_WIDTH, MARGIN],
            PI * 0.3,
            PI * 0.6,
            2000.0,
        ),
        muscle(
            NeckJoint,
            Spine,
            Neck,
            [SPINE_FULL_LENGTH / 2.0 + MARGIN, BONE_WIDTH],
            [0.0, NECK / 2.0],
            PI * 0.7,
            PI * 0.7,
            40.0,
        ),
        muscle(
            HeadJoint,
            Neck,
            Head,
            [BONE_WIDTH, -(NECK / 2.0 + MARGIN)],
            [BONE_WIDTH, -BONE_WIDTH],
            PI * 0.55,
            PI * 0.55,
            40.0,
        ),
        muscle(
            TailBaseJoint,
            Spine,
            TailBase,
            [-(SPINE_FULL_LENGTH / 2.0 + MARGIN), BONE_WIDTH],
            [0.0, TAIL / 2.0],
            -PI * 0.5,
            -PI * 0.5,
            40.0,
        ),
        muscle(
            TailMidJoint,
            TailBase,
            TailMid,
            [0.0, -TAIL / 2.0],
            [0.0, TAIL / 4.0 + MARGIN],
            -PI * 0.3,
            -PI * 0.3,
            40.0,
        ),
        muscle(
            TailTipJoint,
            TailMid,
            TailTip,
            [0.0, -(TAIL / 4.0 + MARGIN)],
            [0.0, TAIL / 4.0 + MARGIN],
            -PI * 0.2,
            -PI * 0.2,
            40.0,
        ),
    ]
}

/// Snapshot of the creature for controllers and logging.
#[derive(Debug, Clone)]
pub struct CreatureState {
    pub position: [f32; 2],
    pub angle: f32,
    pub velocity: [f32; 2],
    pub muscle_angles: Vec<f32>,
    pub muscle_speeds: Vec<f32>,
}

/// The fox: fourteen bones linked by thirteen revolute muscles, standing at
/// (x, y) when built. Bones and muscles are stored in `BoneName` and
/// `MuscleName` order.
pub struct Quadruped {
    pub bones: Vec<Bone>,
    pub muscles: Vec<Muscle>,
    start_x: f32,
}

impl Quadruped {
    pub fn new(world: &mut World, x: f32, y: f32) -> Self {
        let bones: Vec<Bone> = bone_specs()
            .into_iter()
            .map(|spec| Bone::new(world, x + spec.dx, y + spec.dy, spec.width, spec.height, spec.density))
            .collect();
        let muscles = muscle_specs()
            .into_iter()
            .map(|spec| {
                Muscle::new(
                    world,
                    bones[spec.bone_a as usize].body,
                    bones[spec.bone_b as usize].body,
                    point![spec.anchor_a[0], spec.anchor_a[1]],
                    point![spec.anchor_b[0], spec.anchor_b[1]],
                    spec.min_angle,
                    spec.max_angle,
                    spec.max_torque,
                )
            })
            .collect();
        Self {
            bones,
            muscles,
            start_x: x,
        }
    }

    pub fn bone(&self, name: BoneName) -> &Bone {
        &self.bones[name as usize]
    }

    pub fn spine(&self) -> RigidBodyHandle {
        self.bones[BoneName::Spine as usize].body
    }

    /// Drive one actuated muscle. Out-of-range indices are ignored.
    pub fn control_muscle(&mut self, index: usize, command: MuscleCommand) {
        if index < ACTUATED_MUSCLES {
            self.muscles[index].command(command);
        }
    }

    pub fn relax_all(&mut self) {
        for muscle in self.muscles.iter_mut().take(ACTUATED_MUSCLES) {
            muscle.relax();
        }
    }

    /// Push every muscle's target speed into its joint motor.
    pub fn apply_muscles(&self, world: &mut World) {
        for muscle in &self.muscles {
            muscle.apply(&mut world.impulse_joints);
        }
    }

    pub fn state(&self, world: &World) -> CreatureState {
        let spine = self.spine();
        let position = world.position(spine);
        let velocity = world.linear_velocity(spine);
        CreatureState {
            position: [position.x, position.y],
            angle: world.angle(spine),
            velocity: [velocity.x, velocity.y],
            muscle_angles: self.muscles.iter().map(|m| m.angle(world)).collect(),
            muscle_speeds: self.muscles.iter().map(|m| m.speed(world)).collect(),
        }
    }

    /// True when the spine has rolled close to belly-up.
    pub fn is_upside_down(&self, world: &World) -> bool {
        let mut angle = world.angle(self.spine()) % (2.0 * PI);
        if angle > PI {
            angle -= 2.0 * PI;
        }
        if angle < -PI {
            angle += 2.0 * PI;
        }
        (angle.abs() - PI).abs() < UPSIDE_DOWN_THRESHOLD
    }

    /// Horizontal progress since the creature was built.
    pub fn distance_travelled(&self, world: &World) -> f32 {
        world.position(self.spine()).x - self.start_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn skeleton_has_expected_shape() {
        let mut world = World::new();
        let quadruped = Quadruped::new(&mut world, 6.0, 3.0);
        assert_eq!(quadruped.bones.len(), BoneName::iter().count());
        assert_eq!(quadruped.muscles.len(), MuscleName::iter().count());
        assert_eq!(quadruped.bones.len(), 14);
        assert_eq!(quadruped.muscles.len(), 13);
    }

    #[test]
    fn actuated_muscles_have_room_to_move() {
        // The posture joints are locked; the leg muscles must not be.
        let specs = muscle_specs();
        for spec in specs.iter().take(ACTUATED_MUSCLES) {
            assert!(
                spec.max_angle > spec.min_angle,
                "{} should have a free range",
                spec.name
            );
        }
        for spec in specs.iter().skip(ACTUATED_MUSCLES) {
            assert_eq!(spec.max_angle, spec.min_angle, "{} should be locked", spec.name);
        }
    }

    #[test]
    fn out_of_range_muscle_is_ignored() {
        let mut world = World::new();
        let mut quadruped = Quadruped::new(&mut world, 6.0, 3.0);
        quadruped.control_muscle(ACTUATED_MUSCLES + 10, MuscleCommand::Contract);
        for muscle in &quadruped.muscles {
            assert!(!muscle.is_active());
        }
    }

    #[test]
    fn contract_and_relax_change_the_target() {
        let mut world = World::new();
        let mut quadruped = Quadruped::new(&mut world, 6.0, 3.0);
        quadruped.control_muscle(0, MuscleCommand::Contract);
        assert!(quadruped.muscles[0].target_speed() < 0.0);
        quadruped.control_muscle(0, MuscleCommand::Extend);
        assert!(quadruped.muscles[0].target_speed() > 0.0);
        quadruped.relax_all();
        assert_eq!(quadruped.muscles[0].target_speed(), 0.0);
    }

    #[test]
    fn state_snapshot_covers_every_muscle() {
        let mut world = World::new();
        let quadruped = Quadruped::new(&mut world, 6.0, 3.0);
        let state = quadruped.state(&world);
        assert_eq!(state.muscle_angles.len(), 13);
        assert_eq!(state.muscle_speeds.len(), 13);
        assert_eq!(state.position[0], 6.0);
        assert_eq!(state.position[1], 3.0);
        assert_eq!(state.angle, 0.0);
    }

    #[test]
    fn upside_down_detection() {
        let mut world = World::new();
        let quadruped = Quadruped::new(&mut world, 6.0, 3.0);
        assert!(!quadruped.is_upside_down(&world));
        let spine = quadruped.spine();
        world
            .bodies
            .get_mut(spine)
            .unwrap()
            .set_rotation(rapier2d::na::UnitComplex::new(PI), true);
        assert!(quadruped.is_upside_down(&world));
    }
}
