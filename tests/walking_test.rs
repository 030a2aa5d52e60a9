/// Integration tests driving the physics world, the creature and the
/// choreography lab together, without any window or GPU.
use fox_lab::choreography::lab::{ChoreographyLab, LabConfig};
use fox_lab::choreography::{Action, Choreography};
use fox_lab::creature::Quadruped;
use fox_lab::world::World;
use fox_lab::MuscleCommand;

fn settle(world: &mut World, creature: &Quadruped, frames: usize) {
    for _ in 0..frames {
        creature.apply_muscles(world);
        world.step();
    }
}

#[test]
fn creature_settles_on_the_ground() {
    let mut world = World::new();
    let creature = Quadruped::new(&mut world, 6.0, 3.0);
    settle(&mut world, &creature, 300);

    let spine = world.position(creature.spine());
    assert!(spine.x.is_finite() && spine.y.is_finite());
    assert!(
        spine.y > 0.0 && spine.y < 3.0,
        "spine should come to rest near the ground, got y = {}",
        spine.y
    );
    assert!(
        creature.distance_travelled(&world).abs() < 3.0,
        "an idle creature should not wander"
    );
}

#[test]
fn contracting_the_front_hip_swings_the_thigh() {
    let mut world = World::new();
    let mut creature = Quadruped::new(&mut world, 6.0, 3.0);
    settle(&mut world, &creature, 120);

    let initial = creature.muscles[0].angle(&world);
    creature.control_muscle(0, MuscleCommand::Contract);
    settle(&mut world, &creature, 90);
    let after = creature.muscles[0].angle(&world);

    assert!(
        after < initial - 0.05,
        "hip angle should move toward flexion: {initial} -> {after}"
    );
}

#[test]
fn resting_episode_spends_no_energy() {
    let choreography = Choreography { frames: vec![0; 120] };
    let episode = ChoreographyLab::run_episode(&choreography, 120);
    assert_eq!(episode.energy, 0.0);
    assert!(episode.frames_survived <= 120);
    if episode.upright {
        assert_eq!(episode.frames_survived, 120);
    }
    assert!(episode.distance.abs() < 3.0);
}

#[test]
fn driven_frames_are_counted_as_energy() {
    let code = Action::encode(0, MuscleCommand::Contract);
    let choreography = Choreography { frames: vec![code; 50] };
    let episode = ChoreographyLab::run_episode(&choreography, 50);
    assert_eq!(episode.energy, episode.frames_survived as f32);
}

#[test]
fn episodes_are_deterministic() {
    let choreography = Choreography::walking_gait(100);
    let first = ChoreographyLab::run_episode(&choreography, 100);
    let second = ChoreographyLab::run_episode(&choreography, 100);
    assert_eq!(first.frames_survived, second.frames_survived);
    assert!((first.distance - second.distance).abs() < 1e-6);
    assert_eq!(first.energy, second.energy);
}

#[test]
fn audition_selects_the_top_score() {
    let lab = ChoreographyLab::new(LabConfig {
        candidates: 5,
        frame_budget: 80,
        seed: 9,
        ..LabConfig::default()
    });
    let report = lab.audition();
    assert_eq!(report.scores.len(), 5);
    let top = report
        .scores
        .iter()
        .fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    assert_eq!(report.best.score, top);
}
