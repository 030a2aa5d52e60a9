use crate::choreography::lab::{Audition, ChoreographyLab, CREATURE_START};
use crate::choreography::Action;
use crate::creature::Quadruped;
use crate::units::Meters;
use crate::world::World;
use crate::{ControlState, CrucibleAction, Radio, StateChange};

/// The winning choreography being performed in the window. When the budget
/// runs out or the fox falls, the world is rebuilt and the performance
/// starts over.
pub struct Replay {
    pub audition: Audition,
    pub budget: usize,
    frame: usize,
    loops: usize,
}

impl Replay {
    pub fn new(audition: Audition) -> Self {
        let budget = ChoreographyLab::replay_budget(audition.score);
        Self {
            audition,
            budget,
            frame: 0,
            loops: 0,
        }
    }
}

enum Stage {
    Empty,
    Manual,
    Replaying(Replay),
}

/// Owns the physics world and the creature, advancing them according to the
/// current stage. The window loop calls `iterate` once per frame.
pub struct Crucible {
    world: World,
    creature: Option<Quadruped>,
    stage: Stage,
    speed: f32,
    paused: bool,
    radio: Radio,
}

impl Crucible {
    pub fn new(radio: Radio) -> Self {
        Self {
            world: World::new(),
            creature: None,
            stage: Stage::Empty,
            speed: 1.0,
            paused: false,
            radio,
        }
    }

    fn rebuild(&mut self) {
        self.world = World::new();
        let (x, y) = CREATURE_START;
        self.creature = Some(Quadruped::new(&mut self.world, x, y));
    }

    pub fn iterate(&mut self) {
        if self.paused {
            return;
        }
        let steps = self.speed.round().max(1.0) as usize;
        if matches!(self.stage, Stage::Replaying(_)) {
            for _ in 0..steps {
                self.replay_frame();
            }
        } else if matches!(self.stage, Stage::Manual) {
            if let Some(creature) = &self.creature {
                creature.apply_muscles(&mut self.world);
                for _ in 0..steps {
                    self.world.step();
                }
            }
        }
    }

    fn replay_frame(&mut self) {
        let Stage::Replaying(replay) = &mut self.stage else {
            return;
        };
        let Some(creature) = &mut self.creature else {
            return;
        };
        creature.relax_all();
        if let Action::Drive { muscle, command } =
            replay.audition.choreography.action_at(replay.frame)
        {
            creature.control_muscle(muscle, command);
        }
        creature.apply_muscles(&mut self.world);
        self.world.step();
        replay.frame += 1;

        let fallen = creature.is_upside_down(&self.world);
        if fallen || replay.frame >= replay.budget {
            log::info!(
                "replay {loops}: {distance} in {frames} frames{tail}",
                loops = replay.loops + 1,
                distance = Meters(creature.distance_travelled(&self.world)),
                frames = replay.frame,
                tail = if fallen { " (fell over)" } else { "" },
            );
            replay.frame = 0;
            replay.loops += 1;
            self.rebuild();
        }
    }

    pub fn action(&mut self, crucible_action: CrucibleAction) {
        use CrucibleAction::*;
        match crucible_action {
            BuildCreature => {
                self.rebuild();
                if matches!(self.stage, Stage::Empty) {
                    self.stage = Stage::Manual;
                }
                StateChange::SetControlState(self.control_state()).send(&self.radio);
            }
            Muscle { index, command } => {
                if let Some(creature) = &mut self.creature {
                    creature.control_muscle(index, command);
                }
            }
            RelaxAll => {
                if let Some(creature) = &mut self.creature {
                    creature.relax_all();
                }
            }
            StartReplay(audition) => {
                self.rebuild();
                self.stage = Stage::Replaying(Replay::new(*audition));
                StateChange::SetControlState(self.control_state()).send(&self.radio);
            }
            SetSpeed(change) => {
                self.speed = (self.speed * change).clamp(1.0, 64.0);
                log::info!("simulation speed x{:.1}", self.speed);
            }
            TogglePaused => {
                self.paused = !self.paused;
                StateChange::SetControlState(self.control_state()).send(&self.radio);
            }
        }
    }

    pub fn control_state(&self) -> ControlState {
        if self.paused {
            ControlState::Paused
        } else {
            match self.stage {
                Stage::Replaying(_) => ControlState::Replaying,
                _ => ControlState::Manual,
            }
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn creature(&self) -> Option<&Quadruped> {
        self.creature.as_ref()
    }
}
