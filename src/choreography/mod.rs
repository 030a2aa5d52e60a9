use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::creature::ACTUATED_MUSCLES;
use crate::MuscleCommand;

pub mod fitness;
pub mod lab;

/// One rest code plus contract/extend for each actuated muscle.
pub const ACTION_CODES: u8 = (ACTUATED_MUSCLES as u8) * 2 + 1;

/// What the fox does on a single frame: nothing, or drive one muscle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Rest,
    Drive {
        muscle: usize,
        command: MuscleCommand,
    },
}

impl Action {
    /// Decode a frame code. 0 rests; codes 1..17 map to muscle
    /// `(code - 1) / 2`, contracting on even offsets and extending on odd
    /// ones. Anything out of range rests.
    pub fn decode(code: u8) -> Action {
        if code == 0 || code >= ACTION_CODES {
            return Action::Rest;
        }
        let muscle = (code as usize - 1) / 2;
        let command = if (code - 1) % 2 == 0 {
            MuscleCommand::Contract
        } else {
            MuscleCommand::Extend
        };
        Action::Drive { muscle, command }
    }

    pub fn encode(muscle: usize, command: MuscleCommand) -> u8 {
        match command {
            MuscleCommand::Relax => 0,
            MuscleCommand::Contract => 1 + (muscle as u8) * 2,
            MuscleCommand::Extend => 2 + (muscle as u8) * 2,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Action::Rest)
    }
}

/// A movement sequence: one action code per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choreography {
    pub frames: Vec<u8>,
}

impl Choreography {
    pub fn random(rng: &mut impl Rng, length: usize) -> Self {
        Self {
            frames: (0..length).map(|_| rng.random_range(0..ACTION_CODES)).collect(),
        }
    }

    /// A perturbed copy: each frame independently re-rolled with the given
    /// probability.
    pub fn variation_of(base: &Choreography, rng: &mut impl Rng, rate: f32) -> Self {
        Self {
            frames: base
                .frames
                .iter()
                .map(|&code| {
                    if rng.random::<f32>() < rate {
                        rng.random_range(0..ACTION_CODES)
                    } else {
                        code
                    }
                })
                .collect(),
        }
    }

    /// A hand-authored trot: hips and knees of opposite legs pulse out of
    /// phase, with short rests between strokes.
    pub fn walking_gait(length: usize) -> Self {
        use crate::creature::MuscleName::*;
        let stroke = [
            (BackHip as usize, MuscleCommand::Contract),
            (FrontKnee as usize, MuscleCommand::Extend),
            (BackKnee as usize, MuscleCommand::Contract),
            (FrontHip as usize, MuscleCommand::Extend),
            (BackHip as usize, MuscleCommand::Extend),
            (FrontKnee as usize, MuscleCommand::Contract),
            (BackKnee as usize, MuscleCommand::Extend),
            (FrontHip as usize, MuscleCommand::Contract),
        ];
        const HOLD: usize = 6;
        const REST: usize = 2;
        let mut frames = Vec::with_capacity(length);
        'fill: loop {
            for &(muscle, command) in &stroke {
                let code = Action::encode(muscle, command);
                for _ in 0..HOLD {
                    if frames.len() >= length {
                        break 'fill;
                    }
                    frames.push(code);
                }
                for _ in 0..REST {
                    if frames.len() >= length {
                        break 'fill;
                    }
                    frames.push(0);
                }
            }
        }
        Self { frames }
    }

    /// The action for a frame, holding the final frame forever, so replays
    /// longer than the sequence stay still instead of panicking.
    pub fn action_at(&self, frame: usize) -> Action {
        match self.frames.last() {
            None => Action::Rest,
            Some(&last) => {
                let code = self.frames.get(frame).copied().unwrap_or(last);
                Action::decode(code)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_code_rests() {
        assert_eq!(Action::decode(0), Action::Rest);
    }

    #[test]
    fn codes_cover_every_muscle_both_ways() {
        for muscle in 0..ACTUATED_MUSCLES {
            let contract = Action::decode(1 + (muscle as u8) * 2);
            let extend = Action::decode(2 + (muscle as u8) * 2);
            assert_eq!(
                contract,
                Action::Drive {
                    muscle,
                    command: MuscleCommand::Contract
                }
            );
            assert_eq!(
                extend,
                Action::Drive {
                    muscle,
                    command: MuscleCommand::Extend
                }
            );
        }
    }

    #[test]
    fn out_of_range_codes_rest() {
        assert_eq!(Action::decode(ACTION_CODES), Action::Rest);
        assert_eq!(Action::decode(u8::MAX), Action::Rest);
    }

    #[test]
    fn encode_round_trips_through_decode() {
        let code = Action::encode(3, MuscleCommand::Extend);
        assert_eq!(
            Action::decode(code),
            Action::Drive {
                muscle: 3,
                command: MuscleCommand::Extend
            }
        );
    }

    #[test]
    fn action_past_the_end_holds_the_last_frame() {
        let choreography = Choreography { frames: vec![0, 0, 5] };
        assert_eq!(choreography.action_at(2), Action::decode(5));
        assert_eq!(choreography.action_at(100), Action::decode(5));
    }

    #[test]
    fn empty_choreography_rests() {
        let choreography = Choreography { frames: vec![] };
        assert_eq!(choreography.action_at(0), Action::Rest);
    }

    #[test]
    fn random_is_deterministic_for_a_seed() {
        let a = Choreography::random(&mut ChaCha8Rng::seed_from_u64(7), 100);
        let b = Choreography::random(&mut ChaCha8Rng::seed_from_u64(7), 100);
        assert_eq!(a, b);
        assert!(a.frames.iter().all(|&code| code < ACTION_CODES));
    }

    #[test]
    fn variation_rate_zero_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let base = Choreography::random(&mut rng, 50);
        let copy = Choreography::variation_of(&base, &mut rng, 0.0);
        assert_eq!(base, copy);
    }

    #[test]
    fn variation_rate_one_rerolls_everything_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let base = Choreography::random(&mut rng, 200);
        let varied = Choreography::variation_of(&base, &mut rng, 1.0);
        assert_eq!(varied.len(), base.len());
        assert!(varied.frames.iter().all(|&code| code < ACTION_CODES));
        assert_ne!(base, varied);
    }

    #[test]
    fn walking_gait_fills_the_budget_with_leg_work() {
        let gait = Choreography::walking_gait(120);
        assert_eq!(gait.len(), 120);
        let driven = gait
            .frames
            .iter()
            .filter(|&&code| !Action::decode(code).is_rest())
            .count();
        assert!(driven > 60, "a gait should mostly drive muscles, got {driven}");
    }
}
