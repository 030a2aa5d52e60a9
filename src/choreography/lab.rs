use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::choreography::fitness::{Episode, FitnessConfig};
use crate::choreography::{Action, Choreography};
use crate::creature::Quadruped;
use crate::world::World;

/// Frame budget for a fresh audition episode.
pub const BASE_TIME: usize = 500;
/// Replay budget ceiling once scores approach the reward threshold.
pub const MAX_TIME: usize = 2000;
/// Score at which the replay budget saturates.
pub const REWARD_THRESHOLD: f32 = 5000.0;

/// Where the fox is built, matching the manual simulation.
pub const CREATURE_START: (f32, f32) = (6.0, 3.0);

#[derive(Debug, Clone)]
pub struct LabConfig {
    /// How many choreographies to audition
    pub candidates: usize,
    /// Frames each candidate gets before the episode is cut off
    pub frame_budget: usize,
    /// Per-frame reroll probability for variations of the authored gait
    pub variation_rate: f32,
    pub seed: u64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            candidates: 24,
            frame_budget: BASE_TIME,
            variation_rate: 0.1,
            seed: 42,
        }
    }
}

/// A scored candidate: what ran, how it went, what it earned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Audition {
    pub score: f32,
    pub episode: Episode,
    pub choreography: Choreography,
}

impl Audition {
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

pub struct AuditionReport {
    pub best: Audition,
    pub scores: Vec<f32>,
}

/// Runs a set of candidate choreographies headless and keeps the best one.
/// One evaluate-and-select pass; there is no evolutionary loop here.
pub struct ChoreographyLab {
    pub config: LabConfig,
    pub fitness: FitnessConfig,
}

impl ChoreographyLab {
    pub fn new(config: LabConfig) -> Self {
        Self {
            config,
            fitness: FitnessConfig::default(),
        }
    }

    /// The candidate set for this seed: the authored gait first, then
    /// perturbed variations of it, then fully random sequences.
    pub fn candidates(&self) -> Vec<Choreography> {
        let LabConfig {
            candidates,
            frame_budget,
            variation_rate,
            seed,
        } = self.config.clone();
        let candidates = candidates.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let gait = Choreography::walking_gait(frame_budget);
        let mut set = Vec::with_capacity(candidates);
        while set.len() < candidates {
            let candidate = match set.len() {
                0 => gait.clone(),
                n if n <= candidates / 2 => {
                    Choreography::variation_of(&gait, &mut rng, variation_rate)
                }
                _ => Choreography::random(&mut rng, frame_budget),
            };
            set.push(candidate);
        }
        set
    }

    /// Run one choreography in a fresh world until it falls over or the
    /// frame budget runs out.
    pub fn run_episode(choreography: &Choreography, frame_budget: usize) -> Episode {
        let mut world = World::new();
        let (x, y) = CREATURE_START;
        let mut creature = Quadruped::new(&mut world, x, y);
        let mut energy = 0.0;
        let mut frames_survived = 0;
        let mut upright = true;
        for frame in 0..frame_budget {
            creature.relax_all();
            if let Action::Drive { muscle, command } = choreography.action_at(frame) {
                creature.control_muscle(muscle, command);
                energy += 1.0;
            }
            creature.apply_muscles(&mut world);
            world.step();
            frames_survived = frame + 1;
            if creature.is_upside_down(&world) {
                upright = false;
                break;
            }
        }
        Episode {
            distance: creature.distance_travelled(&world),
            energy,
            frames_survived,
            upright,
        }
    }

    /// Evaluate every candidate in parallel and select the highest score.
    /// Ties keep the earliest candidate, so reruns with the same seed pick
    /// the same winner.
    pub fn audition(&self) -> AuditionReport {
        let candidates = self.candidates();
        let frame_budget = self.config.frame_budget;
        let scored: Vec<(f32, Episode)> = candidates
            .par_iter()
            .map(|choreography| {
                let episode = Self::run_episode(choreography, frame_budget);
                (self.fitness.score(&episode), episode)
            })
            .collect();
        let scores: Vec<f32> = scored.iter().map(|(score, _)| *score).collect();
        let mut best_index = 0;
        for (index, score) in scores.iter().enumerate() {
            if *score > scores[best_index] {
                best_index = index;
            }
        }
        let (score, episode) = scored[best_index].clone();
        log::info!(
            "audition winner: candidate {best_index} scored {score:.1} ({:.2} m in {} frames)",
            episode.distance,
            episode.frames_survived,
        );
        AuditionReport {
            best: Audition {
                score,
                episode,
                choreography: candidates[best_index].clone(),
            },
            scores,
        }
    }

    /// How long the winner gets to perform: the base budget, growing
    /// linearly to the ceiling as the score approaches the threshold.
    pub fn replay_budget(score: f32) -> usize {
        let progress = (score / REWARD_THRESHOLD).clamp(0.0, 1.0);
        BASE_TIME + (progress * (MAX_TIME - BASE_TIME) as f32) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_budget_grows_with_score() {
        assert_eq!(ChoreographyLab::replay_budget(0.0), BASE_TIME);
        assert_eq!(ChoreographyLab::replay_budget(-50.0), BASE_TIME);
        assert_eq!(ChoreographyLab::replay_budget(REWARD_THRESHOLD), MAX_TIME);
        assert_eq!(ChoreographyLab::replay_budget(REWARD_THRESHOLD * 4.0), MAX_TIME);
        let halfway = ChoreographyLab::replay_budget(REWARD_THRESHOLD / 2.0);
        assert_eq!(halfway, BASE_TIME + (MAX_TIME - BASE_TIME) / 2);
    }

    #[test]
    fn candidate_set_is_seed_deterministic() {
        let config = LabConfig {
            candidates: 8,
            frame_budget: 40,
            ..LabConfig::default()
        };
        let first = ChoreographyLab::new(config.clone()).candidates();
        let second = ChoreographyLab::new(config).candidates();
        assert_eq!(first.len(), 8);
        assert_eq!(first, second);
    }

    #[test]
    fn candidate_set_leads_with_the_authored_gait() {
        let config = LabConfig {
            candidates: 4,
            frame_budget: 40,
            ..LabConfig::default()
        };
        let set = ChoreographyLab::new(config).candidates();
        assert_eq!(set[0], Choreography::walking_gait(40));
    }
}
