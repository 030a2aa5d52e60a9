use serde::{Deserialize, Serialize};

/// What one headless run of a choreography produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Horizontal meters covered by the spine
    pub distance: f32,
    /// Number of frames that drove a muscle
    pub energy: f32,
    pub frames_survived: usize,
    /// False when the episode ended belly-up
    pub upright: bool,
}

/// Weights for turning an episode into a single score.
///
/// score = distance * distance_weight
///       + (upright ? stability_bonus : fallen_penalty)
///       - energy * energy_penalty
///       + frames_survived * time_bonus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessConfig {
    pub distance_weight: f32,
    pub stability_bonus: f32,
    pub fallen_penalty: f32,
    pub energy_penalty: f32,
    pub time_bonus: f32,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            distance_weight: 100.0,
            stability_bonus: 50.0,
            fallen_penalty: -100.0,
            energy_penalty: 0.1,
            time_bonus: 0.5,
        }
    }
}

impl FitnessConfig {
    pub fn score(&self, episode: &Episode) -> f32 {
        let stability = if episode.upright {
            self.stability_bonus
        } else {
            self.fallen_penalty
        };
        episode.distance * self.distance_weight + stability
            - episode.energy * self.energy_penalty
            + episode.frames_survived as f32 * self.time_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(distance: f32, energy: f32, frames_survived: usize, upright: bool) -> Episode {
        Episode {
            distance,
            energy,
            frames_survived,
            upright,
        }
    }

    #[test]
    fn falling_costs_the_stability_margin() {
        let config = FitnessConfig::default();
        let standing = config.score(&episode(1.0, 0.0, 100, true));
        let fallen = config.score(&episode(1.0, 0.0, 100, false));
        assert_eq!(standing - fallen, 150.0);
    }

    #[test]
    fn distance_dominates_energy() {
        let config = FitnessConfig::default();
        let walker = config.score(&episode(2.0, 500.0, 500, true));
        let idler = config.score(&episode(0.0, 0.0, 500, true));
        assert!(walker > idler);
    }

    #[test]
    fn energy_is_a_penalty() {
        let config = FitnessConfig::default();
        let thrifty = config.score(&episode(1.0, 10.0, 500, true));
        let wasteful = config.score(&episode(1.0, 400.0, 500, true));
        assert!(thrifty > wasteful);
    }

    #[test]
    fn surviving_longer_scores_higher() {
        let config = FitnessConfig::default();
        let long = config.score(&episode(0.0, 0.0, 500, true));
        let short = config.score(&episode(0.0, 0.0, 100, true));
        assert_eq!(long - short, 200.0);
    }
}
