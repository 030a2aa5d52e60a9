use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::choreography::lab::{AuditionReport, ChoreographyLab, LabConfig};

/// Appends one CSV row per audition, for plotting training progress
/// outside the simulator. The header is written when the file is created.
pub struct AuditionLog {
    path: PathBuf,
}

const HEADER: &str = "timestamp,seed,candidates,frame_budget,\
score_best,score_worst,score_mean,score_median,score_std,\
best_distance,best_frames,best_upright,replay_budget";

impl AuditionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, config: &LabConfig, report: &AuditionReport) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let fresh = !self.path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        if fresh {
            writeln!(file, "{HEADER}")?;
        }
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let scores = &report.scores;
        let best = &report.best;
        writeln!(
            file,
            "{now},{seed},{candidates},{frame_budget},\
             {best_score:.2},{worst:.2},{mean:.2},{median:.2},{std:.2},\
             {distance:.3},{frames},{upright},{replay}",
            seed = config.seed,
            candidates = config.candidates,
            frame_budget = config.frame_budget,
            best_score = best.score,
            worst = minimum(scores),
            mean = mean(scores),
            median = median(scores),
            std = std_deviation(scores),
            distance = best.episode.distance,
            frames = best.episode.frames_survived,
            upright = best.episode.upright,
            replay = ChoreographyLab::replay_budget(best.score),
        )
    }
}

fn minimum(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::INFINITY, f32::min)
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

fn median(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn std_deviation(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    let variance =
        values.iter().map(|value| (value - mean).powi(2)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreography::fitness::Episode;
    use crate::choreography::lab::Audition;
    use crate::choreography::Choreography;

    #[test]
    fn summary_statistics() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(minimum(&values), 1.0);
        assert_eq!(mean(&values), 2.5);
        assert_eq!(median(&values), 2.5);
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
        assert!((std_deviation(&values) - 1.118_034).abs() < 1e-5);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn header_is_written_exactly_once() {
        let path = std::env::temp_dir().join(format!(
            "fox_lab_audition_log_{}.csv",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let log = AuditionLog::new(&path);
        let config = LabConfig::default();
        let report = AuditionReport {
            best: Audition {
                score: 12.5,
                episode: Episode {
                    distance: 0.5,
                    energy: 10.0,
                    frames_survived: 100,
                    upright: true,
                },
                choreography: Choreography { frames: vec![0, 1, 2] },
            },
            scores: vec![12.5, -3.0, 4.0],
        };
        log.append(&config, &report).unwrap();
        log.append(&config, &report).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,seed"));
        assert!(lines[1].contains("12.50"));
        // Identical rows apart from the timestamp column
        let tail = |line: &str| line.split_once(',').map(|(_, rest)| rest.to_string());
        assert_eq!(tail(lines[1]), tail(lines[2]));
        std::fs::remove_file(&path).unwrap();
    }
}
