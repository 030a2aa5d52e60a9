use std::path::{Path, PathBuf};

use clap::Parser;
use winit::dpi::PhysicalSize;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::Window;

use fox_lab::application::{Application, RunMode};
use fox_lab::choreography::lab::{Audition, ChoreographyLab, LabConfig, BASE_TIME};
use fox_lab::stats::AuditionLog;
use fox_lab::units::Seconds;
use fox_lab::{LabEvent, TIME_STEP};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Audition this many candidate choreographies headless, then replay the winner
    #[arg(long)]
    audition: Option<usize>,

    /// Seed for candidate generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Frame budget per audition episode
    #[arg(long, default_value_t = BASE_TIME)]
    frames: usize,

    /// Replay a previously saved choreography instead of auditioning
    #[arg(long)]
    replay: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let run_mode = if let Some(path) = &args.replay {
        let audition = Audition::load(path).expect("unable to load choreography");
        log::info!(
            "replaying {path:?}: score {:.1}, {:.2} m",
            audition.score,
            audition.episode.distance
        );
        RunMode::Replay(audition)
    } else if let Some(candidates) = args.audition {
        let lab = ChoreographyLab::new(LabConfig {
            candidates,
            frame_budget: args.frames,
            seed: args.seed,
            ..LabConfig::default()
        });
        log::info!(
            "auditioning {candidates} candidates for {} frames ({}) each, seed {}",
            args.frames,
            Seconds(args.frames as f32 * TIME_STEP),
            args.seed
        );
        let report = lab.audition();
        AuditionLog::new("data/audition_log.csv")
            .append(&lab.config, &report)
            .expect("unable to write audition log");
        report
            .best
            .save(Path::new("data/best_choreography.json"))
            .expect("unable to save choreography");
        RunMode::Replay(report.best)
    } else {
        RunMode::Manual
    };

    let event_loop = EventLoop::<LabEvent>::with_user_event()
        .build()
        .expect("Could not build event loop");
    event_loop.set_control_flow(ControlFlow::Poll);
    let radio = event_loop.create_proxy();
    let window_attributes = Window::default_attributes()
        .with_title("Fox Lab")
        .with_inner_size(PhysicalSize::new(1200, 700));
    let mut app = Application::new(window_attributes, run_mode, radio);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
