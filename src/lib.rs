use std::fmt::{Debug, Formatter};

use winit::event_loop::EventLoopProxy;

use crate::choreography::lab::Audition;
use crate::wgpu::Wgpu;

pub mod application;
pub mod camera;
pub mod choreography;
pub mod creature;
pub mod crucible;
pub mod keyboard;
pub mod parallax;
pub mod scene;
pub mod stats;
pub mod units;
pub mod wgpu;
pub mod world;

pub const TARGET_FPS: u32 = 60;
pub const TIME_STEP: f32 = 1.0 / TARGET_FPS as f32;

/// How a muscle motor is being driven this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MuscleCommand {
    Contract,
    Extend,
    Relax,
}

/// Visual presentation of the fox, cycled with Tab.
#[derive(Debug, Clone, Copy, PartialEq, Default, strum::Display, strum::EnumIter)]
pub enum RenderStyle {
    #[default]
    Textured,
    Skeleton,
    Overlay,
}

impl RenderStyle {
    pub fn next(self) -> Self {
        match self {
            RenderStyle::Textured => RenderStyle::Skeleton,
            RenderStyle::Skeleton => RenderStyle::Overlay,
            RenderStyle::Overlay => RenderStyle::Textured,
        }
    }

    pub fn show_skeleton(&self) -> bool {
        matches!(self, RenderStyle::Skeleton | RenderStyle::Overlay)
    }

    pub fn show_texture(&self) -> bool {
        matches!(self, RenderStyle::Textured | RenderStyle::Overlay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlState {
    Manual,
    Replaying,
    Paused,
}

#[derive(Debug, Clone)]
pub enum CrucibleAction {
    BuildCreature,
    Muscle {
        index: usize,
        command: MuscleCommand,
    },
    RelaxAll,
    StartReplay(Box<Audition>),
    SetSpeed(f32),
    TogglePaused,
}

impl CrucibleAction {
    pub fn send(self, radio: &Radio) {
        LabEvent::Crucible(self).send(radio);
    }
}

#[derive(Debug, Clone)]
pub enum StateChange {
    ToggleRenderStyle,
    SetControlState(ControlState),
    ResetView,
}

impl StateChange {
    pub fn send(self, radio: &Radio) {
        LabEvent::UpdateState(self).send(radio);
    }
}

#[derive(Clone)]
pub enum LabEvent {
    ContextCreated(Wgpu),
    Crucible(CrucibleAction),
    UpdateState(StateChange),
}

impl Debug for LabEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LabEvent::ContextCreated(_) => "ContextCreated".to_string(),
            LabEvent::Crucible(action) => format!("Crucible({action:?})"),
            LabEvent::UpdateState(change) => format!("UpdateState({change:?})"),
        };
        write!(f, "LabEvent::{name}")
    }
}

pub type Radio = EventLoopProxy<LabEvent>;

impl LabEvent {
    pub fn send(self, radio: &Radio) {
        radio.send_event(self).expect("Radio working")
    }
}
