use std::fmt::Display;

use winit::event::KeyEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::creature::MuscleName;
use crate::{ControlState, CrucibleAction, LabEvent, MuscleCommand, Radio, StateChange};

struct KeyAction {
    code: KeyCode,
    description: String,
    on_press: LabEvent,
    on_release: Option<LabEvent>,
    is_active_in: Box<dyn Fn(&ControlState) -> bool>,
}

impl Display for KeyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// Maps physical keys onto lab events, filtered by the control state, so a
/// muscle key does nothing while a replay is running.
pub struct Keyboard {
    radio: Radio,
    actions: Vec<KeyAction>,
}

impl Keyboard {
    pub fn new(radio: Radio) -> Self {
        Self {
            radio,
            actions: Default::default(),
        }
    }

    pub fn with_actions(mut self) -> Self {
        let manual_only = || Box::new(|state: &ControlState| matches!(state, ControlState::Manual));
        let muscle_keys: [(KeyCode, KeyCode, MuscleName); 8] = [
            (KeyCode::KeyQ, KeyCode::KeyA, MuscleName::FrontHip),
            (KeyCode::KeyW, KeyCode::KeyS, MuscleName::FrontKnee),
            (KeyCode::KeyE, KeyCode::KeyD, MuscleName::FrontAnkle),
            (KeyCode::KeyR, KeyCode::KeyF, MuscleName::FrontToe),
            (KeyCode::KeyU, KeyCode::KeyJ, MuscleName::BackHip),
            (KeyCode::KeyI, KeyCode::KeyK, MuscleName::BackKnee),
            (KeyCode::KeyO, KeyCode::KeyL, MuscleName::BackAnkle),
            (KeyCode::KeyP, KeyCode::Semicolon, MuscleName::BackToe),
        ];
        for (contract_key, extend_key, muscle) in muscle_keys {
            let index = muscle as usize;
            self.add_action(
                contract_key,
                &format!("{contract_key:?}/{extend_key:?} {muscle}"),
                LabEvent::Crucible(CrucibleAction::Muscle {
                    index,
                    command: MuscleCommand::Contract,
                }),
                Some(LabEvent::Crucible(CrucibleAction::Muscle {
                    index,
                    command: MuscleCommand::Relax,
                })),
                manual_only(),
            );
            self.add_action(
                extend_key,
                "",
                LabEvent::Crucible(CrucibleAction::Muscle {
                    index,
                    command: MuscleCommand::Extend,
                }),
                Some(LabEvent::Crucible(CrucibleAction::Muscle {
                    index,
                    command: MuscleCommand::Relax,
                })),
                manual_only(),
            );
        }
        // a key release can get lost when the window loses focus
        self.add_action(
            KeyCode::Backspace,
            "Backspace relax all",
            LabEvent::Crucible(CrucibleAction::RelaxAll),
            None,
            manual_only(),
        );
        self.add_action(
            KeyCode::Tab,
            "Tab render style",
            LabEvent::UpdateState(StateChange::ToggleRenderStyle),
            None,
            Box::new(|_| true),
        );
        self.add_action(
            KeyCode::Space,
            "Space pause",
            LabEvent::Crucible(CrucibleAction::TogglePaused),
            None,
            Box::new(|_| true),
        );
        self.add_action(
            KeyCode::ArrowUp,
            "\u{2191} faster",
            LabEvent::Crucible(CrucibleAction::SetSpeed(2.0)),
            None,
            Box::new(|state| !matches!(state, ControlState::Paused)),
        );
        self.add_action(
            KeyCode::ArrowDown,
            "\u{2193} slower",
            LabEvent::Crucible(CrucibleAction::SetSpeed(0.5)),
            None,
            Box::new(|state| !matches!(state, ControlState::Paused)),
        );
        self.add_action(
            KeyCode::KeyZ,
            "Z recenter view",
            LabEvent::UpdateState(StateChange::ResetView),
            None,
            Box::new(|_| true),
        );
        self
    }

    pub fn handle_key_event(&self, key_event: &KeyEvent, control_state: &ControlState) {
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return;
        };
        if key_event.repeat {
            return;
        }
        for action in self
            .actions
            .iter()
            .filter(|action| action.code == code && (action.is_active_in)(control_state))
        {
            if key_event.state.is_pressed() {
                action.on_press.clone().send(&self.radio);
            } else if let Some(on_release) = &action.on_release {
                on_release.clone().send(&self.radio);
            }
        }
    }

    pub fn legend(&self, control_state: &ControlState) -> Vec<String> {
        self.actions
            .iter()
            .filter(|action| !action.description.is_empty())
            .filter(|action| (action.is_active_in)(control_state))
            .map(|action| action.description.clone())
            .collect()
    }

    fn add_action(
        &mut self,
        code: KeyCode,
        description: &str,
        on_press: LabEvent,
        on_release: Option<LabEvent>,
        is_active_in: Box<dyn Fn(&ControlState) -> bool>,
    ) {
        self.actions.push(KeyAction {
            code,
            description: description.into(),
            on_press,
            on_release,
            is_active_in,
        });
    }
}
