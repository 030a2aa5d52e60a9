use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::choreography::lab::Audition;
use crate::crucible::Crucible;
use crate::keyboard::Keyboard;
use crate::scene::Scene;
use crate::wgpu::Wgpu;
use crate::{CrucibleAction, LabEvent, Radio, StateChange};

/// What the window should do once the GPU context exists.
pub enum RunMode {
    Manual,
    Replay(Audition),
}

pub struct Application {
    window_attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
    crucible: Crucible,
    keyboard: Keyboard,
    run_mode: Option<RunMode>,
    radio: Radio,
    frames_rendered: u32,
    fps_marker: Instant,
}

impl Application {
    pub fn new(window_attributes: WindowAttributes, run_mode: RunMode, radio: Radio) -> Self {
        Self {
            window_attributes,
            window: None,
            scene: None,
            crucible: Crucible::new(radio.clone()),
            keyboard: Keyboard::new(radio.clone()).with_actions(),
            run_mode: Some(run_mode),
            radio,
            frames_rendered: 0,
            fps_marker: Instant::now(),
        }
    }

    fn handle_key_event(&mut self, event_loop: &ActiveEventLoop, key_event: KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::Escape),
            ..
        } = key_event
        {
            if key_event.state.is_pressed() {
                event_loop.exit();
            }
            return;
        }
        self.keyboard
            .handle_key_event(&key_event, &self.crucible.control_state());
    }

    fn log_legend(&self) {
        for line in self.keyboard.legend(&self.crucible.control_state()) {
            log::info!("  {line}");
        }
    }

    fn redraw(&mut self) {
        self.crucible.iterate();
        if let Some(scene) = &mut self.scene {
            scene.redraw(&self.crucible);
            self.frames_rendered += 1;
            if self.frames_rendered >= 300 {
                let elapsed = self.fps_marker.elapsed().as_secs_f32();
                log::debug!("{:.0} frames per second", self.frames_rendered as f32 / elapsed);
                self.frames_rendered = 0;
                self.fps_marker = Instant::now();
            }
        }
    }
}

impl ApplicationHandler<LabEvent> for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(self.window_attributes.clone())
                .expect("Could not build window"),
        );
        self.window = Some(window.clone());
        Wgpu::create_and_send(window, self.radio.clone());
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: LabEvent) {
        match event {
            LabEvent::ContextCreated(wgpu) => {
                self.scene = Some(Scene::new(wgpu));
                CrucibleAction::BuildCreature.send(&self.radio);
                if let Some(RunMode::Replay(audition)) = self.run_mode.take() {
                    CrucibleAction::StartReplay(Box::new(audition)).send(&self.radio);
                }
            }
            LabEvent::Crucible(crucible_action) => {
                self.crucible.action(crucible_action);
            }
            LabEvent::UpdateState(state_change) => match state_change {
                StateChange::ToggleRenderStyle => {
                    if let Some(scene) = &mut self.scene {
                        scene.toggle_render_style();
                    }
                }
                StateChange::ResetView => {
                    if let Some(scene) = &mut self.scene {
                        scene.reset_view();
                    }
                }
                StateChange::SetControlState(control_state) => {
                    log::info!("{control_state:?}:");
                    self.log_legend();
                }
            },
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => self.handle_key_event(event_loop, key_event),
            WindowEvent::Resized(size) => {
                if let Some(scene) = &mut self.scene {
                    scene.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
