use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info, warn};
use retrohost_core::traits::{
    Clock, EventSource, InstantClock, KeyboardState, PresentationSink, WindowHost,
};
use retrohost_types::{HostEvent, PixelFormat, RendererId, Scancode, TextureId, WindowId};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus as LoopStatus};
use winit::window::{Window, WindowAttributes};

use crate::gpu::GpuPresenter;
use crate::keymap::scancode_for;

/// Attempts made to get the window out of the event loop before giving up.
const WINDOW_CREATE_ATTEMPTS: u32 = 50;
const WINDOW_CREATE_WAIT: Duration = Duration::from_millis(10);

const WINDOW: WindowId = WindowId(1);
const RENDERER: RendererId = RendererId(1);
const TEXTURE: TextureId = TextureId(1);

/// Run-phase handler: owns the window and turns winit events into host events.
struct HostState {
    pending_window: Option<WindowAttributes>,
    window: Option<Arc<Window>>,
    window_error: Option<String>,
    events: VecDeque<HostEvent>,
    // State seen by the shim; advances as events are drained.
    keyboard: Vec<bool>,
    // State after every queued event.
    queued_down: Vec<bool>,
    resized: Option<PhysicalSize<u32>>,
}

impl HostState {
    fn new() -> Self {
        Self {
            pending_window: None,
            window: None,
            window_error: None,
            events: VecDeque::new(),
            keyboard: vec![false; Scancode::COUNT],
            queued_down: vec![false; Scancode::COUNT],
            resized: None,
        }
    }

    // Windows can only be created while the loop is active.
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
        let Some(attrs) = self.pending_window.take() else {
            return;
        };
        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.window_error = Some(e.to_string()),
        }
    }

    fn key_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            self.events.push_back(HostEvent::Other);
            return;
        };
        let Some(scancode) = scancode_for(code) else {
            debug!("unmapped key {code:?}");
            self.events.push_back(HostEvent::Other);
            return;
        };
        self.key_transition(scancode, event.state == ElementState::Pressed);
    }

    fn key_transition(&mut self, code: Scancode, down: bool) {
        if let Some(slot) = self.queued_down.get_mut(code.index()) {
            *slot = down;
        }
        self.events.push_back(if down {
            HostEvent::KeyDown(code)
        } else {
            HostEvent::KeyUp(code)
        });
    }

    // Releases are not delivered to an unfocused window.
    fn focus_lost(&mut self) {
        let held: Vec<Scancode> = self
            .queued_down
            .iter()
            .enumerate()
            .filter(|&(_, &down)| down)
            .map(|(index, _)| Scancode(index as u16))
            .collect();
        for code in held {
            self.key_transition(code, false);
        }
        self.events.push_back(HostEvent::FocusLost);
    }

    fn next_event(&mut self) -> Option<HostEvent> {
        let event = self.events.pop_front()?;
        let change = match event {
            HostEvent::KeyDown(code) => Some((code, true)),
            HostEvent::KeyUp(code) => Some((code, false)),
            _ => None,
        };
        if let Some((code, down)) = change
            && let Some(slot) = self.keyboard.get_mut(code.index())
        {
            *slot = down;
        }
        Some(event)
    }

    fn reset_input(&mut self) {
        self.events.clear();
        self.keyboard.fill(false);
        self.queued_down.fill(false);
    }
}

impl ApplicationHandler for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.events.push_back(HostEvent::Quit);
            }
            WindowEvent::KeyboardInput { event, .. } => self.key_event(&event),
            WindowEvent::Focused(true) => self.events.push_back(HostEvent::FocusGained),
            WindowEvent::Focused(false) => self.focus_lost(),
            WindowEvent::Resized(size) => {
                self.resized = Some(size);
                self.events.push_back(HostEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }
            _ => self.events.push_back(HostEvent::Other),
        }
    }
}

/// Desktop host: a winit window presented through wgpu.
pub struct WinitHost {
    event_loop: Option<EventLoop<()>>,
    state: HostState,
    gpu: Option<GpuPresenter>,
    clock: InstantClock,
}

impl WinitHost {
    /// Connect to the platform event loop. Only one host may exist per process.
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        Ok(Self {
            event_loop: Some(event_loop),
            state: HostState::new(),
            gpu: None,
            clock: InstantClock::new(),
        })
    }

    /// Run the event loop once without blocking. Returns `false` once the
    /// loop has exited.
    fn pump_loop(&mut self) -> bool {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return false;
        };
        if let LoopStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.state) {
            info!("event loop exited with code {code}");
            self.event_loop = None;
            self.state.events.push_back(HostEvent::Quit);
            return false;
        }
        if let Some(size) = self.state.resized.take()
            && let Some(gpu) = self.gpu.as_mut()
        {
            gpu.resize(size.width, size.height);
        }
        true
    }

    fn gpu_mut(&mut self) -> Result<&mut GpuPresenter> {
        self.gpu.as_mut().ok_or_else(|| anyhow!("renderer is not initialized"))
    }
}

impl WindowHost for WinitHost {
    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<WindowId> {
        if self.state.window.is_some() {
            bail!("a window is already open");
        }
        self.state.pending_window = Some(
            Window::default_attributes()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(width, height))
                .with_resizable(false),
        );

        for _ in 0..WINDOW_CREATE_ATTEMPTS {
            if !self.pump_loop() {
                bail!("event loop exited before the window was created");
            }
            if let Some(error) = self.state.window_error.take() {
                self.state.pending_window = None;
                bail!("{error}");
            }
            if self.state.window.is_some() {
                info!("window created: \"{title}\" {width}x{height}");
                return Ok(WINDOW);
            }
            std::thread::sleep(WINDOW_CREATE_WAIT);
        }

        self.state.pending_window = None;
        bail!("window was not created within {WINDOW_CREATE_ATTEMPTS} loop iterations")
    }

    fn create_renderer(&mut self, window: WindowId) -> Result<RendererId> {
        if window != WINDOW {
            bail!("unknown window {window:?}");
        }
        let handle = self
            .state
            .window
            .clone()
            .ok_or_else(|| anyhow!("window is not open"))?;
        self.gpu = Some(pollster::block_on(GpuPresenter::new(handle))?);
        Ok(RENDERER)
    }

    fn destroy_all(&mut self) {
        // Surface before window.
        self.gpu = None;
        if self.state.window.take().is_some() {
            debug!("window destroyed");
        }
        self.state.pending_window = None;
        self.state.reset_input();
    }
}

impl PresentationSink for WinitHost {
    fn create_texture(
        &mut self,
        renderer: RendererId,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<TextureId> {
        if renderer != RENDERER {
            bail!("unknown renderer {renderer:?}");
        }
        self.gpu_mut()?.create_texture(format, width, height)?;
        Ok(TEXTURE)
    }

    fn upload_pixels(&mut self, texture: TextureId, pixels: &[u8], stride: usize) -> Result<()> {
        if texture != TEXTURE {
            bail!("unknown texture {texture:?}");
        }
        self.gpu_mut()?.upload(pixels, stride)
    }

    fn present(&mut self, renderer: RendererId, texture: TextureId) -> Result<()> {
        if renderer != RENDERER || texture != TEXTURE {
            bail!("unknown renderer/texture pair {renderer:?}/{texture:?}");
        }
        if let Some(window) = self.state.window.as_ref() {
            window.pre_present_notify();
        }
        self.gpu_mut()?.present()
    }
}

impl EventSource for WinitHost {
    fn pump(&mut self) {
        if !self.pump_loop() && self.state.events.is_empty() {
            warn!("pumping a closed event loop");
            self.state.events.push_back(HostEvent::Quit);
        }
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.state.next_event()
    }
}

impl KeyboardState for WinitHost {
    fn keyboard_state(&self) -> &[bool] {
        &self.state.keyboard
    }
}

impl Clock for WinitHost {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(state: &mut HostState) -> Vec<HostEvent> {
        std::iter::from_fn(|| state.next_event()).collect()
    }

    #[test]
    fn test_keyboard_follows_drained_events() {
        let mut state = HostState::new();
        state.key_transition(Scancode::Z, true);
        state.key_transition(Scancode::Z, false);
        assert!(!state.keyboard[Scancode::Z.index()]);

        assert_eq!(state.next_event(), Some(HostEvent::KeyDown(Scancode::Z)));
        assert!(state.keyboard[Scancode::Z.index()]);
        assert_eq!(state.next_event(), Some(HostEvent::KeyUp(Scancode::Z)));
        assert!(!state.keyboard[Scancode::Z.index()]);
    }

    #[test]
    fn test_focus_loss_releases_every_held_key() {
        let mut state = HostState::new();
        state.key_transition(Scancode::RIGHT, true);
        assert_eq!(drain(&mut state), vec![HostEvent::KeyDown(Scancode::RIGHT)]);

        state.key_transition(Scancode::UP, true);
        state.focus_lost();
        assert_eq!(
            drain(&mut state),
            vec![
                HostEvent::KeyDown(Scancode::UP),
                HostEvent::KeyUp(Scancode::RIGHT),
                HostEvent::KeyUp(Scancode::UP),
                HostEvent::FocusLost,
            ]
        );
        assert!(state.keyboard.iter().all(|&down| !down));
    }

    #[test]
    fn test_focus_loss_with_nothing_held() {
        let mut state = HostState::new();
        state.focus_lost();
        assert_eq!(drain(&mut state), vec![HostEvent::FocusLost]);
    }

    #[test]
    fn test_reset_input_drops_pending_keys() {
        let mut state = HostState::new();
        state.key_transition(Scancode::X, true);
        state.next_event();
        state.key_transition(Scancode::Z, true);
        state.reset_input();

        assert!(drain(&mut state).is_empty());
        assert!(state.keyboard.iter().all(|&down| !down));
        state.focus_lost();
        assert_eq!(drain(&mut state), vec![HostEvent::FocusLost]);
    }
}
