use std::collections::VecDeque;

use anyhow::{Result, anyhow};
use retrohost_types::{HostEvent, PixelFormat, RendererId, Scancode, TextureId, WindowId};

use crate::error::InitStage;
use crate::traits::{
    Clock, EventSource, KeyboardState, ManualClock, PresentationSink, WindowHost,
};

/// Recorded host call for testing.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CreateWindow {
        title: String,
        width: u32,
        height: u32,
    },
    CreateRenderer(WindowId),
    CreateTexture {
        renderer: RendererId,
        format: PixelFormat,
        width: u32,
        height: u32,
    },
    Upload {
        texture: TextureId,
        stride: usize,
        pixels: Vec<u8>,
    },
    Present {
        renderer: RendererId,
        texture: TextureId,
    },
    DestroyAll,
    Pump,
}

/// A mock host that records every capability call and plays back scripted
/// events and keyboard state. Does not require a window or GPU.
pub struct ScriptedHost {
    calls: Vec<HostCall>,
    events: VecDeque<HostEvent>,
    keyboard: Vec<bool>,
    clock: ManualClock,
    fail_stage: Option<InitStage>,
    fail_present: bool,
    next_id: u64,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            events: VecDeque::new(),
            keyboard: vec![false; Scancode::COUNT],
            clock: ManualClock::new(),
            fail_stage: None,
            fail_present: false,
            next_id: 1,
        }
    }

    /// Make the given initialization step fail.
    pub fn failing_at(mut self, stage: InitStage) -> Self {
        self.fail_stage = Some(stage);
        self
    }

    /// Make every upload/present fail, as a lost display surface would.
    pub fn set_present_failure(&mut self, fail: bool) {
        self.fail_present = fail;
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Most recent upload as `(stride, pixels)`.
    pub fn last_upload(&self) -> Option<(usize, &[u8])> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::Upload { stride, pixels, .. } => Some((*stride, pixels.as_slice())),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    /// Queue an event. Key events change the keyboard state when drained.
    pub fn push_event(&mut self, event: HostEvent) {
        self.events.push_back(event);
    }

    /// Queue a key press.
    pub fn press(&mut self, code: Scancode) {
        self.events.push_back(HostEvent::KeyDown(code));
    }

    /// Queue a key release.
    pub fn release(&mut self, code: Scancode) {
        self.events.push_back(HostEvent::KeyUp(code));
    }

    /// Queue a release for every key that is down once the queue is
    /// drained, followed by [`HostEvent::FocusLost`].
    pub fn lose_focus(&mut self) {
        let mut down = self.keyboard.clone();
        for event in &self.events {
            match *event {
                HostEvent::KeyDown(code) => apply_key(&mut down, code, true),
                HostEvent::KeyUp(code) => apply_key(&mut down, code, false),
                _ => {}
            }
        }
        for (index, _) in down.iter().enumerate().filter(|&(_, &is_down)| is_down) {
            self.events.push_back(HostEvent::KeyUp(Scancode(index as u16)));
        }
        self.events.push_back(HostEvent::FocusLost);
    }

    /// Change the raw keyboard state without queueing an event.
    pub fn set_key(&mut self, code: Scancode, down: bool) {
        apply_key(&mut self.keyboard, code, down);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn check_stage(&self, stage: InitStage) -> Result<()> {
        if self.fail_stage == Some(stage) {
            return Err(anyhow!("scripted failure"));
        }
        Ok(())
    }
}

fn apply_key(keyboard: &mut [bool], code: Scancode, down: bool) {
    if let Some(slot) = keyboard.get_mut(code.index()) {
        *slot = down;
    }
}

impl WindowHost for ScriptedHost {
    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<WindowId> {
        self.check_stage(InitStage::Window)?;
        self.calls.push(HostCall::CreateWindow {
            title: title.to_string(),
            width,
            height,
        });
        Ok(WindowId(self.alloc_id()))
    }

    fn create_renderer(&mut self, window: WindowId) -> Result<RendererId> {
        self.check_stage(InitStage::Renderer)?;
        self.calls.push(HostCall::CreateRenderer(window));
        Ok(RendererId(self.alloc_id()))
    }

    fn destroy_all(&mut self) {
        self.calls.push(HostCall::DestroyAll);
    }
}

impl PresentationSink for ScriptedHost {
    fn create_texture(
        &mut self,
        renderer: RendererId,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<TextureId> {
        self.check_stage(InitStage::Texture)?;
        self.calls.push(HostCall::CreateTexture {
            renderer,
            format,
            width,
            height,
        });
        Ok(TextureId(self.alloc_id()))
    }

    fn upload_pixels(&mut self, texture: TextureId, pixels: &[u8], stride: usize) -> Result<()> {
        if self.fail_present {
            return Err(anyhow!("surface lost"));
        }
        self.calls.push(HostCall::Upload {
            texture,
            stride,
            pixels: pixels.to_vec(),
        });
        Ok(())
    }

    fn present(&mut self, renderer: RendererId, texture: TextureId) -> Result<()> {
        if self.fail_present {
            return Err(anyhow!("surface lost"));
        }
        self.calls.push(HostCall::Present { renderer, texture });
        Ok(())
    }
}

impl EventSource for ScriptedHost {
    fn pump(&mut self) {
        self.calls.push(HostCall::Pump);
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        let event = self.events.pop_front()?;
        match event {
            HostEvent::KeyDown(code) => apply_key(&mut self.keyboard, code, true),
            HostEvent::KeyUp(code) => apply_key(&mut self.keyboard, code, false),
            _ => {}
        }
        Some(event)
    }
}

impl KeyboardState for ScriptedHost {
    fn keyboard_state(&self) -> &[bool] {
        &self.keyboard
    }
}

impl Clock for ScriptedHost {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
