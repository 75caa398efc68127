use crate::scancode::Scancode;

/// Event drained from the host event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Window close or application quit request.
    Quit,
    KeyDown(Scancode),
    KeyUp(Scancode),
    FocusGained,
    FocusLost,
    Resized { width: u32, height: u32 },
    /// Anything the shim has no use for.
    Other,
}

impl HostEvent {
    /// Whether the event reports keyboard activity.
    pub fn is_keyboard(&self) -> bool {
        matches!(self, HostEvent::KeyDown(_) | HostEvent::KeyUp(_))
    }
}

/// Result of one event pump call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStatus {
    Continue,
    Quit,
}

impl PumpStatus {
    pub fn is_quit(self) -> bool {
        self == PumpStatus::Quit
    }
}

/// Opaque window handle handed out by a host backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Opaque renderer handle handed out by a host backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(pub u64);

/// Opaque texture handle handed out by a host backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);
