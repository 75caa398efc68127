use serde::{Deserialize, Serialize};

/// Logical input slot exposed to the engine.
///
/// Slot order (the order of [`KeyId::ALL`]) is the order in which callbacks
/// are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyId {
    Up,
    Down,
    Left,
    Right,
    Shoot,
    Cancel,
    Pause,
}

impl KeyId {
    pub const COUNT: usize = 7;

    pub const ALL: [KeyId; Self::COUNT] = [
        KeyId::Up,
        KeyId::Down,
        KeyId::Left,
        KeyId::Right,
        KeyId::Shoot,
        KeyId::Cancel,
        KeyId::Pause,
    ];

    /// Slot index (0-based, matches the position in [`KeyId::ALL`]).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyId::Up => "Up",
            KeyId::Down => "Down",
            KeyId::Left => "Left",
            KeyId::Right => "Right",
            KeyId::Shoot => "Shoot",
            KeyId::Cancel => "Cancel",
            KeyId::Pause => "Pause",
        }
    }
}

impl std::fmt::Display for KeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-key status produced by the input tracker.
///
/// Encoded in two bits: bit 0 is "down on the previous sample", bit 1 is
/// "down on the current sample".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum KeyStatus {
    #[default]
    Off = 0b00,
    /// Was down, now up. Lasts exactly one sample.
    ReleasedEdge = 0b01,
    /// Was up, now down. Lasts exactly one sample.
    PressedEdge = 0b10,
    Held = 0b11,
}

impl KeyStatus {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => KeyStatus::Off,
            0b01 => KeyStatus::ReleasedEdge,
            0b10 => KeyStatus::PressedEdge,
            _ => KeyStatus::Held,
        }
    }

    /// Whether the key was down at the most recent sample.
    pub fn is_down(self) -> bool {
        self.bits() & 0b10 != 0
    }

    /// Whether this is one of the one-sample transient states.
    pub fn is_edge(self) -> bool {
        matches!(self, KeyStatus::PressedEdge | KeyStatus::ReleasedEdge)
    }
}
