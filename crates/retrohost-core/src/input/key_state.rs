use retrohost_types::{KeyStatus, Scancode};

/// Advance a key status by one raw sample.
///
/// The new status is `previous_down | raw_down << 1`, where `previous_down`
/// is the "current" bit of the old status. Every change of the raw state
/// therefore spends exactly one sample in an edge state.
pub fn next_status(prev: KeyStatus, raw_down: bool) -> KeyStatus {
    KeyStatus::from_bits((prev.bits() >> 1) | ((raw_down as u8) << 1))
}

/// State of a single logical key slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySlot {
    /// Hardware binding. Unbound slots never activate.
    pub binding: Option<Scancode>,
    pub status: KeyStatus,
    /// Timestamp of the last press edge (milliseconds, host clock).
    pub press_time_ms: Option<u64>,
    /// Timestamp of the last release edge (milliseconds, host clock).
    pub release_time_ms: Option<u64>,
}

impl KeySlot {
    pub fn new(binding: Option<Scancode>) -> Self {
        Self {
            binding,
            ..Self::default()
        }
    }

    /// Feed one raw sample. Raw input on an unbound slot is treated as up.
    pub fn sample(&mut self, raw_down: bool) -> KeyStatus {
        let raw_down = raw_down && self.binding.is_some();
        self.status = next_status(self.status, raw_down);
        self.status
    }

    /// Feed one raw sample and stamp edge times.
    pub fn sample_at(&mut self, raw_down: bool, now_ms: u64) -> KeyStatus {
        match self.sample(raw_down) {
            KeyStatus::PressedEdge => self.press_time_ms = Some(now_ms),
            KeyStatus::ReleasedEdge => self.release_time_ms = Some(now_ms),
            KeyStatus::Off | KeyStatus::Held => {}
        }
        self.status
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.binding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        use KeyStatus::*;
        let cases = [
            (Off, true, PressedEdge),
            (Off, false, Off),
            (ReleasedEdge, true, PressedEdge),
            (ReleasedEdge, false, Off),
            (PressedEdge, true, Held),
            (PressedEdge, false, ReleasedEdge),
            (Held, true, Held),
            (Held, false, ReleasedEdge),
        ];
        for (prev, raw, expected) in cases {
            assert_eq!(
                next_status(prev, raw),
                expected,
                "{prev:?} with raw_down={raw}"
            );
        }
    }

    #[test]
    fn test_key_slot_default() {
        let slot = KeySlot::new(Some(Scancode::Z));
        assert_eq!(slot.status, KeyStatus::Off);
        assert_eq!(slot.press_time_ms, None);
        assert_eq!(slot.release_time_ms, None);
    }

    #[test]
    fn test_press_and_release_stamp_times() {
        let mut slot = KeySlot::new(Some(Scancode::Z));
        assert_eq!(slot.sample_at(true, 1000), KeyStatus::PressedEdge);
        assert_eq!(slot.sample_at(true, 1016), KeyStatus::Held);
        assert_eq!(slot.press_time_ms, Some(1000));

        assert_eq!(slot.sample_at(false, 2000), KeyStatus::ReleasedEdge);
        assert_eq!(slot.sample_at(false, 2016), KeyStatus::Off);
        assert_eq!(slot.release_time_ms, Some(2000));
        assert_eq!(slot.press_time_ms, Some(1000));
    }

    #[test]
    fn test_unbound_slot_ignores_raw_input() {
        let mut slot = KeySlot::new(None);
        for _ in 0..3 {
            assert_eq!(slot.sample(true), KeyStatus::Off);
        }
    }

    #[test]
    fn test_reset_keeps_binding() {
        let mut slot = KeySlot::new(Some(Scancode::X));
        slot.sample_at(true, 5);
        slot.reset();
        assert_eq!(slot.status, KeyStatus::Off);
        assert_eq!(slot.press_time_ms, None);
        assert_eq!(slot.binding, Some(Scancode::X));
    }
}
