use retrohost_types::{KeyId, KeyStatus};

use crate::input::key_bindings::KeyBindings;
use crate::input::key_state::KeySlot;

/// Edge-detecting tracker for every logical key.
///
/// Status only changes inside [`InputTracker::sample`] and
/// [`InputTracker::refresh`]; all queries are side-effect free.
pub struct InputTracker {
    slots: [KeySlot; KeyId::COUNT],
    samples: u64,
}

impl InputTracker {
    pub fn new(bindings: &KeyBindings) -> Self {
        let mut slots = [KeySlot::default(); KeyId::COUNT];
        for (key, code) in bindings.iter() {
            slots[key.index()] = KeySlot::new(code);
        }
        Self { slots, samples: 0 }
    }

    /// Feed one raw sample for a single key.
    pub fn sample(&mut self, key: KeyId, raw_down: bool) {
        self.slots[key.index()].sample(raw_down);
    }

    /// Re-read the whole keyboard and sample every slot once.
    ///
    /// `keyboard` is indexed by scancode. Unbound slots and scancodes outside
    /// the array sample as up.
    pub fn refresh(&mut self, keyboard: &[bool], now_ms: u64) {
        for slot in &mut self.slots {
            let raw_down = slot
                .binding
                .and_then(|code| keyboard.get(code.index()).copied())
                .unwrap_or(false);
            slot.sample_at(raw_down, now_ms);
        }
        self.samples += 1;
    }

    pub fn status(&self, key: KeyId) -> KeyStatus {
        self.slots[key.index()].status
    }

    pub fn is_down(&self, key: KeyId) -> bool {
        self.status(key).is_down()
    }

    pub fn just_pressed(&self, key: KeyId) -> bool {
        self.status(key) == KeyStatus::PressedEdge
    }

    pub fn just_released(&self, key: KeyId) -> bool {
        self.status(key) == KeyStatus::ReleasedEdge
    }

    pub fn slot(&self, key: KeyId) -> &KeySlot {
        &self.slots[key.index()]
    }

    /// `(key, status)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyId, KeyStatus)> + '_ {
        KeyId::ALL
            .iter()
            .map(|&key| (key, self.slots[key.index()].status))
    }

    /// Number of full refresh passes performed so far.
    pub fn refresh_count(&self) -> u64 {
        self.samples
    }

    /// Return every key to `Off`, keeping bindings.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use retrohost_types::Scancode;

    fn keyboard_with(codes: &[Scancode]) -> Vec<bool> {
        let mut state = vec![false; Scancode::COUNT];
        for code in codes {
            state[code.index()] = true;
        }
        state
    }

    fn shoot_only() -> InputTracker {
        InputTracker::new(&KeyBindings::new(&[(KeyId::Shoot, Some(Scancode::Z))]).unwrap())
    }

    #[test]
    fn test_press_hold_release_cycle() {
        let mut tracker = InputTracker::new(&KeyBindings::default());
        let down = keyboard_with(&[Scancode::Z]);
        let up = keyboard_with(&[]);

        tracker.refresh(&down, 0);
        assert!(tracker.just_pressed(KeyId::Shoot));
        tracker.refresh(&down, 16);
        assert_eq!(tracker.status(KeyId::Shoot), KeyStatus::Held);
        tracker.refresh(&up, 32);
        assert!(tracker.just_released(KeyId::Shoot));
        tracker.refresh(&up, 48);
        assert_eq!(tracker.status(KeyId::Shoot), KeyStatus::Off);

        assert_eq!(tracker.slot(KeyId::Shoot).press_time_ms, Some(0));
        assert_eq!(tracker.slot(KeyId::Shoot).release_time_ms, Some(32));
        assert_eq!(tracker.refresh_count(), 4);
    }

    #[test]
    fn test_refresh_reads_all_keys() {
        let mut tracker = InputTracker::new(&KeyBindings::default());
        tracker.refresh(&keyboard_with(&[Scancode::UP, Scancode::LEFT]), 0);

        let pressed: Vec<_> = tracker
            .iter()
            .filter(|(_, s)| *s == KeyStatus::PressedEdge)
            .map(|(k, _)| k)
            .collect();
        assert_eq!(pressed, vec![KeyId::Up, KeyId::Left]);
    }

    #[test]
    fn test_short_keyboard_state_reads_as_up() {
        let mut tracker = InputTracker::new(&KeyBindings::default());
        let short = vec![true; 10];
        tracker.refresh(&short, 0);
        assert!(tracker.iter().all(|(_, s)| s == KeyStatus::Off));
    }

    #[test]
    fn test_queries_have_no_side_effects() {
        let mut tracker = shoot_only();
        tracker.sample(KeyId::Shoot, true);
        for _ in 0..5 {
            assert!(tracker.just_pressed(KeyId::Shoot));
            assert!(tracker.is_down(KeyId::Shoot));
        }
    }

    #[test]
    fn test_reset() {
        let mut tracker = shoot_only();
        tracker.sample(KeyId::Shoot, true);
        tracker.sample(KeyId::Shoot, true);
        tracker.reset();
        assert_eq!(tracker.status(KeyId::Shoot), KeyStatus::Off);
        tracker.sample(KeyId::Shoot, true);
        assert!(tracker.just_pressed(KeyId::Shoot));
    }

    fn any_key() -> impl Strategy<Value = KeyId> {
        (0..KeyId::COUNT).prop_map(|i| KeyId::ALL[i])
    }

    proptest! {
        #[test]
        fn press_yields_one_edge_then_held(key in any_key(), idle in 0usize..8, hold in 2usize..16) {
            let mut tracker = InputTracker::new(&KeyBindings::default());
            for _ in 0..idle {
                tracker.sample(key, false);
            }
            tracker.sample(key, true);
            prop_assert_eq!(tracker.status(key), KeyStatus::PressedEdge);
            for _ in 1..hold {
                tracker.sample(key, true);
                prop_assert_eq!(tracker.status(key), KeyStatus::Held);
            }
        }

        #[test]
        fn only_legal_transitions(key in any_key(), raw in proptest::collection::vec(any::<bool>(), 1..64)) {
            let mut tracker = InputTracker::new(&KeyBindings::default());
            let mut prev = tracker.status(key);
            for down in raw {
                tracker.sample(key, down);
                let next = tracker.status(key);
                let legal = match prev {
                    KeyStatus::Off | KeyStatus::ReleasedEdge => {
                        matches!(next, KeyStatus::Off | KeyStatus::PressedEdge)
                    }
                    KeyStatus::PressedEdge | KeyStatus::Held => {
                        matches!(next, KeyStatus::Held | KeyStatus::ReleasedEdge)
                    }
                };
                prop_assert!(legal, "{:?} -> {:?}", prev, next);
                prop_assert_eq!(next.is_down(), down);
                prev = next;
            }
        }

        #[test]
        fn unbound_key_stays_off(key in any_key(), raw in proptest::collection::vec(any::<bool>(), 1..32)) {
            let mut tracker = InputTracker::new(&KeyBindings::unbound());
            let full = vec![true; Scancode::COUNT];
            for down in raw {
                tracker.sample(key, down);
                prop_assert_eq!(tracker.status(key), KeyStatus::Off);
                tracker.refresh(&full, 0);
                prop_assert_eq!(tracker.status(key), KeyStatus::Off);
            }
        }
    }
}
