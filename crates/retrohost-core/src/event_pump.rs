use log::debug;
use retrohost_types::{DispatchMode, HostEvent, KeyId, KeyStatus, PumpStatus};

use crate::input::InputTracker;
use crate::traits::{Clock, EventSource, KeyboardState};

/// Callback receiving the logical key a press or release refers to.
pub type KeyCallback = Box<dyn FnMut(KeyId)>;

/// Drains host events, refreshes the tracker on keyboard activity and
/// dispatches the registered callbacks.
pub struct EventPump {
    mode: DispatchMode,
    on_key_down: Option<KeyCallback>,
    on_key_up: Option<KeyCallback>,
}

impl Default for EventPump {
    fn default() -> Self {
        Self::new(DispatchMode::default())
    }
}

impl EventPump {
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            mode,
            on_key_down: None,
            on_key_up: None,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DispatchMode) {
        self.mode = mode;
    }

    /// Register the key-down callback, replacing any previous one.
    pub fn on_key_down(&mut self, callback: impl FnMut(KeyId) + 'static) {
        self.on_key_down = Some(Box::new(callback));
    }

    /// Register the key-up callback, replacing any previous one.
    pub fn on_key_up(&mut self, callback: impl FnMut(KeyId) + 'static) {
        self.on_key_up = Some(Box::new(callback));
    }

    /// Drain every queued host event.
    ///
    /// Returns [`PumpStatus::Quit`] as soon as a quit event is seen; events
    /// queued behind it are left in the host queue untouched.
    pub fn poll<H>(&mut self, host: &mut H, tracker: &mut InputTracker) -> PumpStatus
    where
        H: EventSource + KeyboardState + Clock + ?Sized,
    {
        host.pump();

        let mut drained = 0usize;
        while let Some(event) = host.poll_event() {
            drained += 1;
            match event {
                HostEvent::Quit => {
                    debug!("quit requested after {drained} events");
                    return PumpStatus::Quit;
                }
                HostEvent::KeyDown(_) | HostEvent::KeyUp(_) => {
                    tracker.refresh(host.keyboard_state(), host.now_ms());
                    self.dispatch(tracker);
                }
                _ => {}
            }
        }

        PumpStatus::Continue
    }

    fn dispatch(&mut self, tracker: &InputTracker) {
        for (key, status) in tracker.iter() {
            let target = match self.mode {
                DispatchMode::Legacy => {
                    if tracker.slot(key).binding.is_some() {
                        self.on_key_down.as_mut()
                    } else {
                        self.on_key_up.as_mut()
                    }
                }
                DispatchMode::EdgeStatus => match status {
                    KeyStatus::PressedEdge => self.on_key_down.as_mut(),
                    KeyStatus::ReleasedEdge => self.on_key_up.as_mut(),
                    KeyStatus::Off | KeyStatus::Held => None,
                },
            };
            if let Some(callback) = target {
                callback(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::input::KeyBindings;
    use crate::scripted::ScriptedHost;
    use retrohost_types::Scancode;

    type Log = Rc<RefCell<Vec<(&'static str, KeyId)>>>;

    fn recording_pump(mode: DispatchMode) -> (EventPump, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut pump = EventPump::new(mode);
        let down = log.clone();
        pump.on_key_down(move |key| down.borrow_mut().push(("down", key)));
        let up = log.clone();
        pump.on_key_up(move |key| up.borrow_mut().push(("up", key)));
        (pump, log)
    }

    fn shoot_and_cancel() -> KeyBindings {
        KeyBindings::new(&[
            (KeyId::Shoot, Some(Scancode::Z)),
            (KeyId::Cancel, Some(Scancode::X)),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_queue_continues() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&KeyBindings::default());
        let (mut pump, log) = recording_pump(DispatchMode::EdgeStatus);

        assert_eq!(pump.poll(&mut host, &mut tracker), PumpStatus::Continue);
        assert!(log.borrow().is_empty());
        assert_eq!(tracker.refresh_count(), 0);
    }

    #[test]
    fn test_edge_dispatch_reports_press_then_release() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, log) = recording_pump(DispatchMode::EdgeStatus);

        host.press(Scancode::Z);
        pump.poll(&mut host, &mut tracker);
        assert_eq!(*log.borrow(), vec![("down", KeyId::Shoot)]);

        host.release(Scancode::Z);
        pump.poll(&mut host, &mut tracker);
        assert_eq!(
            *log.borrow(),
            vec![("down", KeyId::Shoot), ("up", KeyId::Shoot)]
        );
    }

    #[test]
    fn test_edge_dispatch_skips_settled_keys() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, log) = recording_pump(DispatchMode::EdgeStatus);

        host.press(Scancode::Z);
        pump.poll(&mut host, &mut tracker);
        log.borrow_mut().clear();

        // Shoot is now held; only Cancel produces an edge.
        host.press(Scancode::X);
        pump.poll(&mut host, &mut tracker);
        assert_eq!(tracker.status(KeyId::Shoot), KeyStatus::Held);
        assert_eq!(*log.borrow(), vec![("down", KeyId::Cancel)]);
    }

    #[test]
    fn test_legacy_dispatch_routes_by_binding() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, log) = recording_pump(DispatchMode::Legacy);

        host.press(Scancode::Z);
        pump.poll(&mut host, &mut tracker);

        let expected: Vec<_> = KeyId::ALL
            .iter()
            .map(|&key| match key {
                KeyId::Shoot | KeyId::Cancel => ("down", key),
                _ => ("up", key),
            })
            .collect();
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn test_one_refresh_per_keyboard_event() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, _log) = recording_pump(DispatchMode::EdgeStatus);

        host.press(Scancode::Z);
        host.push_event(HostEvent::FocusLost);
        host.press(Scancode::X);
        host.push_event(HostEvent::Resized {
            width: 1,
            height: 1,
        });
        pump.poll(&mut host, &mut tracker);

        assert_eq!(tracker.refresh_count(), 2);
        assert_eq!(host.pending_events(), 0);
    }

    #[test]
    fn test_non_keyboard_events_are_ignored() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, log) = recording_pump(DispatchMode::Legacy);

        host.set_key(Scancode::Z, true);
        host.push_event(HostEvent::FocusGained);
        host.push_event(HostEvent::Other);

        assert_eq!(pump.poll(&mut host, &mut tracker), PumpStatus::Continue);
        assert_eq!(tracker.status(KeyId::Shoot), KeyStatus::Off);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_quit_stops_draining() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, log) = recording_pump(DispatchMode::EdgeStatus);

        host.press(Scancode::Z);
        host.push_event(HostEvent::Quit);
        host.press(Scancode::X);

        assert_eq!(pump.poll(&mut host, &mut tracker), PumpStatus::Quit);
        assert_eq!(tracker.refresh_count(), 1);
        assert_eq!(host.pending_events(), 1);
        assert_eq!(*log.borrow(), vec![("down", KeyId::Shoot)]);
    }

    #[test]
    fn test_events_behind_quit_leave_state_untouched() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, log) = recording_pump(DispatchMode::EdgeStatus);

        host.press(Scancode::Z);
        host.push_event(HostEvent::Quit);
        host.press(Scancode::X);

        assert_eq!(pump.poll(&mut host, &mut tracker), PumpStatus::Quit);
        assert_eq!(tracker.status(KeyId::Cancel), KeyStatus::Off);
        assert!(!host.is_scancode_down(Scancode::X));
        assert_eq!(*log.borrow(), vec![("down", KeyId::Shoot)]);

        // The remainder is processed on the next pump.
        assert_eq!(pump.poll(&mut host, &mut tracker), PumpStatus::Continue);
        assert_eq!(tracker.status(KeyId::Cancel), KeyStatus::PressedEdge);
    }

    #[test]
    fn test_tap_within_one_batch_reports_both_edges() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, log) = recording_pump(DispatchMode::EdgeStatus);

        host.press(Scancode::Z);
        host.release(Scancode::Z);
        pump.poll(&mut host, &mut tracker);

        assert_eq!(
            *log.borrow(),
            vec![("down", KeyId::Shoot), ("up", KeyId::Shoot)]
        );
        assert_eq!(tracker.status(KeyId::Shoot), KeyStatus::ReleasedEdge);
    }

    #[test]
    fn test_focus_loss_releases_held_keys() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, log) = recording_pump(DispatchMode::EdgeStatus);

        host.press(Scancode::Z);
        pump.poll(&mut host, &mut tracker);
        host.press(Scancode::X);
        pump.poll(&mut host, &mut tracker);
        assert_eq!(tracker.status(KeyId::Shoot), KeyStatus::Held);
        log.borrow_mut().clear();

        host.lose_focus();
        pump.poll(&mut host, &mut tracker);
        assert!(!tracker.is_down(KeyId::Shoot));
        assert!(!tracker.is_down(KeyId::Cancel));
        assert_eq!(
            *log.borrow(),
            vec![("up", KeyId::Cancel), ("up", KeyId::Shoot)]
        );
    }

    #[test]
    fn test_missing_callbacks_are_fine() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let mut pump = EventPump::default();

        host.press(Scancode::Z);
        assert_eq!(pump.poll(&mut host, &mut tracker), PumpStatus::Continue);
        assert!(tracker.just_pressed(KeyId::Shoot));
    }

    #[test]
    fn test_registering_replaces_callback() {
        let mut host = ScriptedHost::new();
        let mut tracker = InputTracker::new(&shoot_and_cancel());
        let (mut pump, log) = recording_pump(DispatchMode::EdgeStatus);

        let replaced = Rc::new(RefCell::new(0));
        let counter = replaced.clone();
        pump.on_key_down(move |_| *counter.borrow_mut() += 1);

        host.press(Scancode::Z);
        pump.poll(&mut host, &mut tracker);
        assert_eq!(*replaced.borrow(), 1);
        assert!(log.borrow().is_empty());
    }
}
