use retrohost_types::{HostEvent, Scancode};

/// Abstraction over the host event queue.
/// Implementations: WinitHost (production), ScriptedHost (testing).
pub trait EventSource {
    /// Move pending OS events into the queue read by [`EventSource::poll_event`].
    /// Called once at the start of every pump.
    fn pump(&mut self) {}

    /// Pop the next queued event, or `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<HostEvent>;
}

/// Abstraction over the raw keyboard state.
pub trait KeyboardState {
    /// "Physically down" flags indexed by [`Scancode::index`].
    fn keyboard_state(&self) -> &[bool];

    /// Whether a scancode is down. Codes outside the state array read as up.
    fn is_scancode_down(&self, code: Scancode) -> bool {
        self.keyboard_state()
            .get(code.index())
            .copied()
            .unwrap_or(false)
    }
}
