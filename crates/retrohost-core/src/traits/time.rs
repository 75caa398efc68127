use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond clock behind [`crate::Shim::ticks_ms`].
pub trait Clock {
    /// Milliseconds since a fixed, backend-chosen origin. Never decreases.
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from its own creation.
#[derive(Debug, Clone, Copy)]
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Hand-driven clock. Only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump forward to `ms`. Earlier values are ignored.
    pub fn set_time(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get().max(ms));
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}
