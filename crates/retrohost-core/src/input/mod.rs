//! Keyboard input tracking.
//!
//! This module provides:
//! - [`InputTracker`]: Per-key edge detection over polled keyboard state
//! - [`KeyBindings`]: Logical key to scancode table with JSON loading
//! - [`KeySlot`]: Individual key state with edge timestamps

mod key_bindings;
mod key_state;
mod tracker;

pub use key_bindings::KeyBindings;
pub use key_state::{KeySlot, next_status};
pub use tracker::InputTracker;
