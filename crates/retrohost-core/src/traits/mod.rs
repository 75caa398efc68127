//! Capabilities the shim consumes from the host windowing/rendering backend.

pub mod input;
pub mod render;
pub mod time;

pub use input::{EventSource, KeyboardState};
pub use render::{PresentationSink, WindowHost};
pub use time::{Clock, InstantClock, ManualClock};

/// Everything a backend must provide to drive a [`crate::Shim`].
pub trait HostBackend: WindowHost + PresentationSink + EventSource + KeyboardState + Clock {}

impl<T> HostBackend for T where
    T: WindowHost + PresentationSink + EventSource + KeyboardState + Clock
{
}
