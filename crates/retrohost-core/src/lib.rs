//! Hardware-abstraction shim for a single-window, single-keyboard game loop.
//!
//! The [`Shim`] context owns a host backend (see [`traits`]) and exposes
//! frame buffer presentation, edge-detected keyboard input, an event pump
//! and a monotonic clock.

pub mod error;
pub mod event_pump;
pub mod input;
pub mod scripted;
pub mod shim;
pub mod traits;
pub mod video;

pub use error::{InitError, InitStage};
pub use event_pump::{EventPump, KeyCallback};
pub use input::{InputTracker, KeyBindings, KeySlot};
pub use shim::Shim;
pub use traits::HostBackend;
pub use video::{FramePresenter, PixelSurface};

pub use retrohost_types as types;
