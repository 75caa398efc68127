//! Shared data types for the retrohost workspace.
//!
//! This crate has no behavior beyond small conversions; the input tracker,
//! frame presenter and event pump live in `retrohost-core`.

mod event;
mod key;
mod options;
mod scancode;
mod video;

pub use event::{HostEvent, PumpStatus, RendererId, TextureId, WindowId};
pub use key::{KeyId, KeyStatus};
pub use options::{DispatchMode, OpenFlags, OpenOptions};
pub use scancode::Scancode;
pub use video::{PixelFormat, SurfaceInfo};
