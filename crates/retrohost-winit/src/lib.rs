//! Desktop backend for the retrohost shim: winit for the window and
//! keyboard, wgpu for presenting the pixel surface.

pub mod gpu;
pub mod host;
pub mod keymap;

pub use gpu::GpuPresenter;
pub use host::WinitHost;
pub use keymap::scancode_for;
