//! Software framebuffer and its presentation path.

mod presenter;
mod surface;

pub use presenter::FramePresenter;
pub use surface::{PixelSurface, align4};
