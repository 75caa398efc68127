use anyhow::Result;
use retrohost_types::{PixelFormat, RendererId, TextureId, WindowId};

/// Window and renderer creation on the host.
/// Implementations: WinitHost (production), ScriptedHost (testing).
pub trait WindowHost {
    /// Create the single output window with the given inner size in pixels.
    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<WindowId>;

    fn create_renderer(&mut self, window: WindowId) -> Result<RendererId>;

    /// Release every resource created through this host. Safe to call on a
    /// host that never created anything.
    fn destroy_all(&mut self);
}

/// Abstraction over the presentation sink that turns pixels into output.
pub trait PresentationSink {
    /// Create a streaming texture the pixel surface is uploaded into.
    fn create_texture(
        &mut self,
        renderer: RendererId,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<TextureId>;

    /// Replace the whole texture contents. `stride` is the byte distance
    /// between the starts of two consecutive rows in `pixels`.
    fn upload_pixels(&mut self, texture: TextureId, pixels: &[u8], stride: usize) -> Result<()>;

    /// Clear the back buffer, blit the texture over the whole window and flip.
    fn present(&mut self, renderer: RendererId, texture: TextureId) -> Result<()>;
}
