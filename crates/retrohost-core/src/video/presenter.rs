use anyhow::{Result, anyhow};
use log::{debug, info};
use retrohost_types::{OpenOptions, RendererId, SurfaceInfo, TextureId, WindowId};

use crate::error::{InitError, InitStage};
use crate::traits::{PresentationSink, WindowHost};
use crate::video::surface::PixelSurface;

struct Target {
    window: WindowId,
    renderer: RendererId,
    texture: TextureId,
}

/// Owns the pixel surface and pushes it to the presentation sink.
pub struct FramePresenter {
    surface: Option<PixelSurface>,
    target: Option<Target>,
    frames: u64,
}

impl FramePresenter {
    /// Create the window, renderer and streaming texture and allocate the
    /// surface. Any failure is fatal; resources created before the failing
    /// step are released through [`WindowHost::destroy_all`].
    pub fn open<H>(host: &mut H, options: &OpenOptions) -> Result<Self, InitError>
    where
        H: WindowHost + PresentationSink + ?Sized,
    {
        options
            .validate()
            .map_err(|e| InitError::new(InitStage::Options, anyhow!(e)))?;
        let (win_w, win_h) = options
            .window_size()
            .ok_or_else(|| InitError::new(InitStage::Options, anyhow!("window size overflows")))?;

        let result = Self::create_target(host, options, win_w, win_h);
        let target = match result {
            Ok(target) => target,
            Err(e) => {
                host.destroy_all();
                return Err(e);
            }
        };

        let surface = PixelSurface::new(options.width, options.height, options.format);
        let info = surface.info();
        info!(
            "opened {}x{} surface (aligned {}x{}, pitch {}) in {}x{} window",
            options.width, options.height, info.width, info.height, info.pitch, win_w, win_h
        );

        Ok(Self {
            surface: Some(surface),
            target: Some(target),
            frames: 0,
        })
    }

    fn create_target<H>(
        host: &mut H,
        options: &OpenOptions,
        win_w: u32,
        win_h: u32,
    ) -> Result<Target, InitError>
    where
        H: WindowHost + PresentationSink + ?Sized,
    {
        let window = host
            .create_window(&options.title, win_w, win_h)
            .map_err(|e| InitError::new(InitStage::Window, e))?;
        let renderer = host
            .create_renderer(window)
            .map_err(|e| InitError::new(InitStage::Renderer, e))?;
        // The texture has the requested size, not the aligned one.
        let texture = host
            .create_texture(renderer, options.format, options.width, options.height)
            .map_err(|e| InitError::new(InitStage::Texture, e))?;
        Ok(Target {
            window,
            renderer,
            texture,
        })
    }

    pub fn is_open(&self) -> bool {
        self.surface.is_some()
    }

    /// Surface layout, or `None` after [`FramePresenter::close`].
    pub fn info(&self) -> Option<SurfaceInfo> {
        self.surface.as_ref().map(PixelSurface::info)
    }

    /// Mutable access to the pixel buffer. Empty after close.
    pub fn write_access(&mut self) -> &mut [u8] {
        match self.surface.as_mut() {
            Some(surface) => surface.pixels_mut(),
            None => &mut [],
        }
    }

    pub fn surface(&self) -> Option<&PixelSurface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut PixelSurface> {
        self.surface.as_mut()
    }

    pub fn window(&self) -> Option<WindowId> {
        self.target.as_ref().map(|t| t.window)
    }

    /// Upload the whole surface and flip. No-op once closed.
    pub fn present<S>(&mut self, sink: &mut S) -> Result<()>
    where
        S: PresentationSink + ?Sized,
    {
        let (Some(surface), Some(target)) = (self.surface.as_ref(), self.target.as_ref()) else {
            return Ok(());
        };

        sink.upload_pixels(target.texture, surface.upload_bytes(), surface.upload_pitch())?;
        sink.present(target.renderer, target.texture)?;
        self.frames += 1;
        Ok(())
    }

    /// Number of frames successfully presented.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Free the surface and every host resource. Returns `false` if the
    /// presenter was already closed.
    pub fn close<H>(&mut self, host: &mut H) -> bool
    where
        H: WindowHost + ?Sized,
    {
        if self.target.take().is_none() {
            return false;
        }
        self.surface = None;
        host.destroy_all();
        debug!("presenter closed after {} frames", self.frames);
        true
    }
}
