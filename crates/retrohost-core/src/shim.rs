use log::{info, warn};
use retrohost_types::{
    DispatchMode, KeyId, KeyStatus, OpenFlags, OpenOptions, PumpStatus, SurfaceInfo,
};

use crate::error::InitError;
use crate::event_pump::EventPump;
use crate::input::{InputTracker, KeyBindings};
use crate::traits::HostBackend;
use crate::video::{FramePresenter, PixelSurface};

/// One window, one keyboard, one pixel surface.
///
/// Owns the host backend and every piece of state the engine talks to.
/// All calls are expected from a single thread in frame order:
/// [`Shim::pump_events`], then writes through [`Shim::pixels_mut`], then
/// [`Shim::present`].
pub struct Shim<H: HostBackend> {
    host: H,
    options: OpenOptions,
    presenter: FramePresenter,
    tracker: InputTracker,
    pump: EventPump,
    opened_at_ms: u64,
    quit_requested: bool,
}

impl<H: HostBackend> Shim<H> {
    /// Create the window, renderer, texture and pixel surface.
    pub fn open(mut host: H, options: OpenOptions, bindings: &KeyBindings) -> Result<Self, InitError> {
        let presenter = FramePresenter::open(&mut host, &options)?;
        let opened_at_ms = host.now_ms();
        info!("shim open: \"{}\" flags={:#x}", options.title, options.flags.bits());

        Ok(Self {
            host,
            options,
            presenter,
            tracker: InputTracker::new(bindings),
            pump: EventPump::default(),
            opened_at_ms,
            quit_requested: false,
        })
    }

    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.pump.set_mode(mode);
        self
    }

    /// Surface layout. `None` after [`Shim::shutdown`].
    pub fn surface_info(&self) -> Option<SurfaceInfo> {
        self.presenter.info()
    }

    /// Writable pixel buffer of `pitch * height` bytes. Empty after shutdown.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.presenter.write_access()
    }

    pub fn surface_mut(&mut self) -> Option<&mut PixelSurface> {
        self.presenter.surface_mut()
    }

    /// Upload the surface and flip. Backend failures are logged and dropped.
    pub fn present(&mut self) {
        if let Err(e) = self.presenter.present(&mut self.host) {
            warn!("present failed: {e:#}");
        }
    }

    /// Alias of [`Shim::present`].
    pub fn blit(&mut self) {
        self.present();
    }

    pub fn on_key_down(&mut self, callback: impl FnMut(KeyId) + 'static) {
        self.pump.on_key_down(callback);
    }

    pub fn on_key_up(&mut self, callback: impl FnMut(KeyId) + 'static) {
        self.pump.on_key_up(callback);
    }

    /// Drain the host event queue. Once a quit is seen it is latched in
    /// [`Shim::quit_requested`].
    pub fn pump_events(&mut self) -> PumpStatus {
        let status = self.pump.poll(&mut self.host, &mut self.tracker);
        if status.is_quit() {
            self.quit_requested = true;
        }
        status
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn key_status(&self, key: KeyId) -> KeyStatus {
        self.tracker.status(key)
    }

    pub fn input(&self) -> &InputTracker {
        &self.tracker
    }

    /// Milliseconds since open, from the host's monotonic clock.
    pub fn ticks_ms(&self) -> u64 {
        self.host.now_ms().saturating_sub(self.opened_at_ms)
    }

    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// Open-time flags, handed back as given.
    pub fn flags(&self) -> OpenFlags {
        self.options.flags
    }

    pub fn frame_count(&self) -> u64 {
        self.presenter.frame_count()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_open(&self) -> bool {
        self.presenter.is_open()
    }

    /// Release the surface and every host resource. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.presenter.close(&mut self.host) {
            info!("shim shut down after {} ms", self.ticks_ms());
        }
    }
}

impl<H: HostBackend> Drop for Shim<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
