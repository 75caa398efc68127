use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use retrohost_core::{HostBackend, Shim};
use retrohost_types::{DispatchMode, KeyId};

const SQUARE_SIZE: u32 = 12;
const SPEED_PX_PER_SEC: f32 = 120.0;
const FLASH_MS: u64 = 120;

const BACKGROUND: [u8; 4] = [0x10, 0x14, 0x20, 0xFF];
const FLASH: [u8; 4] = [0xE0, 0xE0, 0xE0, 0xFF];
const SQUARE: [u8; 4] = [0xF0, 0x80, 0x20, 0xFF];
const SQUARE_PAUSED: [u8; 4] = [0x70, 0x70, 0x70, 0xFF];

/// Whether the main loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

/// Counts frames and reports the rate once per second.
#[derive(Debug, Default)]
pub struct FpsCounter {
    window_start_ms: u64,
    frames: u32,
}

impl FpsCounter {
    /// Count one frame. Returns the frame rate when a full second has elapsed.
    pub fn tick(&mut self, now_ms: u64) -> Option<f32> {
        self.frames += 1;
        let elapsed = now_ms.saturating_sub(self.window_start_ms);
        if elapsed < 1000 {
            return None;
        }
        let fps = self.frames as f32 * 1000.0 / elapsed as f32;
        self.window_start_ms = now_ms;
        self.frames = 0;
        Some(fps)
    }
}

/// A square moved around the surface by the direction keys.
pub struct Demo {
    mode: DispatchMode,
    pressed: Rc<RefCell<Vec<KeyId>>>,
    x: f32,
    y: f32,
    paused: bool,
    flash_until_ms: u64,
    last_ms: u64,
    fps: FpsCounter,
}

impl Demo {
    /// Register the key callbacks on `shim` and center the square.
    pub fn new<H: HostBackend>(shim: &mut Shim<H>, mode: DispatchMode) -> Self {
        let pressed = Rc::new(RefCell::new(Vec::new()));
        let sink = pressed.clone();
        shim.on_key_down(move |key| sink.borrow_mut().push(key));
        shim.on_key_up(|key| debug!("released {key}"));

        let (width, height) = (shim.options().width, shim.options().height);
        Self {
            mode,
            pressed,
            x: width.saturating_sub(SQUARE_SIZE) as f32 / 2.0,
            y: height.saturating_sub(SQUARE_SIZE) as f32 / 2.0,
            paused: false,
            flash_until_ms: 0,
            last_ms: shim.ticks_ms(),
            fps: FpsCounter::default(),
        }
    }

    pub fn position(&self) -> (u32, u32) {
        (self.x as u32, self.y as u32)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run one iteration: pump, react, draw, present.
    pub fn frame<H: HostBackend>(&mut self, shim: &mut Shim<H>) -> Step {
        if shim.pump_events().is_quit() {
            info!("window closed");
            return Step::Exit;
        }

        let now = shim.ticks_ms();
        let dt_ms = now.saturating_sub(self.last_ms);
        self.last_ms = now;

        let commands: Vec<KeyId> = self.pressed.borrow_mut().drain(..).collect();
        for key in commands {
            // Legacy dispatch reports every bound key on any keyboard event.
            if self.mode == DispatchMode::Legacy && !shim.input().just_pressed(key) {
                continue;
            }
            match key {
                KeyId::Cancel => {
                    info!("cancel pressed");
                    return Step::Exit;
                }
                KeyId::Pause => {
                    self.paused = !self.paused;
                    info!("{}", if self.paused { "paused" } else { "resumed" });
                }
                KeyId::Shoot if !self.paused => self.flash_until_ms = now + FLASH_MS,
                _ => {}
            }
        }

        if !self.paused {
            self.advance(shim, dt_ms);
        }
        self.draw(shim, now);
        shim.present();

        if let Some(fps) = self.fps.tick(now) {
            debug!("{fps:.1} fps ({} frames total)", shim.frame_count());
        }
        Step::Continue
    }

    fn advance<H: HostBackend>(&mut self, shim: &Shim<H>, dt_ms: u64) {
        let input = shim.input();
        let axis = |neg: KeyId, pos: KeyId| -> f32 {
            (input.is_down(pos) as i32 - input.is_down(neg) as i32) as f32
        };
        let step = SPEED_PX_PER_SEC * dt_ms as f32 / 1000.0;
        let max_x = shim.options().width.saturating_sub(SQUARE_SIZE) as f32;
        let max_y = shim.options().height.saturating_sub(SQUARE_SIZE) as f32;
        self.x = (self.x + axis(KeyId::Left, KeyId::Right) * step).clamp(0.0, max_x);
        self.y = (self.y + axis(KeyId::Up, KeyId::Down) * step).clamp(0.0, max_y);
    }

    fn draw<H: HostBackend>(&self, shim: &mut Shim<H>, now: u64) {
        let Some(info) = shim.surface_info() else {
            return;
        };
        let background = if now < self.flash_until_ms {
            FLASH
        } else {
            BACKGROUND
        };
        let square = info
            .format
            .encode(if self.paused { SQUARE_PAUSED } else { SQUARE });
        if let Some(surface) = shim.surface_mut() {
            surface.fill(info.format.encode(background));
        }

        // Rows are laid out at the uploaded stride, not the padded pitch.
        let stride = info.upload_pitch;
        let (width, height) = (shim.options().width as usize, shim.options().height as usize);
        let (sx, sy) = (self.x as usize, self.y as usize);
        let side = SQUARE_SIZE as usize;

        let pixels = shim.pixels_mut();
        for y in sy..(sy + side).min(height) {
            let row = &mut pixels[y * stride..y * stride + width * 4];
            for px in row[sx * 4..(sx + side).min(width) * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&square);
            }
        }
    }
}
