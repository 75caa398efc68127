use serde::{Deserialize, Serialize};

use crate::video::PixelFormat;

/// Open-time flags. Stored and handed back unchanged; no bit is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenFlags(pub u32);

impl OpenFlags {
    pub const NONE: Self = Self(0);

    pub fn bits(self) -> u32 {
        self.0
    }
}

/// How the event pump routes keyboard activity to the registered callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DispatchMode {
    /// `PressedEdge` goes to the key-down callback, `ReleasedEdge` to the
    /// key-up callback. Settled keys are not reported.
    #[default]
    EdgeStatus,
    /// Every bound key goes to the key-down callback and every unbound key to
    /// the key-up callback, whatever its status.
    Legacy,
}

/// Window and surface configuration accepted at open time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Integer upscaling factor applied to the window size.
    pub scale: u32,
    pub format: PixelFormat,
    pub flags: OpenFlags,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            title: "retrohost".to_string(),
            width: 320,
            height: 240,
            scale: 2,
            format: PixelFormat::default(),
            flags: OpenFlags::NONE,
        }
    }
}

impl OpenOptions {
    /// Largest accepted surface width or height.
    pub const MAX_DIMENSION: u32 = 8192;

    pub fn new(title: impl Into<String>, width: u32, height: u32, scale: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            scale,
            ..Self::default()
        }
    }

    pub fn with_flags(mut self, flags: OpenFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Window size in physical pixels.
    ///
    /// Returns `None` when the scaled size does not fit in a `u32`.
    pub fn window_size(&self) -> Option<(u32, u32)> {
        Some((
            self.width.checked_mul(self.scale)?,
            self.height.checked_mul(self.scale)?,
        ))
    }

    /// Check that the options describe a window that can be created.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if self.width > Self::MAX_DIMENSION || self.height > Self::MAX_DIMENSION {
            return Err(format!(
                "surface size {}x{} exceeds {}",
                self.width,
                self.height,
                Self::MAX_DIMENSION
            ));
        }
        if self.scale == 0 {
            return Err("scale must be at least 1".to_string());
        }
        if self.window_size().is_none() {
            return Err(format!(
                "window size {}x{} at scale {} overflows",
                self.width, self.height, self.scale
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        assert!(OpenOptions::default().validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(OpenOptions::new("t", 0, 10, 1).validate().is_err());
        assert!(OpenOptions::new("t", 10, 0, 1).validate().is_err());
        assert!(OpenOptions::new("t", 10, 10, 0).validate().is_err());
    }

    #[test]
    fn oversized_surfaces_are_rejected() {
        let opts = OpenOptions::new("t", u32::MAX / 2, 10, 3);
        assert_eq!(opts.window_size(), None);
        assert!(opts.validate().is_err());
        assert!(OpenOptions::new("t", 8193, 10, 1).validate().is_err());
        assert!(OpenOptions::new("t", 8192, 8192, 1).validate().is_ok());
    }

    #[test]
    fn overflowing_scale_is_rejected() {
        let opts = OpenOptions::new("t", 8192, 8192, u32::MAX / 4096);
        assert_eq!(opts.window_size(), None);
        assert!(opts.validate().is_err());
    }

    #[test]
    fn window_size_applies_scale() {
        let opts = OpenOptions::new("t", 160, 144, 3);
        assert_eq!(opts.window_size(), Some((480, 432)));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let opts: OpenOptions =
            serde_json::from_str(r#"{"title":"demo","width":101,"flags":5}"#).unwrap();
        assert_eq!(opts.title, "demo");
        assert_eq!(opts.width, 101);
        assert_eq!(opts.height, 240);
        assert_eq!(opts.scale, 2);
        assert_eq!(opts.flags, OpenFlags(5));
    }
}
