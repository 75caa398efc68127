use serde::{Deserialize, Serialize};

/// Byte layout of one 4-byte pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Bytes in memory order R, G, B, A.
    Rgba8,
    /// Bytes in memory order B, G, R, A: a little-endian `0xAARRGGBB` word.
    #[default]
    Bgra8,
}

impl PixelFormat {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Lay out an `[r, g, b, a]` color in this format's byte order.
    pub fn encode(self, [r, g, b, a]: [u8; 4]) -> [u8; 4] {
        match self {
            PixelFormat::Rgba8 => [r, g, b, a],
            PixelFormat::Bgra8 => [b, g, r, a],
        }
    }
}

/// Layout of the writable pixel surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    /// Width rounded up to a multiple of 4.
    pub width: u32,
    /// Height rounded up to a multiple of 4.
    pub height: u32,
    /// Bytes per row of the buffer (`width * bytes_per_pixel`).
    pub pitch: usize,
    pub bytes_per_pixel: usize,
    /// Row stride used when uploading to the display; derived from the
    /// requested (unaligned) width.
    pub upload_pitch: usize,
    pub format: PixelFormat,
}

impl SurfaceInfo {
    /// Total buffer length in bytes.
    pub fn len(&self) -> usize {
        self.pitch * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
