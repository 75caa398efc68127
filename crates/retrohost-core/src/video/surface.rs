use retrohost_types::{PixelFormat, SurfaceInfo};

/// Round up to the next multiple of 4.
pub fn align4(n: u32) -> u32 {
    n.div_ceil(4) * 4
}

/// The single writable pixel buffer.
///
/// Dimensions are rounded up to a multiple of 4 and every pixel is 4 bytes,
/// so `pitch == aligned_width * 4`. The requested width and height are kept
/// separately because the upload to the display uses them.
pub struct PixelSurface {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    src_width: u32,
    src_height: u32,
    format: PixelFormat,
}

impl PixelSurface {
    /// Allocate a zeroed surface for the requested size.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let aligned_w = align4(width);
        let aligned_h = align4(height);
        let len = aligned_w as usize * aligned_h as usize * PixelFormat::BYTES_PER_PIXEL;
        Self {
            pixels: vec![0; len],
            width: aligned_w,
            height: aligned_h,
            src_width: width,
            src_height: height,
            format,
        }
    }

    pub fn info(&self) -> SurfaceInfo {
        SurfaceInfo {
            width: self.width,
            height: self.height,
            pitch: self.pitch(),
            bytes_per_pixel: PixelFormat::BYTES_PER_PIXEL,
            upload_pitch: self.upload_pitch(),
            format: self.format,
        }
    }

    pub fn pitch(&self) -> usize {
        self.width as usize * PixelFormat::BYTES_PER_PIXEL
    }

    /// Row stride handed to the presentation sink.
    pub fn upload_pitch(&self) -> usize {
        self.src_width as usize * PixelFormat::BYTES_PER_PIXEL
    }

    /// Requested (unaligned) size.
    pub fn source_size(&self) -> (u32, u32) {
        (self.src_width, self.src_height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Bytes uploaded on present: `src_height` rows of `upload_pitch` bytes
    /// taken from the start of the buffer.
    pub fn upload_bytes(&self) -> &[u8] {
        &self.pixels[..self.upload_pitch() * self.src_height as usize]
    }

    /// Fill every pixel with the same 4 bytes.
    pub fn fill(&mut self, pixel: [u8; 4]) {
        for chunk in self.pixels.chunks_exact_mut(PixelFormat::BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&pixel);
        }
    }
}
