//! Owned RGBA rasters and the codec capability that produces them.
//!
//! `RasterImage` is a contiguous, row-major, top-to-bottom RGBA buffer. The
//! channel count is fixed at four so every raster compared by the pipeline
//! shares the same layout; construction rejects buffers whose length is not
//! exactly `width * height * 4`.

use crate::util::{IconMatchError, IconMatchResult};

mod codec;
#[cfg(feature = "image-io")]
pub mod io;
#[cfg(feature = "svg")]
mod svg;

pub use codec::RasterCodec;

/// Number of interleaved channels in every raster (RGBA).
pub const CHANNELS: usize = 4;

/// Opaque white, used to fill padding outside the source image.
pub const OPAQUE_WHITE: [u8; 4] = [255, 255, 255, 255];

/// Owned RGBA raster with a contiguous row-major buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl RasterImage {
    /// Creates a raster from an RGBA buffer, validating its length.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> IconMatchResult<Self> {
        let expected = buffer_len(width, height)?;
        if data.len() != expected {
            return Err(IconMatchError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a raster where every pixel has the same color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> IconMatchResult<Self> {
        let len = buffer_len(width, height)?;
        let data = color.iter().copied().cycle().take(len).collect();
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the interleaved RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the raster and returns its RGBA bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.offset(x, y);
        let px = self.data.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Overwrites the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.offset(x, y);
        self.data[idx..idx + CHANNELS].copy_from_slice(&color);
    }

    /// Returns the RGBA bytes of row `y`.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }

    /// Returns true when both rasters have the same width and height.
    pub fn same_dimensions(&self, other: &RasterImage) -> bool {
        self.width == other.width && self.height == other.height
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

/// Luminance of a pixel after compositing it over opaque white.
pub(crate) fn luminance_over_white(px: [u8; 4]) -> f32 {
    let alpha = f32::from(px[3]) / 255.0;
    let blend = |c: u8| 255.0 + (f32::from(c) - 255.0) * alpha;
    0.299 * blend(px[0]) + 0.587 * blend(px[1]) + 0.114 * blend(px[2])
}

fn buffer_len(width: u32, height: u32) -> IconMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(IconMatchError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or(IconMatchError::InvalidDimensions { width, height })
}
