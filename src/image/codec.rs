//! Raster codec capability.

use crate::image::RasterImage;
use crate::util::IconMatchResult;

/// Decodes encoded image bytes into RGBA rasters and resizes them.
///
/// Implementations must be deterministic: identical bytes and target sizes
/// always produce byte-identical rasters. Every produced raster carries an
/// alpha channel.
pub trait RasterCodec: Send + Sync {
    /// Decodes bytes into a raster at the image's native size.
    fn decode(&self, bytes: &[u8]) -> IconMatchResult<RasterImage>;

    /// Resizes a raster to exactly `width x height` (independent x/y scale).
    fn resize(&self, raster: &RasterImage, width: u32, height: u32)
        -> IconMatchResult<RasterImage>;

    /// Decodes bytes and stretches the result to exactly `width x height`.
    ///
    /// Codecs that can render directly at a target size (vector formats)
    /// should override this.
    fn decode_resized(&self, bytes: &[u8], width: u32, height: u32) -> IconMatchResult<RasterImage> {
        let raster = self.decode(bytes)?;
        if raster.width() == width && raster.height() == height {
            return Ok(raster);
        }
        self.resize(&raster, width, height)
    }
}

impl<C: RasterCodec + ?Sized> RasterCodec for &C {
    fn decode(&self, bytes: &[u8]) -> IconMatchResult<RasterImage> {
        (**self).decode(bytes)
    }

    fn resize(
        &self,
        raster: &RasterImage,
        width: u32,
        height: u32,
    ) -> IconMatchResult<RasterImage> {
        (**self).resize(raster, width, height)
    }

    fn decode_resized(&self, bytes: &[u8], width: u32, height: u32) -> IconMatchResult<RasterImage> {
        (**self).decode_resized(bytes, width, height)
    }
}
