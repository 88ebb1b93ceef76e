//! Default codec backed by the `image` crate.
//!
//! Available when the `image-io` feature is enabled. SVG input is detected by
//! content sniffing and rendered with `resvg` when the `svg` feature is on.

use crate::image::{RasterCodec, RasterImage};
use crate::util::{IconMatchError, IconMatchResult};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use std::path::Path;

/// Raster codec using `image` for bitmaps and `resvg` for SVG markup.
#[derive(Clone, Copy, Debug)]
pub struct ImageCodec {
    filter: FilterType,
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }
}

impl ImageCodec {
    /// Creates a codec with the default (bilinear) resize filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter used when resizing rasters.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

impl RasterCodec for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> IconMatchResult<RasterImage> {
        #[cfg(feature = "svg")]
        if super::svg::looks_like_svg(bytes) {
            return super::svg::render(bytes, None);
        }
        let img = image::load_from_memory(bytes).map_err(IconMatchError::decode)?;
        raster_from_dynamic_image(&img)
    }

    fn resize(
        &self,
        raster: &RasterImage,
        width: u32,
        height: u32,
    ) -> IconMatchResult<RasterImage> {
        if width == 0 || height == 0 {
            return Err(IconMatchError::InvalidDimensions { width, height });
        }
        let buf = rgba_image_from_raster(raster)?;
        let resized = image::imageops::resize(&buf, width, height, self.filter);
        raster_from_rgba_image(resized)
    }

    fn decode_resized(&self, bytes: &[u8], width: u32, height: u32) -> IconMatchResult<RasterImage> {
        #[cfg(feature = "svg")]
        if super::svg::looks_like_svg(bytes) {
            return super::svg::render(bytes, Some((width, height)));
        }
        let raster = self.decode(bytes)?;
        if raster.width() == width && raster.height() == height {
            return Ok(raster);
        }
        self.resize(&raster, width, height)
    }
}

/// Converts an RGBA image buffer into a raster without copying.
pub fn raster_from_rgba_image(img: RgbaImage) -> IconMatchResult<RasterImage> {
    let width = img.width();
    let height = img.height();
    RasterImage::new(img.into_raw(), width, height)
}

/// Converts any dynamic image to an RGBA raster, adding alpha when absent.
pub fn raster_from_dynamic_image(img: &DynamicImage) -> IconMatchResult<RasterImage> {
    raster_from_rgba_image(img.to_rgba8())
}

/// Copies a raster into an `image` RGBA buffer.
pub fn rgba_image_from_raster(raster: &RasterImage) -> IconMatchResult<RgbaImage> {
    RgbaImage::from_raw(raster.width(), raster.height(), raster.as_bytes().to_vec()).ok_or(
        IconMatchError::InvalidDimensions {
            width: raster.width(),
            height: raster.height(),
        },
    )
}

/// Loads an image from disk and converts it to an RGBA raster.
pub fn load_raster<P: AsRef<Path>>(path: P) -> IconMatchResult<RasterImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| IconMatchError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    ImageCodec::default().decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba() {
        let mut img = RgbaImage::from_pixel(4, 3, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 2, Rgba([10, 20, 30, 255]));
        let raster = ImageCodec::new().decode(&encode_png(&img)).unwrap();
        assert_eq!((raster.width(), raster.height()), (4, 3));
        assert_eq!(raster.pixel(1, 2), Some([10, 20, 30, 255]));
    }

    #[test]
    fn gray_input_gains_alpha() {
        let gray = image::GrayImage::from_pixel(2, 2, image::Luma([7]));
        let raster = raster_from_dynamic_image(&DynamicImage::ImageLuma8(gray)).unwrap();
        assert_eq!(raster.pixel(0, 0), Some([7, 7, 7, 255]));
    }

    #[test]
    fn malformed_bytes_fail_to_decode() {
        let err = ImageCodec::new().decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, IconMatchError::Decode { .. }));
    }

    #[test]
    fn decode_resized_stretches_without_preserving_aspect() {
        let img = RgbaImage::from_pixel(40, 10, Rgba([0, 0, 0, 255]));
        let raster = ImageCodec::new()
            .decode_resized(&encode_png(&img), 28, 28)
            .unwrap();
        assert_eq!((raster.width(), raster.height()), (28, 28));
        assert_eq!(raster.pixel(27, 27), Some([0, 0, 0, 255]));
    }
}
