//! Bounding-box detection of non-background content.

use crate::image::RasterImage;
use crate::isolate::DetectionStrategy;

/// Inclusive pixel box around the detected subject.
///
/// A box with `x1 > x2` or `y1 > y2` is invalid and means no pixel differed
/// from the background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    /// Leftmost foreground column.
    pub x1: u32,
    /// Topmost foreground row.
    pub y1: u32,
    /// Rightmost foreground column.
    pub x2: u32,
    /// Bottommost foreground row.
    pub y2: u32,
    /// Width of the image the box was detected in.
    pub source_width: u32,
    /// Height of the image the box was detected in.
    pub source_height: u32,
}

impl BoundingBox {
    fn empty(source_width: u32, source_height: u32) -> Self {
        Self {
            x1: source_width,
            y1: source_height,
            x2: 0,
            y2: 0,
            source_width,
            source_height,
        }
    }

    /// Returns true when at least one foreground pixel was found.
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Number of columns covered (inclusive), zero when invalid.
    pub fn width(&self) -> u32 {
        if self.is_valid() {
            self.x2 - self.x1 + 1
        } else {
            0
        }
    }

    /// Number of rows covered (inclusive), zero when invalid.
    pub fn height(&self) -> u32 {
        if self.is_valid() {
            self.y2 - self.y1 + 1
        } else {
            0
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.x1 = self.x1.min(x);
        self.y1 = self.y1.min(y);
        self.x2 = self.x2.max(x);
        self.y2 = self.y2.max(y);
    }
}

/// Scans every pixel and returns the tightest box around foreground pixels.
///
/// The background reference is the top-left pixel for the color-tolerance
/// strategy; the grayscale strategy classifies pixels by luminance alone.
pub fn detect_bounding_box(raster: &RasterImage, strategy: DetectionStrategy) -> BoundingBox {
    let width = raster.width();
    let height = raster.height();
    let mut bbox = BoundingBox::empty(width, height);
    let background = match raster.pixel(0, 0) {
        Some(px) => px,
        None => return bbox,
    };

    for y in 0..height {
        let Some(row) = raster.row(y) else {
            break;
        };
        for (x, px) in row.chunks_exact(4).enumerate() {
            let px = [px[0], px[1], px[2], px[3]];
            if strategy.is_foreground(px, background) {
                bbox.include(x as u32, y);
            }
        }
    }
    bbox
}
