//! Square padding and cropping around a detected subject.

use crate::image::{RasterImage, OPAQUE_WHITE};
use crate::isolate::BoundingBox;
use crate::util::IconMatchResult;

/// Square crop region in source pixel space.
///
/// The origin is always inside the source; the far edge may run past the
/// source bounds when padding pushes it there, never detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareRegion {
    /// Left edge.
    pub left: u32,
    /// Top edge.
    pub top: u32,
    /// Side length in pixels.
    pub side: u32,
}

impl SquareRegion {
    /// Pads the shorter side of a valid box so the region becomes square.
    ///
    /// The difference is split with `floor(d / 2)` before and the remainder
    /// after; an origin pushed below zero is clamped to zero, so the extra
    /// padding lands after the subject. Returns `None` for an invalid box.
    pub fn around(bbox: &BoundingBox) -> Option<Self> {
        if !bbox.is_valid() {
            return None;
        }
        let width = bbox.width();
        let height = bbox.height();
        let side = width.max(height);
        let pad_x = (side - width) / 2;
        let pad_y = (side - height) / 2;
        Some(Self {
            left: bbox.x1.saturating_sub(pad_x),
            top: bbox.y1.saturating_sub(pad_y),
            side,
        })
    }

    /// True when part of the region lies past the right or bottom edge.
    pub fn overflows(&self, width: u32, height: u32) -> bool {
        u64::from(self.left) + u64::from(self.side) > u64::from(width)
            || u64::from(self.top) + u64::from(self.side) > u64::from(height)
    }
}

/// Copies `region` out of `src`, filling any part past the source edges with
/// opaque white.
pub fn crop_square(src: &RasterImage, region: SquareRegion) -> IconMatchResult<RasterImage> {
    let side = region.side;
    let mut out = RasterImage::filled(side, side, OPAQUE_WHITE)?;

    let x_end = region.left.saturating_add(side).min(src.width());
    let y_end = region.top.saturating_add(side).min(src.height());
    for sy in region.top..y_end {
        for sx in region.left..x_end {
            if let Some(px) = src.pixel(sx, sy) {
                out.put_pixel(sx - region.left, sy - region.top, px);
            }
        }
    }
    Ok(out)
}
