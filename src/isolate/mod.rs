//! Subject isolation: bounding-box detection, square padding, and cropping.
//!
//! The isolator finds the tightest box around pixels that differ from the
//! background, pads it to a square, and crops it out of the source. The
//! square's origin never leaves the image: padding that would start before
//! the top or left edge is clamped to zero, and whatever then runs past the
//! right or bottom edge is filled with opaque white. With the RGBA
//! color-tolerance strategy, light foreground strokes are recolored to a
//! solid foreground color before cropping. When no pixel
//! differs from the background the outcome is an explicit
//! [`Isolation::Fallback`] and callers normalize the whole image instead.

mod bbox;
mod square;

pub use bbox::{detect_bounding_box, BoundingBox};
pub use square::{crop_square, SquareRegion};

use crate::image::{luminance_over_white, RasterImage};
use crate::trace::{trace_event, trace_span};
use crate::util::IconMatchResult;

/// How foreground pixels are told apart from background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DetectionStrategy {
    /// Compare R, G, B against the top-left pixel; a pixel is background when
    /// every color channel differs by less than `tolerance`. Alpha is ignored.
    ColorTolerance { tolerance: u8 },
    /// A pixel is foreground when its luminance, composited over white, is
    /// below `threshold`.
    GrayscaleThreshold { threshold: u8 },
}

impl Default for DetectionStrategy {
    fn default() -> Self {
        Self::ColorTolerance { tolerance: 25 }
    }
}

impl DetectionStrategy {
    /// Classifies `px` against the background reference.
    pub fn is_foreground(&self, px: [u8; 4], background: [u8; 4]) -> bool {
        match *self {
            Self::ColorTolerance { tolerance } => px[..3]
                .iter()
                .zip(&background[..3])
                .any(|(&a, &b)| a.abs_diff(b) >= tolerance),
            Self::GrayscaleThreshold { threshold } => {
                luminance_over_white(px) < f32::from(threshold)
            }
        }
    }
}

/// Repaints light foreground pixels so thin strokes survive downscaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recolor {
    /// Foreground pixels at or above this luminance are repainted.
    pub min_luminance: u8,
    /// Replacement color.
    pub color: [u8; 4],
}

impl Default for Recolor {
    fn default() -> Self {
        Self {
            min_luminance: 128,
            color: [0, 0, 0, 255],
        }
    }
}

/// Configuration for subject isolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsolateConfig {
    /// Foreground detection strategy.
    pub strategy: DetectionStrategy,
    /// Recoloring of light strokes; only applied with
    /// [`DetectionStrategy::ColorTolerance`].
    pub recolor: Option<Recolor>,
}

impl Default for IsolateConfig {
    fn default() -> Self {
        Self {
            strategy: DetectionStrategy::default(),
            recolor: Some(Recolor::default()),
        }
    }
}

/// Outcome of isolating the subject of a raster.
#[derive(Clone, Debug, PartialEq)]
pub enum Isolation {
    /// The subject was found and cropped to a square.
    Isolated {
        bbox: BoundingBox,
        square: RasterImage,
    },
    /// Nothing differs from the background; the whole image is the subject.
    Fallback { bbox: BoundingBox },
}

/// Detects, pads, and crops the drawn subject of a raster.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubjectIsolator {
    cfg: IsolateConfig,
}

impl SubjectIsolator {
    /// Creates an isolator with the given configuration.
    pub fn new(cfg: IsolateConfig) -> Self {
        Self { cfg }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &IsolateConfig {
        &self.cfg
    }

    /// Isolates the subject of `src` into a square raster at source scale.
    pub fn isolate(&self, src: &RasterImage) -> IconMatchResult<Isolation> {
        let _span = trace_span!("isolate", width = src.width(), height = src.height()).entered();

        let bbox = detect_bounding_box(src, self.cfg.strategy);
        let Some(region) = SquareRegion::around(&bbox) else {
            trace_event!("geometry_fallback", width = src.width(), height = src.height());
            return Ok(Isolation::Fallback { bbox });
        };

        let square = match self.recolor_target() {
            Some(recolor) => crop_square(&self.recolored(src, &bbox, recolor), region)?,
            None => crop_square(src, region)?,
        };
        trace_event!(
            "subject_isolated",
            x1 = bbox.x1,
            y1 = bbox.y1,
            side = region.side,
            overflow = region.overflows(src.width(), src.height())
        );
        Ok(Isolation::Isolated { bbox, square })
    }

    fn recolor_target(&self) -> Option<Recolor> {
        match self.cfg.strategy {
            DetectionStrategy::ColorTolerance { .. } => self.cfg.recolor,
            DetectionStrategy::GrayscaleThreshold { .. } => None,
        }
    }

    fn recolored(&self, src: &RasterImage, bbox: &BoundingBox, recolor: Recolor) -> RasterImage {
        let mut out = src.clone();
        let Some(background) = src.pixel(0, 0) else {
            return out;
        };
        for y in bbox.y1..=bbox.y2 {
            for x in bbox.x1..=bbox.x2 {
                let Some(px) = src.pixel(x, y) else {
                    continue;
                };
                if self.cfg.strategy.is_foreground(px, background)
                    && luminance_over_white(px) >= f32::from(recolor.min_luminance)
                {
                    out.put_pixel(x, y, recolor.color);
                }
            }
        }
        out
    }
}
