//! Normalization of encoded images into canonical rasters.
//!
//! A canonical raster is `size x size` RGBA. Direct mode stretches the decoded
//! image to that size with independent x/y scale. Isolated mode first crops
//! the subject to a padded square (see [`crate::isolate`]) and then resizes
//! the square, so the subject's aspect ratio survives.

use crate::image::{RasterCodec, RasterImage};
use crate::isolate::{IsolateConfig, Isolation, SubjectIsolator};
use crate::trace::{trace_event, trace_span};
use crate::util::{IconMatchError, IconMatchResult};

/// Default canonical side length in pixels.
pub const CANONICAL_SIZE: u32 = 28;

/// Configuration for normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Canonical side length.
    pub size: u32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            size: CANONICAL_SIZE,
        }
    }
}

/// Normalization mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NormalizeMode {
    /// Stretch the whole image to the canonical size.
    Direct,
    /// Isolate the subject, pad it square, then resize.
    Isolated(IsolateConfig),
}

/// Turns encoded bytes into canonical rasters using a codec.
#[derive(Clone, Debug)]
pub struct Normalizer<C> {
    codec: C,
    size: u32,
}

impl<C: RasterCodec> Normalizer<C> {
    /// Creates a normalizer; the canonical size must be non-zero.
    pub fn new(codec: C, cfg: NormalizeConfig) -> IconMatchResult<Self> {
        if cfg.size == 0 {
            return Err(IconMatchError::InvalidConfig("canonical size must be > 0"));
        }
        Ok(Self {
            codec,
            size: cfg.size,
        })
    }

    /// Returns the canonical side length.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the underlying codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Normalizes `bytes` in the requested mode.
    pub fn normalize(&self, bytes: &[u8], mode: NormalizeMode) -> IconMatchResult<RasterImage> {
        match mode {
            NormalizeMode::Direct => self.direct(bytes),
            NormalizeMode::Isolated(cfg) => self.isolated(bytes, &SubjectIsolator::new(cfg)),
        }
    }

    /// Decodes and stretches `bytes` to the canonical size.
    pub fn direct(&self, bytes: &[u8]) -> IconMatchResult<RasterImage> {
        let _span = trace_span!("normalize", mode = "direct", len = bytes.len()).entered();
        self.codec.decode_resized(bytes, self.size, self.size)
    }

    /// Isolates the subject of `bytes` and resizes it to the canonical size.
    ///
    /// Falls back to [`Normalizer::direct`] when no subject is found.
    pub fn isolated(
        &self,
        bytes: &[u8],
        isolator: &SubjectIsolator,
    ) -> IconMatchResult<RasterImage> {
        let _span = trace_span!("normalize", mode = "isolated", len = bytes.len()).entered();
        let decoded = self.codec.decode(bytes)?;
        match isolator.isolate(&decoded)? {
            Isolation::Isolated { square, .. } => {
                if square.width() == self.size && square.height() == self.size {
                    return Ok(square);
                }
                self.codec.resize(&square, self.size, self.size)
            }
            Isolation::Fallback { .. } => {
                trace_event!("normalize_fallback", size = self.size);
                self.direct(bytes)
            }
        }
    }
}
