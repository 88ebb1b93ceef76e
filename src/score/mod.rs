//! Mismatch-ratio scoring between canonical rasters.

use crate::image::RasterImage;
use crate::kernel::{DiffParams, PixelDiff, YiqDiff};
use crate::util::{IconMatchError, IconMatchResult};
use std::sync::Arc;

/// Configuration for the similarity scorer.
pub type ScoreConfig = DiffParams;

/// Mismatch ratio between two rasters plus its raw pixel count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Score {
    /// Number of pixels that differ beyond tolerance.
    pub differing: usize,
    /// Total pixels compared.
    pub total: usize,
    /// `differing / total`, in `[0, 1]`.
    pub mismatch: f64,
}

impl Score {
    /// True when every pixel matched within tolerance.
    pub fn is_exact(&self) -> bool {
        self.differing == 0
    }
}

/// Scores two equally sized rasters with a pixel-difference kernel.
#[derive(Clone)]
pub struct SimilarityScorer {
    kernel: Arc<dyn PixelDiff>,
    params: DiffParams,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(YiqDiff, DiffParams::default())
    }
}

impl std::fmt::Debug for SimilarityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl SimilarityScorer {
    /// Creates a scorer around a kernel and tolerance settings.
    pub fn new<K: PixelDiff + 'static>(kernel: K, params: DiffParams) -> Self {
        Self {
            kernel: Arc::new(kernel),
            params,
        }
    }

    /// Creates a YIQ scorer with the given tolerance settings.
    pub fn with_params(params: DiffParams) -> Self {
        Self::new(YiqDiff, params)
    }

    /// Returns the tolerance settings.
    pub fn params(&self) -> DiffParams {
        self.params
    }

    /// Computes the mismatch ratio of `a` against `b`.
    ///
    /// Both rasters must share width and height; anything else is a caller
    /// error reported as [`IconMatchError::DimensionMismatch`].
    pub fn score(&self, a: &RasterImage, b: &RasterImage) -> IconMatchResult<Score> {
        if !a.same_dimensions(b) {
            return Err(IconMatchError::DimensionMismatch {
                left_width: a.width(),
                left_height: a.height(),
                right_width: b.width(),
                right_height: b.height(),
            });
        }
        let total = a.pixel_count();
        let differing = self.kernel.count_diff(
            a.as_bytes(),
            b.as_bytes(),
            a.width(),
            a.height(),
            self.params,
        );
        Ok(Score {
            differing,
            total,
            mismatch: differing as f64 / total as f64,
        })
    }
}
