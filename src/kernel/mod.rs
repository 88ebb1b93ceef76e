//! Pixel-difference kernels.
//!
//! A kernel counts the pixels of two equally sized RGBA buffers that differ
//! beyond a perceptual tolerance. The scorer divides that count by the pixel
//! total to obtain a mismatch ratio.

pub mod yiq;

pub use yiq::YiqDiff;

/// Tolerance settings passed to a [`PixelDiff`] kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffParams {
    /// Matching threshold in `[0, 1]`; smaller is stricter.
    pub threshold: f64,
    /// Count anti-aliased pixels as differences.
    pub include_aa: bool,
}

impl Default for DiffParams {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            include_aa: false,
        }
    }
}

/// Kernel trait for counting differing pixels.
///
/// Buffers are row-major RGBA with length `width * height * 4`; callers
/// validate dimensions before invoking the kernel.
pub trait PixelDiff: Send + Sync {
    /// Returns the number of pixels that differ beyond `params`.
    fn count_diff(&self, a: &[u8], b: &[u8], width: u32, height: u32, params: DiffParams)
        -> usize;
}
