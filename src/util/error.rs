//! Error types for iconmatch.

use thiserror::Error;

/// Result alias for iconmatch operations.
pub type IconMatchResult<T> = std::result::Result<T, IconMatchError>;

/// Errors that can occur while normalizing, scoring, or ranking icons.
///
/// Reasons are carried as strings so the error stays `Clone` and can be
/// cached alongside normalized corpus rasters.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IconMatchError {
    /// A raster dimension is zero or overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// A pixel buffer does not hold exactly `width * height * 4` bytes.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },
    /// Two rasters that must share dimensions do not.
    #[error("dimension mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },
    /// Encoded image bytes could not be decoded.
    #[error("decode failed: {reason}")]
    Decode { reason: String },
    /// Reading an image source failed.
    #[error("io error on {path}: {reason}")]
    Io { path: String, reason: String },
    /// The corpus manifest is malformed.
    #[error("invalid manifest: {reason}")]
    Manifest { reason: String },
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// The worker pool could not be created.
    #[error("thread pool error: {reason}")]
    ThreadPool { reason: String },
}

impl IconMatchError {
    pub(crate) fn decode(reason: impl ToString) -> Self {
        Self::Decode {
            reason: reason.to_string(),
        }
    }
}
