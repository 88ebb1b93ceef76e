//! Low-level building blocks for custom lookup pipelines.
//!
//! These expose the geometry helpers, the pixel-difference kernel, and the
//! Top-K collector behind the high-level `IconMatcher`. Most users should
//! prefer `IconMatcher` and `RankingEngine`.

pub use crate::candidate::topk::{Scored, TopK};
pub use crate::corpus::RasterCache;
pub use crate::image::{CHANNELS, OPAQUE_WHITE};
pub use crate::isolate::{crop_square, detect_bounding_box, Recolor, SquareRegion};
pub use crate::kernel::YiqDiff;
