//! IconMatch is a CPU-first visual icon lookup library.
//!
//! A query image (SVG markup or an encoded bitmap) is normalized into a small
//! canonical RGBA raster, optionally after isolating the drawn subject, and
//! compared pixel by pixel against every icon of a fixed corpus. Entries whose
//! mismatch ratio falls below a threshold are returned best first.
//!
//! Corpus scoring fans out over a bounded thread pool with the `rayon`
//! feature. Decoding uses the `image` crate (`image-io`) and `resvg` (`svg`).

mod candidate;
pub mod corpus;
pub mod image;
pub mod isolate;
pub mod kernel;
pub mod lowlevel;
mod matcher;
pub mod normalize;
pub mod score;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use corpus::{CorpusEntry, CorpusHandle, CorpusIndex, CorpusSnapshot, ImageSource};
pub use crate::image::{RasterCodec, RasterImage};
pub use isolate::{BoundingBox, DetectionStrategy, IsolateConfig, Isolation, SubjectIsolator};
pub use kernel::{DiffParams, PixelDiff};
pub use matcher::{
    IconMatcher, MatchReport, MatcherConfig, Modality, BITMAP_THRESHOLD, VECTOR_THRESHOLD,
};
pub use normalize::{NormalizeConfig, NormalizeMode, Normalizer, CANONICAL_SIZE};
pub use score::{Score, ScoreConfig, SimilarityScorer};
pub use search::{MatchResult, RankConfig, RankingEngine, RESULT_LIMIT};
pub use util::{IconMatchError, IconMatchResult};
