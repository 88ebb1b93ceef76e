//! High-level icon lookup: vector-input and bitmap-input match.
//!
//! `IconMatcher` owns the normalizer, the ranking engine, and a swappable
//! handle to the corpus. Vector queries are normalized in Direct mode and
//! ranked with a strict threshold; bitmap queries are subject-isolated first
//! and ranked with a looser one, since isolation and resampling of hand-drawn
//! bitmaps introduce more noise.

use crate::corpus::{CorpusHandle, CorpusIndex, CorpusSnapshot};
use crate::image::{RasterCodec, RasterImage};
use crate::isolate::IsolateConfig;
use crate::normalize::{NormalizeConfig, NormalizeMode, Normalizer};
use crate::score::{ScoreConfig, SimilarityScorer};
use crate::search::{MatchResult, RankConfig, RankingEngine};
use crate::trace::{trace_event, trace_span};
use crate::util::{IconMatchError, IconMatchResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default threshold for vector-derived queries.
pub const VECTOR_THRESHOLD: f64 = 0.15;

/// Default threshold for bitmap-derived queries.
pub const BITMAP_THRESHOLD: f64 = 0.20;

/// Kind of drawing a query was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modality {
    /// SVG markup; normalized directly.
    Vector,
    /// Encoded bitmap; subject-isolated before normalization.
    Bitmap,
}

/// Top-level configuration for [`IconMatcher`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatcherConfig {
    /// Canonical raster size.
    pub normalize: NormalizeConfig,
    /// Pixel-difference tolerance.
    pub score: ScoreConfig,
    /// Result limit and fan-out settings.
    pub rank: RankConfig,
    /// Subject isolation for bitmap queries.
    pub isolate: IsolateConfig,
    /// Mismatch threshold for vector queries.
    pub vector_threshold: f64,
    /// Mismatch threshold for bitmap queries.
    pub bitmap_threshold: f64,
    /// Cache normalized corpus rasters across queries.
    pub cache_corpus: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            normalize: NormalizeConfig::default(),
            score: ScoreConfig::default(),
            rank: RankConfig::default(),
            isolate: IsolateConfig::default(),
            vector_threshold: VECTOR_THRESHOLD,
            bitmap_threshold: BITMAP_THRESHOLD,
            cache_corpus: false,
        }
    }
}

impl MatcherConfig {
    /// Returns the threshold for a modality.
    pub fn threshold(&self, modality: Modality) -> f64 {
        match modality {
            Modality::Vector => self.vector_threshold,
            Modality::Bitmap => self.bitmap_threshold,
        }
    }

    /// Returns the normalization mode for a modality.
    pub fn normalize_mode(&self, modality: Modality) -> NormalizeMode {
        match modality {
            Modality::Vector => NormalizeMode::Direct,
            Modality::Bitmap => NormalizeMode::Isolated(self.isolate),
        }
    }

    fn validate(&self) -> IconMatchResult<()> {
        for threshold in [self.vector_threshold, self.bitmap_threshold] {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(IconMatchError::InvalidConfig(
                    "thresholds must be finite and > 0",
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.score.threshold) {
            return Err(IconMatchError::InvalidConfig(
                "pixel threshold must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Ranked results for one query.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchReport {
    /// Results, best first.
    pub results: Vec<MatchResult>,
    /// Wall time spent normalizing and ranking.
    pub elapsed: Duration,
}

impl MatchReport {
    /// Elapsed time in whole milliseconds.
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Whole milliseconds of `d`, saturating at `u64::MAX`.
fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Icon lookup over a shared, swappable corpus.
#[derive(Debug)]
pub struct IconMatcher<C> {
    normalizer: Normalizer<C>,
    engine: RankingEngine,
    corpus: CorpusHandle,
    cfg: MatcherConfig,
}

impl<C: RasterCodec> IconMatcher<C> {
    /// Creates a matcher over `corpus`.
    pub fn new(codec: C, corpus: CorpusIndex, cfg: MatcherConfig) -> IconMatchResult<Self> {
        cfg.validate()?;
        let normalizer = Normalizer::new(codec, cfg.normalize)?;
        let engine = RankingEngine::new(cfg.rank, SimilarityScorer::with_params(cfg.score))?;
        let corpus = CorpusHandle::new(Self::snapshot_for(&cfg, corpus));
        Ok(Self {
            normalizer,
            engine,
            corpus,
            cfg,
        })
    }

    fn snapshot_for(cfg: &MatcherConfig, corpus: CorpusIndex) -> CorpusSnapshot {
        if cfg.cache_corpus {
            CorpusSnapshot::with_cache(corpus, cfg.normalize.size)
        } else {
            CorpusSnapshot::new(corpus)
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }

    /// Returns the normalizer used for queries and corpus entries.
    pub fn normalizer(&self) -> &Normalizer<C> {
        &self.normalizer
    }

    /// Returns the current corpus snapshot.
    pub fn corpus(&self) -> Arc<CorpusSnapshot> {
        self.corpus.snapshot()
    }

    /// Replaces the corpus; queries already running keep the old one.
    pub fn replace_corpus(&self, corpus: CorpusIndex) -> Arc<CorpusSnapshot> {
        self.corpus.swap(Self::snapshot_for(&self.cfg, corpus))
    }

    /// Matches raw SVG markup.
    pub fn match_vector(&self, bytes: &[u8]) -> IconMatchResult<MatchReport> {
        self.match_bytes(bytes, Modality::Vector)
    }

    /// Matches raw bitmap bytes (already transport-decoded).
    pub fn match_bitmap(&self, bytes: &[u8]) -> IconMatchResult<MatchReport> {
        self.match_bytes(bytes, Modality::Bitmap)
    }

    /// Normalizes `bytes` for `modality` and ranks the corpus against it.
    ///
    /// A query that fails to normalize aborts the request.
    pub fn match_bytes(&self, bytes: &[u8], modality: Modality) -> IconMatchResult<MatchReport> {
        let start = Instant::now();
        let _span = trace_span!("match", modality = ?modality, len = bytes.len()).entered();

        let query = self
            .normalizer
            .normalize(bytes, self.cfg.normalize_mode(modality))?;
        let results = self.rank_raster(&query, modality)?;

        let elapsed = start.elapsed();
        trace_event!(
            "matched",
            results = results.len(),
            elapsed_ms = saturating_millis(elapsed)
        );
        Ok(MatchReport { results, elapsed })
    }

    /// Ranks an already canonical query raster.
    pub fn rank_raster(
        &self,
        query: &RasterImage,
        modality: Modality,
    ) -> IconMatchResult<Vec<MatchResult>> {
        let corpus = self.corpus.snapshot();
        self.engine.rank(
            &self.normalizer,
            query,
            &corpus,
            self.cfg.threshold(modality),
        )
    }
}

#[cfg(feature = "image-io")]
impl IconMatcher<crate::image::io::ImageCodec> {
    /// Creates a matcher with the default `image`/`resvg` codec.
    pub fn with_default_codec(corpus: CorpusIndex, cfg: MatcherConfig) -> IconMatchResult<Self> {
        Self::new(crate::image::io::ImageCodec::default(), corpus, cfg)
    }
}
