//! Exhaustive ranking of a query raster against the corpus.
//!
//! Every corpus entry is normalized (Direct mode) and scored against the
//! query. The fan-out runs on a bounded rayon pool when the `rayon` feature
//! is enabled and `parallel` is set, and is joined before filtering. Entries
//! at or above the threshold are dropped; the rest are sorted ascending by
//! mismatch with corpus order breaking ties, then truncated to `limit`.

mod fanout;

use crate::candidate::topk::{Scored, TopK};
use crate::corpus::CorpusSnapshot;
use crate::image::{RasterCodec, RasterImage};
use crate::normalize::Normalizer;
use crate::score::SimilarityScorer;
use crate::trace::{trace_event, trace_span};
use crate::util::{IconMatchError, IconMatchResult};

/// Default number of results returned per query.
pub const RESULT_LIMIT: usize = 10;

/// Ranking configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankConfig {
    /// Maximum number of results.
    pub limit: usize,
    /// Score corpus entries concurrently (requires the `rayon` feature).
    pub parallel: bool,
    /// Worker threads for the fan-out; `0` uses the available parallelism.
    pub max_concurrency: usize,
    /// Copy each entry's source location into its result.
    pub include_source: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            limit: RESULT_LIMIT,
            parallel: cfg!(feature = "rayon"),
            max_concurrency: 0,
            include_source: false,
        }
    }
}

/// A ranked corpus entry.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Corpus entry identifier.
    pub id: String,
    /// Fraction of differing pixels, in `[0, 1]`.
    pub mismatch: f64,
    /// True when the mismatch is exactly zero.
    pub exact_match: bool,
    /// Source location, when requested and available.
    pub source: Option<String>,
}

/// Scores a query against every corpus entry and ranks the survivors.
pub struct RankingEngine {
    cfg: RankConfig,
    scorer: SimilarityScorer,
    #[cfg(feature = "rayon")]
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for RankingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingEngine")
            .field("cfg", &self.cfg)
            .field("scorer", &self.scorer)
            .finish_non_exhaustive()
    }
}

impl RankingEngine {
    /// Creates an engine; builds the worker pool up front when parallel.
    pub fn new(cfg: RankConfig, scorer: SimilarityScorer) -> IconMatchResult<Self> {
        #[cfg(feature = "rayon")]
        let pool = if cfg.parallel {
            Some(fanout::build_pool(cfg.max_concurrency)?)
        } else {
            None
        };
        Ok(Self {
            cfg,
            scorer,
            #[cfg(feature = "rayon")]
            pool,
        })
    }

    /// Returns the ranking configuration.
    pub fn config(&self) -> &RankConfig {
        &self.cfg
    }

    /// Returns the scorer.
    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    /// Ranks `corpus` against a canonical `query` raster.
    ///
    /// Only entries with mismatch strictly below `threshold` are returned.
    /// Entries that fail to load or normalize are logged and skipped.
    pub fn rank<C: RasterCodec>(
        &self,
        normalizer: &Normalizer<C>,
        query: &RasterImage,
        corpus: &CorpusSnapshot,
        threshold: f64,
    ) -> IconMatchResult<Vec<MatchResult>> {
        if threshold.is_nan() {
            return Err(IconMatchError::InvalidConfig("threshold must not be NaN"));
        }
        let size = normalizer.size();
        if query.width() != size || query.height() != size {
            return Err(IconMatchError::DimensionMismatch {
                left_width: query.width(),
                left_height: query.height(),
                right_width: size,
                right_height: size,
            });
        }

        let index = corpus.index();
        let _span = trace_span!("rank", entries = index.len(), threshold = threshold).entered();

        let job = fanout::ScoreJob {
            normalizer,
            scorer: &self.scorer,
            query,
            corpus,
        };
        #[cfg(feature = "rayon")]
        let scored = match &self.pool {
            Some(pool) => fanout::score_all_par(pool, &job),
            None => fanout::score_all(&job),
        };
        #[cfg(not(feature = "rayon"))]
        let scored = fanout::score_all(&job);

        let mut topk = TopK::new(self.cfg.limit);
        for item in scored.into_iter().flatten() {
            if item.mismatch < threshold {
                topk.push(item);
            }
        }
        let kept = topk.into_sorted_asc();
        trace_event!("ranked", kept = kept.len());

        Ok(kept
            .into_iter()
            .filter_map(|Scored { index: idx, mismatch }| {
                let entry = index.get(idx)?;
                Some(MatchResult {
                    id: entry.id().to_string(),
                    mismatch,
                    exact_match: mismatch == 0.0,
                    source: if self.cfg.include_source {
                        entry.source().describe()
                    } else {
                        None
                    },
                })
            })
            .collect())
    }
}
