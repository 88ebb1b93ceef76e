//! Per-entry scoring fan-out.
//!
//! Each entry is scored independently; results come back in corpus order
//! with `None` for entries that could not be scored.

use crate::candidate::topk::Scored;
use crate::corpus::{CorpusEntry, CorpusSnapshot};
use crate::image::{RasterCodec, RasterImage};
use crate::normalize::Normalizer;
use crate::score::SimilarityScorer;
use crate::trace::trace_warn;
#[cfg(feature = "rayon")]
use crate::util::{IconMatchError, IconMatchResult};
use std::borrow::Cow;

pub(crate) struct ScoreJob<'a, C> {
    pub(crate) normalizer: &'a Normalizer<C>,
    pub(crate) scorer: &'a SimilarityScorer,
    pub(crate) query: &'a RasterImage,
    pub(crate) corpus: &'a CorpusSnapshot,
}

impl<C: RasterCodec> ScoreJob<'_, C> {
    fn score_entry(&self, index: usize, entry: &CorpusEntry) -> Option<Scored> {
        let normalized = match self.corpus.cache() {
            Some(cache) => cache.get_or_normalize(index, entry, self.normalizer),
            None => crate::corpus::normalize_entry(entry, self.normalizer).map(Cow::Owned),
        };
        let raster = match normalized {
            Ok(raster) => raster,
            Err(err) => {
                trace_warn!("corpus_entry_excluded", id = entry.id(), error = err.to_string());
                return None;
            }
        };
        match self.scorer.score(self.query, &raster) {
            Ok(score) => Some(Scored {
                index,
                mismatch: score.mismatch,
            }),
            Err(err) => {
                trace_warn!("corpus_entry_excluded", id = entry.id(), error = err.to_string());
                None
            }
        }
    }
}

/// Scores every entry on the calling thread.
pub(crate) fn score_all<C: RasterCodec>(job: &ScoreJob<'_, C>) -> Vec<Option<Scored>> {
    job.corpus
        .index()
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| job.score_entry(index, entry))
        .collect()
}

/// Scores every entry on `pool`; returns once all entries are done.
#[cfg(feature = "rayon")]
pub(crate) fn score_all_par<C: RasterCodec>(
    pool: &rayon::ThreadPool,
    job: &ScoreJob<'_, C>,
) -> Vec<Option<Scored>> {
    use rayon::prelude::*;

    pool.install(|| {
        job.corpus
            .index()
            .entries()
            .par_iter()
            .enumerate()
            .map(|(index, entry)| job.score_entry(index, entry))
            .collect()
    })
}

/// Builds the bounded worker pool used for the fan-out.
#[cfg(feature = "rayon")]
pub(crate) fn build_pool(max_concurrency: usize) -> IconMatchResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(max_concurrency)
        .thread_name(|idx| format!("iconmatch-rank-{idx}"))
        .build()
        .map_err(|err| IconMatchError::ThreadPool {
            reason: err.to_string(),
        })
}
