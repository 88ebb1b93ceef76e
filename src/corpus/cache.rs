//! Lazily filled cache of normalized corpus rasters.
//!
//! Each slot is populated at most once, the first time any query normalizes
//! the matching entry, and stored in a `OnceLock` so concurrent queries share
//! the result. Failures are cached too: normalization is deterministic, so a
//! retry would fail the same way.

use crate::corpus::CorpusEntry;
use crate::image::{RasterCodec, RasterImage};
use crate::normalize::Normalizer;
use crate::util::IconMatchResult;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Per-entry cache of Direct-mode canonical rasters for one canonical size.
pub struct RasterCache {
    size: u32,
    slots: Vec<OnceLock<IconMatchResult<RasterImage>>>,
}

impl RasterCache {
    /// Creates an empty cache for `len` entries at canonical `size`.
    pub fn new(len: usize, size: u32) -> Self {
        let slots = (0..len).map(|_| OnceLock::new()).collect();
        Self { size, slots }
    }

    /// Returns the canonical size this cache was built for.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns how many slots have been filled.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    /// Returns the normalized raster for entry `index`, computing it on first
    /// use. Bypasses the cache when the normalizer's size differs.
    pub fn get_or_normalize<'a, C: RasterCodec>(
        &'a self,
        index: usize,
        entry: &CorpusEntry,
        normalizer: &Normalizer<C>,
    ) -> IconMatchResult<Cow<'a, RasterImage>> {
        let slot = match self.slots.get(index) {
            Some(slot) if normalizer.size() == self.size => slot,
            _ => return normalize_entry(entry, normalizer).map(Cow::Owned),
        };
        match slot.get_or_init(|| normalize_entry(entry, normalizer)) {
            Ok(raster) => Ok(Cow::Borrowed(raster)),
            Err(err) => Err(err.clone()),
        }
    }
}

/// Loads and Direct-normalizes a single corpus entry.
pub(crate) fn normalize_entry<C: RasterCodec>(
    entry: &CorpusEntry,
    normalizer: &Normalizer<C>,
) -> IconMatchResult<RasterImage> {
    let bytes = entry.source().load()?;
    normalizer.direct(&bytes)
}

impl std::fmt::Debug for RasterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterCache")
            .field("size", &self.size)
            .field("len", &self.slots.len())
            .field("filled", &self.filled())
            .finish()
    }
}
