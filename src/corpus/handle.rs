//! Process-wide corpus handle with explicit, synchronized replacement.

use crate::corpus::{CorpusIndex, RasterCache};
use parking_lot::RwLock;
use std::sync::Arc;

/// A corpus together with its optional normalized-raster cache.
#[derive(Debug)]
pub struct CorpusSnapshot {
    index: CorpusIndex,
    cache: Option<RasterCache>,
}

impl CorpusSnapshot {
    /// Wraps an index without caching; entries are normalized per query.
    pub fn new(index: CorpusIndex) -> Self {
        Self { index, cache: None }
    }

    /// Wraps an index with a cache for canonical rasters of `size`.
    pub fn with_cache(index: CorpusIndex, size: u32) -> Self {
        let cache = RasterCache::new(index.len(), size);
        Self {
            index,
            cache: Some(cache),
        }
    }

    /// Returns the corpus entries.
    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    /// Returns the cache, if enabled.
    pub fn cache(&self) -> Option<&RasterCache> {
        self.cache.as_ref()
    }
}

impl From<CorpusIndex> for CorpusSnapshot {
    fn from(index: CorpusIndex) -> Self {
        Self::new(index)
    }
}

/// Shared, read-mostly handle to the current corpus.
///
/// Readers take a cheap `Arc` snapshot and keep it for the whole query, so a
/// concurrent [`CorpusHandle::swap`] never changes a query mid-flight.
#[derive(Debug)]
pub struct CorpusHandle {
    current: RwLock<Arc<CorpusSnapshot>>,
}

impl CorpusHandle {
    /// Creates a handle around an initial snapshot.
    pub fn new(snapshot: CorpusSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the corpus and returns the previous snapshot.
    pub fn swap(&self, snapshot: CorpusSnapshot) -> Arc<CorpusSnapshot> {
        let mut guard = self.current.write();
        std::mem::replace(&mut *guard, Arc::new(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusEntry;

    fn index(ids: &[&str]) -> CorpusIndex {
        CorpusIndex::new(
            ids.iter()
                .map(|id| CorpusEntry::new(*id, vec![0u8]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn swap_keeps_old_snapshots_alive() {
        let handle = CorpusHandle::new(CorpusSnapshot::new(index(&["a"])));
        let before = handle.snapshot();
        let previous = handle.swap(CorpusSnapshot::with_cache(index(&["b", "c"]), 28));

        assert_eq!(before.index().entries()[0].id(), "a");
        assert!(Arc::ptr_eq(&before, &previous));
        let after = handle.snapshot();
        assert_eq!(after.index().len(), 2);
        assert_eq!(after.cache().map(RasterCache::size), Some(28));
    }
}
