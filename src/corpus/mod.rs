//! Immutable icon corpus.
//!
//! The corpus is an insertion-ordered list of entries, each pairing a unique
//! identifier with the source of its image. It is built once, never mutated,
//! and shared read-only between concurrent queries. Insertion order is the
//! tie-breaker when two entries score the same.

mod cache;
mod handle;
#[cfg(feature = "manifest")]
mod manifest;

pub use cache::RasterCache;
pub(crate) use cache::normalize_entry;
pub use handle::{CorpusHandle, CorpusSnapshot};

use crate::util::{IconMatchError, IconMatchResult};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a corpus entry's encoded image comes from.
#[derive(Clone)]
pub enum ImageSource {
    /// A file read on demand.
    Path(PathBuf),
    /// Bytes held in memory.
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    /// Reads the encoded bytes.
    pub fn load(&self) -> IconMatchResult<Cow<'_, [u8]>> {
        match self {
            Self::Path(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|err| IconMatchError::Io {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                }),
            Self::Bytes(bytes) => Ok(Cow::Borrowed(&bytes[..])),
        }
    }

    /// Human-readable location for diagnostics; `None` for in-memory bytes.
    pub fn describe(&self) -> Option<String> {
        match self {
            Self::Path(path) => Some(path.display().to_string()),
            Self::Bytes(_) => None,
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes.into())
    }
}

/// One icon in the corpus.
#[derive(Clone, Debug)]
pub struct CorpusEntry {
    id: String,
    source: ImageSource,
}

impl CorpusEntry {
    /// Creates an entry from an identifier and an image source.
    pub fn new(id: impl Into<String>, source: impl Into<ImageSource>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }

    /// Returns the entry identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the image source.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }
}

/// Ordered, immutable collection of corpus entries.
#[derive(Clone, Debug, Default)]
pub struct CorpusIndex {
    entries: Vec<CorpusEntry>,
}

impl CorpusIndex {
    /// Builds an index, rejecting empty or duplicate identifiers.
    pub fn new(entries: Vec<CorpusEntry>) -> IconMatchResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.id.is_empty() {
                return Err(IconMatchError::Manifest {
                    reason: "entry with empty id".to_string(),
                });
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(IconMatchError::Manifest {
                    reason: format!("duplicate id `{}`", entry.id),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Returns the entries in insertion order.
    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&CorpusEntry> {
        self.entries.get(index)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the corpus has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
