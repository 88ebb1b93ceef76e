//! JSON manifest loading (`manifest` feature).
//!
//! ```json
//! { "icons": [ { "id": "home", "path": "icons/home.svg" } ] }
//! ```
//!
//! Relative paths resolve against the manifest's directory.

use crate::corpus::{CorpusEntry, CorpusIndex, ImageSource};
use crate::trace::trace_event;
use crate::util::{IconMatchError, IconMatchResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct ManifestFile {
    icons: Vec<ManifestIcon>,
}

#[derive(Debug, Deserialize)]
struct ManifestIcon {
    id: String,
    #[serde(alias = "nodepath")]
    path: PathBuf,
}

impl CorpusIndex {
    /// Parses a manifest, resolving relative paths against `base_dir`.
    pub fn from_manifest_str(text: &str, base_dir: &Path) -> IconMatchResult<Self> {
        let manifest: ManifestFile =
            serde_json::from_str(text).map_err(|err| IconMatchError::Manifest {
                reason: err.to_string(),
            })?;
        let entries = manifest
            .icons
            .into_iter()
            .map(|icon| {
                let path = if icon.path.is_absolute() {
                    icon.path
                } else {
                    base_dir.join(icon.path)
                };
                CorpusEntry::new(icon.id, ImageSource::Path(path))
            })
            .collect();
        let index = Self::new(entries)?;
        trace_event!("manifest_loaded", entries = index.len());
        Ok(index)
    }

    /// Reads and parses a manifest file.
    pub fn load_manifest<P: AsRef<Path>>(path: P) -> IconMatchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| IconMatchError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_manifest_str(&text, base_dir)
    }
}
