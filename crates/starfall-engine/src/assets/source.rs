//! Where asset bytes come from: a directory on disk, or memory in tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::manifest::AssetManifest;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("failed to read asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed asset {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only access to text assets by relative path.
pub trait AssetSource {
    fn read_text(&self, path: &str) -> Result<String, AssetError>;

    /// Read and parse the manifest at `path`.
    fn manifest(&self, path: &str) -> Result<AssetManifest, AssetError> {
        let text = self.read_text(path)?;
        AssetManifest::from_json(&text).map_err(|source| AssetError::Json {
            path: path.to_string(),
            source,
        })
    }
}

/// Assets rooted at a directory.
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    fn read_text(&self, path: &str) -> Result<String, AssetError> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                AssetError::NotFound(path.to_string())
            } else {
                AssetError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}

/// In-memory assets keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, String>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }
}

impl AssetSource for MemoryAssets {
    fn read_text(&self, path: &str) -> Result<String, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_assets_report_missing_files() {
        let assets = MemoryAssets::new().with("a.txt", "hello");
        assert_eq!(assets.read_text("a.txt").unwrap(), "hello");
        assert!(matches!(assets.read_text("b.txt"), Err(AssetError::NotFound(p)) if p == "b.txt"));
    }

    #[test]
    fn dir_assets_report_missing_files() {
        let assets = DirAssets::new(std::env::temp_dir().join("starfall-no-such-dir"));
        assert!(matches!(assets.read_text("x.json"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn malformed_manifest_is_reported() {
        let assets = MemoryAssets::new().with("manifest.json", "{ nope");
        assert!(matches!(assets.manifest("manifest.json"), Err(AssetError::Json { .. })));
    }
}
