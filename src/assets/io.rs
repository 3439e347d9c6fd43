use std::future::Future;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::errors::{AvatarError, Result};

/// Asynchronous byte source for asset paths.
pub trait AssetReader: Send + Sync {
    fn read_bytes(&self, uri: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Reads assets from the local filesystem, relative to a root directory.
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    /// `path` may be a directory or a file inside the asset directory.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri.trim_start_matches('/'));
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AvatarError::AssetNotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory asset source keyed by path.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetReader {
    files: FxHashMap<String, Vec<u8>>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(uri.into(), bytes);
    }

    #[must_use]
    pub fn with(mut self, uri: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(uri, bytes);
        self
    }
}

impl AssetReader for MemoryAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        self.files
            .get(uri)
            .cloned()
            .ok_or_else(|| AvatarError::AssetNotFound(uri.to_string()))
    }
}

/// Logical name of an asset: its basename without extension.
///
/// Works for filesystem paths and URLs alike; query strings and fragments
/// are ignored.
#[must_use]
pub fn logical_name(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => &base[..dot],
    }
}
