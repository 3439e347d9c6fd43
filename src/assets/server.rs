use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::{Deserialize, Serialize};

use crate::assets::io::{AssetReader, logical_name};
use crate::assets::loaders::{GltfLoader, decode_texture};
use crate::assets::part::PartAsset;
use crate::errors::{AvatarError, Result};
use crate::resources::texture::Texture;

/// Paths requested by one load pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub parts: Vec<String>,
    pub textures: Vec<String>,
}

impl AssetManifest {
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len() + self.textures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.textures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Part,
    Texture,
}

#[derive(Debug)]
pub enum LoadedAsset {
    Part(PartAsset),
    Texture(Texture),
}

/// Result of one requested path.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        path: String,
        name: String,
        asset: LoadedAsset,
    },
    Failed {
        path: String,
        error: AvatarError,
    },
}

impl LoadOutcome {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Loaded { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Reported once per settled load, in completion order.
#[derive(Debug, Clone, Copy)]
pub struct LoadProgress<'a> {
    pub settled: usize,
    pub total: usize,
    pub path: &'a str,
    pub ok: bool,
}

impl LoadProgress<'_> {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.settled == self.total
    }
}

/// Every outcome of a load pass, in completion order.
#[derive(Debug, Default)]
pub struct LoadBatch {
    pub outcomes: Vec<LoadOutcome>,
}

impl LoadBatch {
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_loaded()).count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.loaded_count()
    }
}

/// Fetches and decodes parts and textures through an [`AssetReader`].
pub struct AssetLoader<R: AssetReader> {
    reader: R,
}

impl<R: AssetReader> AssetLoader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    #[must_use]
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Loads one binary glTF part, named after the path's basename.
    pub async fn load_part(&self, path: &str) -> Result<PartAsset> {
        let bytes = self.reader.read_bytes(path).await?;
        GltfLoader::parse(logical_name(path), &bytes)
    }

    /// Loads one image as an unflipped sRGB surface texture.
    pub async fn load_texture(&self, path: &str) -> Result<Texture> {
        let bytes = self.reader.read_bytes(path).await?;
        decode_texture(logical_name(path), &bytes)
    }

    async fn load_entry(&self, kind: AssetKind, path: &str) -> LoadOutcome {
        let result = match kind {
            AssetKind::Part => self.load_part(path).await.map(LoadedAsset::Part),
            AssetKind::Texture => self.load_texture(path).await.map(LoadedAsset::Texture),
        };

        match result {
            Ok(asset) => LoadOutcome::Loaded {
                path: path.to_string(),
                name: logical_name(path).to_string(),
                asset,
            },
            Err(error) => LoadOutcome::Failed {
                path: path.to_string(),
                error,
            },
        }
    }

    /// Requests every path of `manifest` concurrently and waits until all of
    /// them have settled. A failed path never aborts its siblings.
    pub async fn load_all(&self, manifest: &AssetManifest) -> LoadBatch {
        self.load_all_with_progress(manifest, |_| {}).await
    }

    /// Like [`load_all`](Self::load_all), calling `on_progress` after each
    /// path settles.
    pub async fn load_all_with_progress(
        &self,
        manifest: &AssetManifest,
        mut on_progress: impl FnMut(LoadProgress<'_>),
    ) -> LoadBatch {
        let total = manifest.len();
        log::info!(
            "Loading {} parts and {} textures",
            manifest.parts.len(),
            manifest.textures.len()
        );

        let mut pending = FuturesUnordered::new();
        for path in &manifest.textures {
            pending.push(self.load_entry(AssetKind::Texture, path));
        }
        for path in &manifest.parts {
            pending.push(self.load_entry(AssetKind::Part, path));
        }

        let mut batch = LoadBatch {
            outcomes: Vec::with_capacity(total),
        };

        while let Some(outcome) = pending.next().await {
            match &outcome {
                LoadOutcome::Loaded { path, name, .. } => {
                    log::debug!("Loaded '{path}' as '{name}'");
                }
                LoadOutcome::Failed { path, error } => {
                    log::error!("Error loading '{path}': {error}");
                }
            }

            on_progress(LoadProgress {
                settled: batch.outcomes.len() + 1,
                total,
                path: outcome.path(),
                ok: outcome.is_loaded(),
            });
            batch.outcomes.push(outcome);
        }

        log::info!(
            "Loading finished: {} loaded, {} failed",
            batch.loaded_count(),
            batch.failed_count()
        );
        batch
    }
}
