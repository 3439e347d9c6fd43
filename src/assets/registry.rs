use std::sync::Arc;

use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::resources::texture::Texture;
use crate::scene::NodeHandle;

/// Where a registered part came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOrigin {
    /// Loaded from an asset file.
    Loaded { path: String },
    /// Built at runtime as an overlay for a category style.
    Synthesized { style: String },
}

/// A named, independently toggleable hierarchy in the scene arena.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub root: NodeHandle,
    pub uuid: Uuid,
    pub origin: PartOrigin,
}

impl Part {
    #[must_use]
    pub fn new(name: impl Into<String>, root: NodeHandle, origin: PartOrigin) -> Self {
        Self {
            name: name.into(),
            root,
            uuid: Uuid::new_v4(),
            origin,
        }
    }

    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        matches!(self.origin, PartOrigin::Synthesized { .. })
    }
}

/// Authoritative name → part / texture / bone maps.
///
/// Entries are never replaced: a name resolves to the first thing registered
/// under it.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    parts: FxHashMap<String, Part>,
    textures: FxHashMap<String, Arc<Texture>>,
    bones: FxHashMap<String, NodeHandle>,
}

impl AssetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `part`. Returns `false` (and keeps the existing entry) when
    /// the name is taken.
    pub fn insert_part(&mut self, part: Part) -> bool {
        if self.parts.contains_key(&part.name) {
            log::warn!("Part '{}' already registered, ignoring duplicate", part.name);
            return false;
        }
        self.parts.insert(part.name.clone(), part);
        true
    }

    #[must_use]
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    #[must_use]
    pub fn contains_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn insert_texture(&mut self, name: impl Into<String>, texture: Arc<Texture>) -> bool {
        let name = name.into();
        if self.textures.contains_key(&name) {
            log::warn!("Texture '{name}' already registered, ignoring duplicate");
            return false;
        }
        self.textures.insert(name, texture);
        true
    }

    #[must_use]
    pub fn texture(&self, name: &str) -> Option<&Arc<Texture>> {
        self.textures.get(name)
    }

    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Records a bone by name. The first bone seen under a name wins.
    pub fn register_bone(&mut self, name: &str, node: NodeHandle) {
        self.bones.entry(name.to_string()).or_insert(node);
    }

    #[must_use]
    pub fn bone(&self, name: &str) -> Option<NodeHandle> {
        self.bones.get(name).copied()
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }
}
