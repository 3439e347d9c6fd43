use std::sync::Arc;

use glam::Affine3A;

use crate::animation::clip::AnimationClip;
use crate::resources::geometry::Geometry;
use crate::scene::transform::Transform;

/// Mesh data carried by a part node. Materials are assigned when the part is
/// instantiated, so none is stored here.
#[derive(Debug, Clone)]
pub struct PartMesh {
    pub name: String,
    pub geometry: Arc<Geometry>,
}

/// A node of a loaded part; children are referenced by index.
#[derive(Debug, Clone, Default)]
pub struct PartNode {
    pub name: String,
    pub transform: Transform,
    pub children: Vec<usize>,
    pub mesh: Option<PartMesh>,
    /// Index into [`PartAsset::skeletons`].
    pub skin: Option<usize>,
    pub is_bone: bool,
}

impl PartNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct PartSkeleton {
    pub name: String,
    /// Indices into [`PartAsset::nodes`], one per joint.
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Vec<Affine3A>,
    pub root_joint: usize,
}

/// Decoded part file, independent of any scene.
///
/// Plain data and `Send`, so it can be produced on a loader task and handed to
/// the composer afterwards. [`Scene::instantiate`](crate::scene::Scene::instantiate)
/// turns it into scene nodes.
#[derive(Debug, Clone, Default)]
pub struct PartAsset {
    pub name: String,
    pub nodes: Vec<PartNode>,
    pub roots: Vec<usize>,
    pub skeletons: Vec<PartSkeleton>,
    pub clips: Vec<AnimationClip>,
}

impl PartAsset {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a node, optionally under `parent`, and returns its index.
    pub fn push_node(&mut self, node: PartNode, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.children.push(index),
            None => self.roots.push(index),
        }
        index
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh.is_some()).count()
    }

    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter(|n| n.is_bone).map(|n| n.name.as_str())
    }
}
