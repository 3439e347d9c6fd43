use std::sync::Arc;

use glam::Affine3A;
use slotmap::{SlotMap, SparseSecondaryMap};

use crate::assets::part::{PartAsset, PartMesh};
use crate::resources::color::Color;
use crate::resources::material::Material;
use crate::resources::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::skeleton::{Skeleton, SkinBinding};
use crate::scene::{NodeHandle, SkeletonKey};

/// Scene graph container.
///
/// All nodes ever created live in one arena. A hierarchy is *rendered* only
/// while its root handle is listed in `root_nodes`; detached hierarchies stay
/// resident so parts can be toggled without reloading. Membership is therefore
/// a property of the graph itself and cannot drift from a separate flag.
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,

    // ==== Components ====
    meshes: SparseSecondaryMap<NodeHandle, Mesh>,
    skins: SlotMap<SkeletonKey, Skeleton>,

    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SparseSecondaryMap::new(),
            skins: SlotMap::with_key(),
            background: Color::WHITE,
        }
    }

    // ========================================================================
    // Nodes & hierarchy
    // ========================================================================

    /// Inserts a node into the arena without adding it to the render graph.
    pub fn create_node(&mut self, node: Node) -> NodeHandle {
        self.nodes.insert(node)
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.nodes.insert(Node::new(name))
    }

    /// Parents `child` under `parent`, detaching it from any previous parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("attach: unknown node handle");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent
            && let Some(n) = self.nodes.get_mut(p)
        {
            n.children.retain(|&x| x != child);
        }
        // A parented node is never a render root
        self.root_nodes.retain(|&x| x != child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Render graph membership
    // ========================================================================

    /// Adds a detached hierarchy to the render graph.
    ///
    /// Returns `false` when the handle is unknown, parented, or already present.
    pub fn add(&mut self, root: NodeHandle) -> bool {
        let Some(node) = self.nodes.get(root) else {
            return false;
        };
        if node.parent.is_some() || self.root_nodes.contains(&root) {
            return false;
        }
        self.root_nodes.push(root);
        true
    }

    /// Removes a hierarchy from the render graph. It stays in the arena.
    pub fn remove(&mut self, root: NodeHandle) -> bool {
        let before = self.root_nodes.len();
        self.root_nodes.retain(|&x| x != root);
        before != self.root_nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, root: NodeHandle) -> bool {
        self.root_nodes.contains(&root)
    }

    #[inline]
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn set_mesh(&mut self, handle: NodeHandle, mesh: Mesh) {
        if self.nodes.contains_key(handle) {
            self.meshes.insert(handle, mesh);
        }
    }

    #[must_use]
    pub fn mesh(&self, handle: NodeHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }

    pub fn mesh_mut(&mut self, handle: NodeHandle) -> Option<&mut Mesh> {
        self.meshes.get_mut(handle)
    }

    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> SkeletonKey {
        self.skins.insert(skeleton)
    }

    #[must_use]
    pub fn skeleton(&self, key: SkeletonKey) -> Option<&Skeleton> {
        self.skins.get(key)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Pre-order traversal of the subtree rooted at `root` (root included).
    #[must_use]
    pub fn traverse(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            // Reverse so children come out in declaration order
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Meshes in the subtree rooted at `root`, in traversal order.
    pub fn meshes_in(&self, root: NodeHandle) -> impl Iterator<Item = (NodeHandle, &Mesh)> {
        self.traverse(root)
            .into_iter()
            .filter_map(move |h| self.meshes.get(h).map(|m| (h, m)))
    }

    /// Applies `f` to every mesh in the subtree rooted at `root`.
    pub fn for_each_mesh_mut(&mut self, root: NodeHandle, mut f: impl FnMut(&mut Mesh)) {
        for handle in self.traverse(root) {
            if let Some(mesh) = self.meshes.get_mut(handle) {
                f(mesh);
            }
        }
    }

    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.traverse(root)
            .into_iter()
            .find(|&h| self.nodes.get(h).is_some_and(|n| n.name == name))
    }

    /// World matrix computed by walking up the parent chain.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let mut node = self.nodes.get(handle)?;
        let mut world = node.transform.local_matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            world = node.transform.local_matrix() * world;
        }
        Some(world)
    }

    // ========================================================================
    // Instantiation
    // ========================================================================

    /// Creates nodes, skeletons and meshes for `asset` under a new group node
    /// named after the part. The group is left out of the render graph.
    ///
    /// `make_material` supplies the material of every mesh.
    pub fn instantiate(
        &mut self,
        asset: &PartAsset,
        mut make_material: impl FnMut(&PartMesh) -> Material,
    ) -> NodeHandle {
        let root = self.create_node_with_name(&asset.name);

        // Step 1: nodes
        let mapping: Vec<NodeHandle> = asset
            .nodes
            .iter()
            .map(|n| {
                let mut node = Node::new(n.name.clone()).with_transform(n.transform);
                node.is_bone = n.is_bone;
                self.create_node(node)
            })
            .collect();

        // Step 2: hierarchy
        for (index, node) in asset.nodes.iter().enumerate() {
            for &child in &node.children {
                if let Some(&child_handle) = mapping.get(child) {
                    self.attach(child_handle, mapping[index]);
                }
            }
        }
        for &r in &asset.roots {
            if let Some(&handle) = mapping.get(r) {
                self.attach(handle, root);
            }
        }

        // Step 3: skeletons, now that every joint exists
        let skeleton_keys: Vec<SkeletonKey> = asset
            .skeletons
            .iter()
            .map(|s| {
                let bones = s.joints.iter().filter_map(|&j| mapping.get(j).copied()).collect();
                self.add_skeleton(Skeleton::new(
                    &s.name,
                    bones,
                    s.inverse_bind_matrices.clone(),
                    s.root_joint,
                ))
            })
            .collect();

        // Step 4: meshes, bound with their world matrix at bind time
        for (index, node) in asset.nodes.iter().enumerate() {
            let Some(part_mesh) = &node.mesh else {
                continue;
            };
            let handle = mapping[index];
            let mut mesh = Mesh::new(
                part_mesh.name.clone(),
                Arc::clone(&part_mesh.geometry),
                make_material(part_mesh),
            );
            if let Some(&key) = node.skin.and_then(|s| skeleton_keys.get(s)) {
                let bind_matrix = self.world_matrix(handle).unwrap_or(Affine3A::IDENTITY);
                mesh.skin = Some(SkinBinding::new(key, bind_matrix));
            }
            self.set_mesh(handle, mesh);
        }

        root
    }
}
