use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// A minimal scene node: hierarchy, transform and a name for lookups.
///
/// Meshes live in the scene's component map keyed by the node handle, so
/// nodes stay small and cheap to traverse.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    /// Set on skeleton joints; bones are registered by name at load time.
    pub is_bone: bool,
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            is_bone: false,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
