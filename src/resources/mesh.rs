use std::sync::Arc;

use bitflags::bitflags;

use crate::resources::geometry::Geometry;
use crate::resources::material::Material;
use crate::scene::skeleton::SkinBinding;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ShadowFlags: u8 {
        const CAST    = 1 << 0;
        const RECEIVE = 1 << 1;
    }
}

/// A drawable attached to a scene node.
///
/// Geometry is shared behind an `Arc`; the material is owned per mesh.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,

    pub geometry: Arc<Geometry>,
    pub material: Material,

    pub shadows: ShadowFlags,

    /// Present on skinned meshes.
    pub skin: Option<SkinBinding>,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>, geometry: Arc<Geometry>, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            shadows: ShadowFlags::empty(),
            skin: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        self.skin.is_some()
    }
}
