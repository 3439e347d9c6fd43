use glam::{Affine3A, Mat4};
use uuid::Uuid;

use crate::scene::{NodeHandle, Scene, SkeletonKey};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindMode {
    /// Bones follow the mesh node (character skinning).
    Attached,
    /// Bones are evaluated against the snapshot taken at bind time.
    Detached,
}

/// Association of a skinned mesh with a skeleton.
///
/// Several meshes may point at the same skeleton; a synthesized overlay reuses
/// the body's skeleton and bind matrix so both deform together.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinBinding {
    pub skeleton: SkeletonKey,
    pub bind_mode: BindMode,
    pub bind_matrix: Affine3A,
    pub bind_matrix_inv: Affine3A,
}

impl SkinBinding {
    #[must_use]
    pub fn new(skeleton: SkeletonKey, bind_matrix: Affine3A) -> Self {
        Self {
            skeleton,
            bind_mode: BindMode::Attached,
            bind_matrix,
            bind_matrix_inv: bind_matrix.inverse(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub uuid: Uuid,
    pub name: String,

    // bones[i] corresponds to joints[i] in the vertex data
    pub bones: Vec<NodeHandle>,
    pub(crate) inverse_bind_matrices: Vec<Affine3A>,
    pub(crate) root_bone_index: usize,
}

impl Skeleton {
    #[must_use]
    pub fn new(
        name: &str,
        bones: Vec<NodeHandle>,
        inverse_bind_matrices: Vec<Affine3A>,
        root_bone_index: usize,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            bones,
            inverse_bind_matrices,
            root_bone_index,
        }
    }

    #[inline]
    #[must_use]
    pub fn root_bone(&self) -> Option<NodeHandle> {
        self.bones.get(self.root_bone_index).copied()
    }

    #[must_use]
    pub fn inverse_bind_matrices(&self) -> &[Affine3A] {
        &self.inverse_bind_matrices
    }

    /// Final joint matrices for the current pose.
    ///
    /// `mesh_world_inv` is the inverse world matrix of the node carrying the
    /// skinned mesh; it brings bone transforms back into mesh space.
    #[must_use]
    pub fn compute_joint_matrices(&self, scene: &Scene, mesh_world_inv: Affine3A) -> Vec<Mat4> {
        self.bones
            .iter()
            .zip(&self.inverse_bind_matrices)
            .map(|(&bone, ibm)| {
                let bone_world = scene.world_matrix(bone).unwrap_or(Affine3A::IDENTITY);
                Mat4::from(mesh_world_inv * bone_world * *ibm)
            })
            .collect()
    }
}
