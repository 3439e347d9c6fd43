use std::sync::Arc;

use crate::assets::registry::AssetRegistry;
use crate::config::category::OverlaySpec;
use crate::errors::{AvatarError, Result};
use crate::resources::material::Material;
use crate::resources::mesh::Mesh;
use crate::scene::skeleton::SkinBinding;
use crate::scene::{NodeHandle, Scene};

/// Builds the overlay hierarchy for `style` on top of the overlay's base part.
///
/// The first skinned mesh under the base part is cloned with the configured offset
/// and bound to the same skeleton with the same bind matrix, so the overlay
/// deforms with the body. The mask texture is used as both color map and
/// transparency mask; a missing mask is logged and the overlay is built
/// without it.
///
/// Returns the root of a detached group named after the style.
pub(crate) fn build_overlay(
    scene: &mut Scene,
    registry: &AssetRegistry,
    style: &str,
    spec: &OverlaySpec,
) -> Result<NodeHandle> {
    let failed = |reason: String| AvatarError::SynthesisFailed {
        style: style.to_string(),
        reason,
    };

    let base = registry
        .part(&spec.base_part)
        .ok_or_else(|| failed(format!("base part '{}' is not loaded", spec.base_part)))?;

    let (geometry, skin) = scene
        .meshes_in(base.root)
        .find_map(|(_, mesh)| mesh.skin.as_ref().map(|skin| (Arc::clone(&mesh.geometry), skin.clone())))
        .ok_or_else(|| failed(format!("no skinned mesh under '{}'", spec.base_part)))?;

    if scene.skeleton(skin.skeleton).is_none() {
        return Err(failed(format!("skeleton of '{}' is missing", spec.base_part)));
    }

    let texture_name = spec.mask_texture_name(style);
    let texture = registry.texture(&texture_name).cloned();
    if texture.is_none() {
        log::warn!("Overlay '{style}': mask texture '{texture_name}' not loaded");
    }

    let material = Material::new_standard(spec.color).with_alpha_mask(texture);
    let mut mesh = Mesh::new(style, Arc::new(geometry.translated(spec.offset)), material);
    mesh.skin = Some(SkinBinding::new(skin.skeleton, skin.bind_matrix));

    let group = scene.create_node_with_name(style);
    let mesh_node = scene.create_node_with_name(style);
    scene.attach(mesh_node, group);
    scene.set_mesh(mesh_node, mesh);

    Ok(group)
}
