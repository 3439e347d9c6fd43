//! Shared fixtures: hand-built parts, clips and a composer wired to the
//! built-in category table.

#![allow(dead_code)]

use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3, Vec4};

use myth_avatar::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData,
};
use myth_avatar::assets::{PartAsset, PartMesh, PartNode, PartSkeleton};
use myth_avatar::composer::Composer;
use myth_avatar::config::{CategoryTable, SceneSettings};
use myth_avatar::resources::{Geometry, Texture};
use myth_avatar::scene::Transform;

/// Rest position of the head bone, relative to the hips.
pub const HEAD_REST: Vec3 = Vec3::new(0.0, 0.5, 0.0);

/// Head pitch reached at the end of the look-up clip.
pub fn look_up_pitch() -> Quat {
    Quat::from_rotation_x(-0.4)
}

pub fn skinned_triangle() -> Geometry {
    let mut geometry = Geometry::new(vec![
        Vec3::new(-0.1, 1.5, 0.1),
        Vec3::new(0.1, 1.5, 0.1),
        Vec3::new(0.0, 1.7, 0.1),
    ]);
    geometry.normals = vec![Vec3::Z; 3];
    geometry.joints = vec![[0, 1, 0, 0]; 3];
    geometry.weights = vec![Vec4::new(0.5, 0.5, 0.0, 0.0); 3];
    geometry
}

pub fn triangle() -> Geometry {
    Geometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
}

// ============================================================================
// Clips
// ============================================================================

/// Looping head bob on the translation channel.
pub fn idle_clip() -> AnimationClip {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![HEAD_REST, HEAD_REST + Vec3::new(0.0, 0.05, 0.0), HEAD_REST],
        InterpolationMode::Linear,
    );
    AnimationClip::new(
        "Idle",
        vec![Track::new("Head", TargetPath::Translation, TrackData::Vector3(track))],
    )
}

pub fn head_rotation_clip(name: &str, from: Quat, to: Quat) -> AnimationClip {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![from, to], InterpolationMode::Linear);
    AnimationClip::new(
        name,
        vec![Track::new("Head", TargetPath::Rotation, TrackData::Quaternion(track))],
    )
}

pub fn look_up_clip() -> AnimationClip {
    head_rotation_clip("LookUp", Quat::IDENTITY, look_up_pitch())
}

pub fn look_back_clip() -> AnimationClip {
    head_rotation_clip("LookBack", look_up_pitch(), Quat::IDENTITY)
}

// ============================================================================
// Parts
// ============================================================================

/// Rigged body: `Armature > Hips > Head` plus one skinned mesh bound to both
/// bones, with idle, look-up and look-back clips.
pub fn body_asset() -> PartAsset {
    let mut asset = PartAsset::new("Body");
    let armature = asset.push_node(PartNode::new("Armature"), None);

    let mut hips = PartNode::new("Hips");
    hips.is_bone = true;
    hips.transform = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));
    let hips = asset.push_node(hips, Some(armature));

    let mut head = PartNode::new("Head");
    head.is_bone = true;
    head.transform = Transform::from_position(HEAD_REST);
    let head = asset.push_node(head, Some(hips));

    let mut skin = PartNode::new("BodyMesh");
    skin.mesh = Some(PartMesh {
        name: "Body".to_string(),
        geometry: Arc::new(skinned_triangle()),
    });
    skin.skin = Some(0);
    asset.push_node(skin, Some(armature));

    asset.skeletons.push(PartSkeleton {
        name: "Armature".to_string(),
        joints: vec![hips, head],
        inverse_bind_matrices: vec![Affine3A::IDENTITY; 2],
        root_joint: 0,
    });
    asset.clips = vec![idle_clip(), look_up_clip(), look_back_clip()];
    asset
}

/// Single unskinned mesh named after the part.
pub fn mesh_part(name: &str) -> PartAsset {
    let mut asset = PartAsset::new(name);
    let mut node = PartNode::new(name);
    node.mesh = Some(PartMesh {
        name: name.to_string(),
        geometry: Arc::new(triangle()),
    });
    asset.push_node(node, None);
    asset
}

pub fn mask_texture(name: &str) -> Texture {
    Texture::new(name.to_string(), 1, 1, vec![255, 255, 255, 255])
}

// ============================================================================
// Composer
// ============================================================================

pub fn empty_composer() -> Composer {
    Composer::new(SceneSettings::default(), CategoryTable::default())
}

/// Composer with the named parts ingested but none of them in the scene.
/// `"Body"` gets the rigged fixture, everything else a plain mesh.
pub fn composer_with(parts: &[&str]) -> Composer {
    let mut composer = empty_composer();
    for &name in parts {
        let asset = if name == "Body" { body_asset() } else { mesh_part(name) };
        assert!(composer.ingest_part(asset, &format!("models/{name}.glb")));
    }
    composer
}

// ============================================================================
// Binary glTF
// ============================================================================

/// Packs a JSON document and a binary chunk into a GLB container.
pub fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x004E_4942u32.to_le_bytes());
    out.extend_from_slice(&bin);
    out
}

/// A GLB holding one node `node_name` with a single-triangle mesh.
pub fn triangle_glb(node_name: &str) -> Vec<u8> {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let bin: Vec<u8> = positions.iter().flat_map(|v| v.to_le_bytes()).collect();

    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "name": "{node_name}", "mesh": 0 }}],
  "meshes": [{{ "name": "{node_name}", "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }}],
  "buffers": [{{ "byteLength": 36 }}],
  "bufferViews": [{{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }}],
  "accessors": [{{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
  }}]
}}"#
    );
    glb(&json, &bin)
}

/// A 2x2 RGBA PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 128]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}
