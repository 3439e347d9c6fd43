use std::sync::Arc;

use glam::{Affine3A, Mat4, Quat, Vec2, Vec3, Vec4};
use rustc_hash::FxHashSet;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::part::{PartAsset, PartMesh, PartNode, PartSkeleton};
use crate::errors::{AvatarError, Result};
use crate::resources::geometry::Geometry;
use crate::scene::transform::Transform;

/// Parses binary glTF (`.glb`) parts into [`PartAsset`]s.
///
/// Materials and images embedded in the file are ignored; every mesh gets a
/// fresh material when the part is instantiated.
pub struct GltfLoader;

impl GltfLoader {
    pub fn parse(name: &str, bytes: &[u8]) -> Result<PartAsset> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffers = Self::load_buffers(name, &gltf)?;
        let document = &gltf.document;

        let mut part = PartAsset::new(name);

        // Step 1: every glTF node maps 1:1 onto a part node
        let joint_nodes: FxHashSet<usize> = document
            .skins()
            .flat_map(|skin| skin.joints().map(|j| j.index()).collect::<Vec<_>>())
            .collect();

        for node in document.nodes() {
            let (t, r, s) = node.transform().decomposed();
            let mut part_node = PartNode::new(node_name(&node));
            part_node.transform =
                Transform::from_trs(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s));
            part_node.is_bone = joint_nodes.contains(&node.index());
            part_node.skin = node.skin().map(|s| s.index());
            part.nodes.push(part_node);
        }

        // Step 2: hierarchy
        for node in document.nodes() {
            let children: Vec<usize> = node.children().map(|c| c.index()).collect();
            part.nodes[node.index()].children = children;
        }
        if let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) {
            part.roots = scene.nodes().map(|n| n.index()).collect();
        }

        // Step 3: meshes. Multi-primitive meshes get one child node per primitive.
        for node in document.nodes() {
            let Some(mesh) = node.mesh() else {
                continue;
            };
            let base_name = node_name(&node);
            let primitives: Vec<_> = mesh.primitives().collect();

            match primitives.len() {
                0 => {}
                1 => {
                    let geometry = Self::load_primitive_geometry(&primitives[0], &buffers);
                    part.nodes[node.index()].mesh = Some(PartMesh {
                        name: base_name,
                        geometry: Arc::new(geometry),
                    });
                }
                _ => {
                    let skin = part.nodes[node.index()].skin;
                    for (i, primitive) in primitives.iter().enumerate() {
                        let geometry = Self::load_primitive_geometry(primitive, &buffers);
                        let mut sub = PartNode::new(format!("{base_name}_{i}"));
                        sub.skin = skin;
                        sub.mesh = Some(PartMesh {
                            name: base_name.clone(),
                            geometry: Arc::new(geometry),
                        });
                        part.push_node(sub, Some(node.index()));
                    }
                    part.nodes[node.index()].skin = None;
                }
            }
        }

        part.skeletons = Self::load_skins(document, &buffers);
        part.clips = Self::load_animations(document, &buffers);

        log::debug!(
            "Parsed part '{}': {} nodes, {} meshes, {} skins, {} clips",
            name,
            part.nodes.len(),
            part.mesh_count(),
            part.skeletons.len(),
            part.clips.len()
        );

        Ok(part)
    }

    fn load_buffers(name: &str, gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>> {
        let mut blob = gltf.blob.clone();
        let mut buffers = Vec::new();

        for buffer in gltf.document.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let data = blob.take().ok_or_else(|| AvatarError::UnsupportedAsset {
                        path: name.to_string(),
                        reason: "missing binary chunk".to_string(),
                    })?;
                    buffers.push(data);
                }
                gltf::buffer::Source::Uri(uri) => {
                    return Err(AvatarError::UnsupportedAsset {
                        path: name.to_string(),
                        reason: format!("external buffer '{uri}' (only self-contained .glb is supported)"),
                    });
                }
            }
        }

        Ok(buffers)
    }

    fn load_primitive_geometry(primitive: &gltf::Primitive, buffers: &[Vec<u8>]) -> Geometry {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .map(|iter| iter.map(Vec3::from_array).collect())
            .unwrap_or_default();

        let mut geometry = Geometry::new(positions);
        if geometry.vertex_count() == 0 {
            return geometry;
        }

        if let Some(iter) = reader.read_normals() {
            geometry.normals = iter.map(Vec3::from_array).collect();
        }
        if let Some(iter) = reader.read_tex_coords(0) {
            geometry.uvs = iter.into_f32().map(Vec2::from_array).collect();
        }
        if let Some(iter) = reader.read_joints(0) {
            geometry.joints = iter.into_u16().collect();
        }
        if let Some(iter) = reader.read_weights(0) {
            geometry.weights = iter.into_f32().map(Vec4::from_array).collect();
        }
        if let Some(iter) = reader.read_indices() {
            geometry.indices = Some(iter.into_u32().collect());
        }

        geometry
    }

    fn load_skins(document: &gltf::Document, buffers: &[Vec<u8>]) -> Vec<PartSkeleton> {
        document
            .skins()
            .map(|skin| {
                let joints: Vec<gltf::Node> = skin.joints().collect();

                let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                let inverse_bind_matrices: Vec<Affine3A> = match reader.read_inverse_bind_matrices() {
                    Some(iter) => iter
                        .map(|m| Affine3A::from_mat4(Mat4::from_cols_array_2d(&m)))
                        .collect(),
                    None => vec![Affine3A::IDENTITY; joints.len()],
                };

                PartSkeleton {
                    name: skin.name().unwrap_or("Skeleton").to_string(),
                    joints: joints.iter().map(gltf::Node::index).collect(),
                    inverse_bind_matrices,
                    root_joint: find_root_joint(&skin, &joints),
                }
            })
            .collect()
    }

    fn load_animations(document: &gltf::Document, buffers: &[Vec<u8>]) -> Vec<AnimationClip> {
        use gltf::animation::util::ReadOutputs;

        document
            .animations()
            .map(|anim| {
                let mut tracks = Vec::new();

                for channel in anim.channels() {
                    let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                    let target = channel.target();
                    let node_name = node_name(&target.node());

                    let Some(inputs) = reader.read_inputs() else {
                        continue;
                    };
                    let times: Vec<f32> = inputs.collect();
                    let Some(outputs) = reader.read_outputs() else {
                        continue;
                    };

                    let interpolation = match channel.sampler().interpolation() {
                        gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                        gltf::animation::Interpolation::Step => InterpolationMode::Step,
                        gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                    };

                    let track = match outputs {
                        ReadOutputs::Translations(iter) => Track::new(
                            node_name,
                            TargetPath::Translation,
                            TrackData::Vector3(KeyframeTrack::new(
                                times,
                                iter.map(Vec3::from_array).collect(),
                                interpolation,
                            )),
                        ),
                        ReadOutputs::Rotations(iter) => Track::new(
                            node_name,
                            TargetPath::Rotation,
                            TrackData::Quaternion(KeyframeTrack::new(
                                times,
                                iter.into_f32().map(Quat::from_array).collect(),
                                interpolation,
                            )),
                        ),
                        ReadOutputs::Scales(iter) => Track::new(
                            node_name,
                            TargetPath::Scale,
                            TrackData::Vector3(KeyframeTrack::new(
                                times,
                                iter.map(Vec3::from_array).collect(),
                                interpolation,
                            )),
                        ),
                        ReadOutputs::MorphTargetWeights(_) => {
                            log::debug!("Morph target track on '{node_name}' ignored");
                            continue;
                        }
                    };

                    tracks.push(track);
                }

                AnimationClip::new(anim.name().unwrap_or("anim"), tracks)
            })
            .collect()
    }
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

/// Index (within `joints`) of the joint that has no parent among the joints,
/// preferring the skin's declared skeleton root.
fn find_root_joint(skin: &gltf::Skin, joints: &[gltf::Node]) -> usize {
    if let Some(root) = skin.skeleton()
        && let Some(index) = joints.iter().position(|n| n.index() == root.index())
    {
        return index;
    }

    let joint_set: FxHashSet<usize> = joints.iter().map(gltf::Node::index).collect();
    let parented: FxHashSet<usize> = joints
        .iter()
        .flat_map(|n| n.children().map(|c| c.index()).collect::<Vec<_>>())
        .filter(|i| joint_set.contains(i))
        .collect();

    joints
        .iter()
        .position(|n| !parented.contains(&n.index()))
        .unwrap_or(0)
}
