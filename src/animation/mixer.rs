use std::sync::Arc;

use glam::Quat;
use rustc_hash::FxHashMap;

use crate::animation::action::{AnimationAction, BlendMode, SampledValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene, Transform};

/// Per-node blend accumulator for one frame.
#[derive(Debug, Clone, Copy)]
struct PoseAccumulator {
    transform: Transform,
    // Accumulated normal-blend weight for translation, rotation, scale
    weights: [f32; 3],
}

impl PoseAccumulator {
    fn from_rest(rest: Transform) -> Self {
        Self {
            transform: rest,
            weights: [0.0; 3],
        }
    }
}

const fn slot(target: TargetPath) -> usize {
    match target {
        TargetPath::Translation => 0,
        TargetPath::Rotation => 1,
        TargetPath::Scale => 2,
    }
}

/// Animation driver bound to one part hierarchy.
///
/// Each update starts from the rest pose captured at bind time, blends the
/// running normal actions by weight, and then layers the additive actions on
/// top of that result.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: Vec<AnimationAction>,
    lookup: FxHashMap<String, usize>,
    rest_pose: FxHashMap<NodeHandle, Transform>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: Vec::new(),
            lookup: FxHashMap::default(),
            rest_pose: FxHashMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Returns the action for `clip`, creating and binding it on first use.
    pub fn clip_action(&mut self, clip: Arc<AnimationClip>, scene: &Scene) -> &mut AnimationAction {
        let index = if let Some(&index) = self.lookup.get(&clip.name) {
            index
        } else {
            let mut action = AnimationAction::new(clip);
            action.bindings = Binder::bind(scene, self.root, action.clip());

            for binding in &action.bindings {
                if let Some(node) = scene.get_node(binding.node) {
                    self.rest_pose.entry(binding.node).or_insert(node.transform);
                }
            }

            let index = self.actions.len();
            self.lookup.insert(action.name().to_string(), index);
            self.actions.push(action);
            index
        };
        &mut self.actions[index]
    }

    #[must_use]
    pub fn action(&self, name: &str) -> Option<&AnimationAction> {
        self.lookup.get(name).map(|&i| &self.actions[i])
    }

    pub fn action_mut(&mut self, name: &str) -> Option<&mut AnimationAction> {
        self.lookup.get(name).map(|&i| &mut self.actions[i])
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> impl Iterator<Item = &mut AnimationAction> {
        self.actions.iter_mut()
    }

    pub fn stop_all_action(&mut self) {
        for action in &mut self.actions {
            action.stop();
        }
    }

    /// Advances every action by `dt` seconds and writes the blended pose.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in &mut self.actions {
            action.update(dt);
        }

        let mut pose: FxHashMap<NodeHandle, PoseAccumulator> = self
            .rest_pose
            .iter()
            .map(|(&node, &rest)| (node, PoseAccumulator::from_rest(rest)))
            .collect();

        // Normal layer
        for action in &mut self.actions {
            let weight = action.effective_weight();
            if action.blend_mode != BlendMode::Normal || weight <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let (node, target) = {
                    let b = &action.bindings[i];
                    (b.node, b.target)
                };
                let Some(value) = action.sample(i) else {
                    continue;
                };
                let Some(acc) = pose.get_mut(&node) else {
                    continue;
                };

                let s = slot(target);
                acc.weights[s] += weight;
                let ratio = weight / acc.weights[s];
                blend_normal(&mut acc.transform, target, value, ratio);
            }
        }

        // Under-weighted properties fall back towards the rest pose
        for (node, acc) in &mut pose {
            let Some(rest) = self.rest_pose.get(node) else {
                continue;
            };
            for target in [TargetPath::Translation, TargetPath::Rotation, TargetPath::Scale] {
                let w = acc.weights[slot(target)];
                if w > 0.0 && w < 1.0 {
                    mix_towards_rest(&mut acc.transform, rest, target, 1.0 - w);
                }
            }
        }

        // Additive layer
        for action in &mut self.actions {
            let weight = action.effective_weight();
            if action.blend_mode != BlendMode::Additive || weight <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let (node, target) = {
                    let b = &action.bindings[i];
                    (b.node, b.target)
                };
                let Some(value) = action.sample(i) else {
                    continue;
                };
                if let Some(acc) = pose.get_mut(&node) {
                    blend_additive(&mut acc.transform, target, value, weight);
                }
            }
        }

        for (node, acc) in pose {
            if let Some(n) = scene.get_node_mut(node) {
                n.transform = acc.transform;
            }
        }
    }
}

fn blend_normal(transform: &mut Transform, target: TargetPath, value: SampledValue, ratio: f32) {
    match (target, value) {
        (TargetPath::Translation, SampledValue::Vector3(v)) => {
            transform.position = transform.position.lerp(v, ratio);
        }
        (TargetPath::Scale, SampledValue::Vector3(v)) => {
            transform.scale = transform.scale.lerp(v, ratio);
        }
        (TargetPath::Rotation, SampledValue::Quaternion(q)) => {
            transform.rotation = transform.rotation.slerp(q, ratio).normalize();
        }
        _ => {}
    }
}

fn mix_towards_rest(transform: &mut Transform, rest: &Transform, target: TargetPath, amount: f32) {
    match target {
        TargetPath::Translation => {
            transform.position = transform.position.lerp(rest.position, amount);
        }
        TargetPath::Scale => {
            transform.scale = transform.scale.lerp(rest.scale, amount);
        }
        TargetPath::Rotation => {
            transform.rotation = transform.rotation.slerp(rest.rotation, amount).normalize();
        }
    }
}

fn blend_additive(transform: &mut Transform, target: TargetPath, value: SampledValue, weight: f32) {
    match (target, value) {
        (TargetPath::Translation, SampledValue::Vector3(delta)) => {
            transform.position += delta * weight;
        }
        (TargetPath::Scale, SampledValue::Vector3(delta)) => {
            transform.scale += delta * weight;
        }
        (TargetPath::Rotation, SampledValue::Quaternion(delta)) => {
            let offset = Quat::IDENTITY.slerp(delta, weight);
            transform.rotation = (transform.rotation * offset).normalize();
        }
        _ => {}
    }
}
