use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::animation::action::{BlendMode, LoopMode};
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::AnimationMixer;
use crate::scene::{NodeHandle, Scene};

/// Clip naming conventions. A clip matches a marker when its name contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConventions {
    /// Clips converted to additive form at bind time.
    pub additive_markers: Vec<String>,
    /// Clips looped from bind time on; the resting state of the part.
    pub base_markers: Vec<String>,
}

impl Default for AnimationConventions {
    fn default() -> Self {
        Self {
            additive_markers: vec!["LookUp".to_string()],
            base_markers: vec!["Idle".to_string(), "Blinking".to_string()],
        }
    }
}

impl AnimationConventions {
    #[must_use]
    pub fn is_additive(&self, clip_name: &str) -> bool {
        self.additive_markers.iter().any(|m| clip_name.contains(m.as_str()))
    }

    #[must_use]
    pub fn is_base(&self, clip_name: &str) -> bool {
        self.base_markers.iter().any(|m| clip_name.contains(m.as_str()))
    }
}

/// Mixer plus clip bookkeeping for one animated part.
pub struct AnimationBinding {
    pub mixer: AnimationMixer,
    additive: FxHashSet<String>,
    base: FxHashSet<String>,
}

impl AnimationBinding {
    #[must_use]
    pub fn is_additive(&self, clip_name: &str) -> bool {
        self.additive.contains(clip_name)
    }

    #[must_use]
    pub fn is_base(&self, clip_name: &str) -> bool {
        self.base.contains(clip_name)
    }

    #[must_use]
    pub fn is_running(&self, clip_name: &str) -> bool {
        self.mixer.action(clip_name).is_some_and(|a| a.is_running())
    }
}

/// Owns the animation bindings of every animated part and applies the
/// base/additive play rules.
#[derive(Default)]
pub struct AnimationCoordinator {
    conventions: AnimationConventions,
    bindings: FxHashMap<String, AnimationBinding>,
}

impl AnimationCoordinator {
    #[must_use]
    pub fn new(conventions: AnimationConventions) -> Self {
        Self {
            conventions,
            bindings: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn conventions(&self) -> &AnimationConventions {
        &self.conventions
    }

    /// Builds the binding for `part` from its clips.
    ///
    /// Additive-marked clips are converted; base clips start looping at once.
    /// A part with no clips gets no binding. Rebinding a part replaces it.
    pub fn bind_part(
        &mut self,
        part: &str,
        root: NodeHandle,
        clips: Vec<AnimationClip>,
        scene: &Scene,
    ) {
        if clips.is_empty() {
            return;
        }

        let mut mixer = AnimationMixer::new(root);
        let mut additive = FxHashSet::default();
        let mut base = FxHashSet::default();

        for clip in clips {
            let name = clip.name.clone();
            let clip = if self.conventions.is_additive(&name) {
                additive.insert(name.clone());
                clip.make_additive()
            } else {
                clip
            };

            let action = mixer.clip_action(Arc::new(clip), scene);
            if self.conventions.is_base(&name) {
                action.loop_mode = LoopMode::Repeat;
                action.blend_mode = BlendMode::Normal;
                action.play();
                base.insert(name);
            }
        }

        log::debug!(
            "Animation binding for '{}': {} clips ({} additive, {} base)",
            part,
            mixer.actions().len(),
            additive.len(),
            base.len()
        );

        if self
            .bindings
            .insert(
                part.to_string(),
                AnimationBinding {
                    mixer,
                    additive,
                    base,
                },
            )
            .is_some()
        {
            log::warn!("Animation binding for '{part}' replaced");
        }
    }

    #[must_use]
    pub fn binding(&self, part: &str) -> Option<&AnimationBinding> {
        self.bindings.get(part)
    }

    pub fn binding_mut(&mut self, part: &str) -> Option<&mut AnimationBinding> {
        self.bindings.get_mut(part)
    }

    #[must_use]
    pub fn has_binding(&self, part: &str) -> bool {
        self.bindings.contains_key(part)
    }

    /// Triggers `action_name` as a clamped one-shot on every target part that
    /// has a binding and a matching clip. Returns how many parts started it.
    ///
    /// Other additive actions on the same part are stopped first. Playing a
    /// normal one-shot also stops other normal one-shots, never base clips.
    /// A requested base clip restarts but keeps looping.
    pub fn play<S: AsRef<str>>(&mut self, targets: &[S], action_name: &str) -> usize {
        let mut started = 0;

        for target in targets {
            let part = target.as_ref();
            let Some(binding) = self.bindings.get_mut(part) else {
                log::debug!("play '{action_name}': '{part}' has no animation binding");
                continue;
            };
            if binding.mixer.action(action_name).is_none() {
                log::debug!("play '{action_name}': '{part}' has no such clip");
                continue;
            }

            let requested_additive = binding.additive.contains(action_name);
            for action in binding.mixer.actions_mut() {
                let name = action.name();
                if name == action_name || binding.base.contains(name) {
                    continue;
                }
                let is_additive = binding.additive.contains(name);
                if is_additive || !requested_additive {
                    action.stop();
                }
            }

            let requested_base = binding.base.contains(action_name);
            if let Some(action) = binding.mixer.action_mut(action_name) {
                if requested_base {
                    action.loop_mode = LoopMode::Repeat;
                    action.clamp_when_finished = false;
                } else {
                    action.loop_mode = LoopMode::Once;
                    action.clamp_when_finished = true;
                }
                action.weight = 1.0;
                action.reset();
                action.play();
                started += 1;
            }
        }

        started
    }

    /// Advances every binding by the frame delta.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        for binding in self.bindings.values_mut() {
            binding.mixer.update(dt, scene);
        }
    }
}
