use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves a clip's tracks against the named nodes under `root`.
    ///
    /// Tracks whose node cannot be found are skipped, so a clip authored for a
    /// richer rig still plays on a reduced one.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        clip.tracks
            .iter()
            .enumerate()
            .filter_map(|(track_index, track)| {
                let node = scene.find_by_name(root, &track.meta.node_name);
                if node.is_none() {
                    log::debug!(
                        "Clip '{}': no node named '{}', track skipped",
                        clip.name,
                        track.meta.node_name
                    );
                }
                node.map(|node| PropertyBinding {
                    track_index,
                    node,
                    target: track.meta.target,
                })
            })
            .collect()
    }
}
