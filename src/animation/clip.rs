use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;
use crate::animation::values::Interpolatable;

#[derive(Debug, Clone)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    fn duration(&self) -> f32 {
        match self {
            Self::Vector3(t) => t.duration(),
            Self::Quaternion(t) => t.duration(),
        }
    }
}

/// A keyframe track plus the node property it drives.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

impl Track {
    #[must_use]
    pub fn new(node_name: impl Into<String>, target: TargetPath, data: TrackData) -> Self {
        Self {
            meta: TrackMeta {
                node_name: node_name.into(),
                target,
            },
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
    /// Set by [`AnimationClip::make_additive`].
    pub additive: bool,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.duration())
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
            additive: false,
        }
    }

    /// Converts the clip into offsets relative to its first keyframe.
    ///
    /// Played on top of a base pose, the result moves bones by the same amount
    /// the original clip moved them away from its starting pose.
    #[must_use]
    pub fn make_additive(mut self) -> Self {
        if self.additive {
            return self;
        }
        for track in &mut self.tracks {
            match &mut track.data {
                TrackData::Vector3(t) => make_track_additive(t),
                TrackData::Quaternion(t) => make_track_additive(t),
            }
        }
        self.additive = true;
        self
    }
}

fn make_track_additive<T: Interpolatable>(track: &mut KeyframeTrack<T>) {
    let Some(reference) = track.value_at(0) else {
        return;
    };
    track.map_values(|v| T::difference(v, reference));
}
