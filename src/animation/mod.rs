//! Clip-based skeletal animation.
//!
//! - [`KeyframeTrack`]: sampled keyframes with cursor caching
//! - [`AnimationClip`]: named set of tracks, optionally additive
//! - [`AnimationAction`]: playback state of a clip
//! - [`AnimationMixer`]: rest pose + normal blend + additive layer per part
//! - [`AnimationCoordinator`]: per-part bindings and the play rules

mod values;
pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod coordinator;
pub mod mixer;
pub mod tracks;

pub use action::{AnimationAction, BlendMode, LoopMode};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use coordinator::{AnimationBinding, AnimationConventions, AnimationCoordinator};
pub use mixer::AnimationMixer;
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
