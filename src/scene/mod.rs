//! Scene graph.
//!
//! - Node: hierarchy + transform
//! - Transform: position, rotation, scale
//! - Scene: node arena, render-graph membership and components
//! - Camera: perspective camera
//! - Skeleton: bones and skin bindings

pub mod camera;
pub mod node;
pub mod scene;
pub mod skeleton;
pub mod transform;

pub use camera::Camera;
pub use node::Node;
pub use scene::Scene;
pub use skeleton::{BindMode, Skeleton, SkinBinding};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct SkeletonKey;
}
