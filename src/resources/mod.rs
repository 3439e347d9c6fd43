//! Core resource definitions.
//!
//! Plain CPU-side data describing what a part looks like:
//! - Color: normalized colors and raw color inputs
//! - Geometry: vertex data
//! - Material: surface parameters and render states
//! - Mesh: geometry + material + skinning attached to a node
//! - Texture: decoded image data

pub mod color;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod texture;

pub use color::{Color, ColorValue};
pub use geometry::{BoundingBox, Geometry};
pub use material::{BlendFactor, Blending, Material, MaterialKind, Side};
pub use mesh::{Mesh, ShadowFlags};
pub use texture::{ColorSpace, Texture};
