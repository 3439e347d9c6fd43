//! # Myth Avatar
//!
//! Composition core for a modular 3D character customizer: loads a rigged
//! body and accessory parts, keeps at most one style per exclusive category in
//! the scene, recolors parts, synthesizes overlay parts on demand and drives
//! clip animation together with scripted camera moves.
//!
//! Rendering, windowing and audio are left to the host; this crate owns the
//! scene graph, materials, skeletons and animation state they read.
//!
//! ```rust,ignore
//! use myth_avatar::prelude::*;
//!
//! let settings = SceneSettings::default();
//! let loader = AssetLoader::new(FileAssetReader::new("assets"));
//! let batch = pollster::block_on(loader.load_all(&settings.assets));
//!
//! let mut composer = Composer::new(settings, CategoryTable::default());
//! composer.ingest(batch);
//! composer.set_exclusive_style(CategoryId::Hair, "Wavy");
//! composer.recolor("#583c36", &["Wavy", "Eyebrows"]);
//! composer.advance(1.0 / 60.0);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod composer;
pub mod config;
pub mod errors;
pub mod resources;
pub mod scene;
pub mod utils;

pub use animation::{AnimationAction, AnimationClip, AnimationCoordinator, AnimationMixer, LoopMode};
pub use assets::{AssetLoader, AssetRegistry, FileAssetReader, MemoryAssetReader, Part, PartAsset};
pub use composer::Composer;
pub use config::{CategoryId, CategoryTable, SceneSettings, Theme};
pub use errors::{AvatarError, Result};
pub use resources::{Color, ColorValue, Geometry, Material, Mesh, Texture};
pub use scene::{Camera, Node, NodeHandle, Scene};
pub use utils::OrbitControls;

pub mod prelude {
    pub use crate::animation::{AnimationClip, BlendMode, LoopMode};
    pub use crate::app::{UiCommand, UiController, Viewport};
    pub use crate::assets::{
        AssetLoader, AssetManifest, AssetReader, FileAssetReader, LoadBatch, MemoryAssetReader,
    };
    pub use crate::composer::Composer;
    pub use crate::config::{
        CategoryId, CategoryTable, FilePreferences, MemoryPreferences, PreferenceStore,
        SceneSettings, Theme,
    };
    pub use crate::errors::{AvatarError, Result};
    pub use crate::resources::{Color, ColorValue};
}
