//! Static configuration: the category table, scene settings and the
//! preference store.

pub mod category;
pub mod preferences;
pub mod settings;

pub use category::{Category, CategoryId, CategoryTable, ExclusiveSet, OverlaySpec, RecolorSet};
pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore, THEME_KEY, Theme};
pub use settings::{
    AmbientLightSettings, CameraSettings, DirectionalLightSettings, FloorSettings, LightSettings,
    SceneSettings,
};
