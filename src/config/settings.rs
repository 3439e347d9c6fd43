use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::coordinator::AnimationConventions;
use crate::assets::server::AssetManifest;
use crate::config::preferences::Theme;
use crate::errors::Result;
use crate::resources::color::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Resting pose.
    pub position: Vec3,
    /// Pose reached by the look-up gesture.
    pub look_up_position: Vec3,
    /// Orbit target, re-asserted on every scripted move.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_pan: bool,
    /// Seconds.
    pub move_duration: f32,
    pub look_up_action: String,
    pub look_back_action: String,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 5.0),
            look_up_position: Vec3::new(0.0, 2.2, 3.0),
            target: Vec3::new(0.0, 0.75, 0.0),
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
            min_distance: 3.0,
            max_distance: 10.0,
            enable_damping: true,
            damping_factor: 0.05,
            enable_pan: false,
            move_duration: 0.5,
            look_up_action: "LookUp".to_string(),
            look_back_action: "LookBack".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightSettings {
    pub color: Color,
    pub position: Vec3,
    pub intensity: f32,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
    pub shadow_normal_bias: f32,
}

impl Default for DirectionalLightSettings {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            position: Vec3::new(50.0, 50.0, 50.0),
            intensity: 1.0,
            cast_shadow: true,
            shadow_map_size: 1024,
            shadow_normal_bias: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightSettings {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLightSettings {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0x40_4040),
            intensity: 50.0,
        }
    }
}

/// Light description handed to the external renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub directional: DirectionalLightSettings,
    pub ambient: AmbientLightSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorSettings {
    pub radius: f32,
    pub segments: u32,
    pub shininess: f32,
    pub y_offset: f32,
}

impl Default for FloorSettings {
    fn default() -> Self {
        Self {
            radius: 2500.0,
            segments: 64,
            shininess: 0.0,
            y_offset: -0.01,
        }
    }
}

/// Everything the composer needs besides the category table.
///
/// Every field has a default, so a settings file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub background: Color,
    /// Fresh material color given to every loaded mesh.
    pub base_color: Color,
    pub camera: CameraSettings,
    pub lights: LightSettings,
    pub floor: FloorSettings,
    pub default_theme: Theme,
    /// Parts shown once loading has finished.
    pub default_parts: Vec<String>,
    /// Parts receiving the category-switch gestures.
    pub full_body: Vec<String>,
    pub assets: AssetManifest,
    pub animation: AnimationConventions,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0xf0_f0f0),
            // Legacy value carried an alpha byte; it is masked to 24 bits
            base_color: Color::from_hex(0xf0f0_f0f0),
            camera: CameraSettings::default(),
            lights: LightSettings::default(),
            floor: FloorSettings::default(),
            default_theme: Theme::default(),
            default_parts: [
                "Body",
                "Left Iris",
                "Left Pupil",
                "Right Iris",
                "Right Pupil",
                "Eyebrows",
                "Nose Triangle",
            ]
            .map(String::from)
            .to_vec(),
            full_body: ["Body", "Eyebrows", "Left Iris", "Left Pupil", "Right Iris", "Right Pupil"]
                .map(String::from)
                .to_vec(),
            assets: AssetManifest::default(),
            animation: AnimationConventions::default(),
        }
    }
}

impl SceneSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        log::info!("Loaded scene settings from {}", path.display());
        Ok(settings)
    }
}
