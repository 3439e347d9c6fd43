use std::sync::Arc;

use uuid::Uuid;

use crate::resources::color::Color;
use crate::resources::texture::Texture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blending {
    #[default]
    Normal,
    Custom { src: BlendFactor, dst: BlendFactor },
}

impl Blending {
    /// Source-alpha over destination.
    pub const ALPHA_OVER: Blending = Blending::Custom {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    Standard,
    Phong { shininess: f32 },
}

/// Surface description of a mesh.
///
/// Every mesh owns its material, so recoloring one part can never leak into
/// another part that happened to share an authored material.
#[derive(Debug, Clone)]
pub struct Material {
    pub uuid: Uuid,
    pub kind: MaterialKind,

    pub color: Color,
    pub map: Option<Arc<Texture>>,
    pub alpha_map: Option<Arc<Texture>>,

    // Render states
    pub side: Side,
    pub transparent: bool,
    pub opacity: f32,
    pub blending: Blending,
    pub depth_write: bool,
}

impl Material {
    fn with_kind(kind: MaterialKind, color: Color) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind,
            color,
            map: None,
            alpha_map: None,
            side: Side::Front,
            transparent: false,
            opacity: 1.0,
            blending: Blending::Normal,
            depth_write: true,
        }
    }

    #[must_use]
    pub fn new_standard(color: Color) -> Self {
        Self::with_kind(MaterialKind::Standard, color)
    }

    #[must_use]
    pub fn new_phong(color: Color, shininess: f32) -> Self {
        Self::with_kind(MaterialKind::Phong { shininess }, color)
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Uses `texture` as both color map and transparency mask, blended
    /// source-alpha over destination without writing depth.
    #[must_use]
    pub fn with_alpha_mask(mut self, texture: Option<Arc<Texture>>) -> Self {
        self.map.clone_from(&texture);
        self.alpha_map = texture;
        self.transparent = true;
        self.opacity = 1.0;
        self.blending = Blending::ALPHA_OVER;
        self.depth_write = false;
        self
    }
}
