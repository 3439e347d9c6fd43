use std::borrow::Cow;

use uuid::Uuid;

/// How texel values should be interpreted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Display-referred sRGB (color maps).
    Srgb,
    /// Raw data (masks, normal maps).
    #[default]
    Linear,
}

/// Decoded RGBA8 texture, kept on the CPU until the renderer picks it up.
#[derive(Debug, Clone)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: Cow<'static, str>,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,

    /// Whether the renderer should flip rows on upload.
    pub flip_y: bool,
    pub color_space: ColorSpace,
}

impl Texture {
    /// Creates a texture with loader defaults (`flip_y` on, linear data).
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            width,
            height,
            data,
            flip_y: true,
            color_space: ColorSpace::Linear,
        }
    }

    /// Configures the texture for use as a surface color map on glTF geometry:
    /// no vertical flip, sRGB color space.
    #[must_use]
    pub fn into_surface_map(mut self) -> Self {
        self.flip_y = false;
        self.color_space = ColorSpace::Srgb;
        self
    }

    #[inline]
    #[must_use]
    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
