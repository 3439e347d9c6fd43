//! Color values and normalization.
//!
//! Every recolor entry point accepts a [`ColorValue`], which may be a CSS-like
//! hex string, an integer hex code or an already parsed [`Color`]. The engine
//! normalizes it once, before touching any material.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{AvatarError, Result};

/// Display-referred RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a packed `0xRRGGBB` value.
    ///
    /// Bits above the low 24 are ignored, so `0xf0f0f0f0` is `#f0f0f0`.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        let hex = hex & 0x00FF_FFFF;
        Self::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
        }
    }

    /// Packs the color back into `0xRRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Parses `#rrggbb`, `#rgb`, `0xrrggbb` or bare `rrggbb`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let invalid = || AvatarError::InvalidColor(input.to_string());

        match digits.len() {
            6 | 8 => {
                let hex = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                Ok(Self::from_hex(hex))
            }
            3 => {
                let hex = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                let expand = |nibble: u32| ((nibble << 4) | nibble) as u8;
                Ok(Self::from_rgb8(
                    expand((hex >> 8) & 0xF),
                    expand((hex >> 4) & 0xF),
                    expand(hex & 0xF),
                ))
            }
            _ => Err(invalid()),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = AvatarError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = AvatarError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Unnormalized color input, as handed over by UI code.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValue {
    Hex(u32),
    Css(String),
    Rgb(Color),
}

impl ColorValue {
    /// Resolves the input into the engine's internal [`Color`].
    pub fn normalize(&self) -> Result<Color> {
        match self {
            Self::Hex(hex) => Ok(Color::from_hex(*hex)),
            Self::Css(text) => Color::parse(text),
            Self::Rgb(color) => Ok(*color),
        }
    }
}

impl From<u32> for ColorValue {
    fn from(hex: u32) -> Self {
        Self::Hex(hex)
    }
}

impl From<&str> for ColorValue {
    fn from(text: &str) -> Self {
        Self::Css(text.to_string())
    }
}

impl From<String> for ColorValue {
    fn from(text: String) -> Self {
        Self::Css(text)
    }
}

impl From<Color> for ColorValue {
    fn from(color: Color) -> Self {
        Self::Rgb(color)
    }
}
