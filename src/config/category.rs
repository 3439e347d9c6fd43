use std::fmt;

use glam::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{AvatarError, Result};
use crate::resources::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    Skin,
    Eyes,
    Hair,
    Nose,
    Mouth,
    Top,
    Bottom,
}

impl CategoryId {
    pub const ALL: [CategoryId; 7] = [
        CategoryId::Skin,
        CategoryId::Eyes,
        CategoryId::Hair,
        CategoryId::Nose,
        CategoryId::Mouth,
        CategoryId::Top,
        CategoryId::Bottom,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skin => "skin",
            Self::Eyes => "eyes",
            Self::Hair => "hair",
            Self::Nose => "nose",
            Self::Mouth => "mouth",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to build an overlay part for a style that has no authored asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySpec {
    /// Part whose first skinned mesh is cloned.
    pub base_part: String,
    /// Applied to every cloned vertex, to keep the overlay off the base surface.
    pub offset: Vec3,
    pub color: Color,
    /// Appended to the style name (spaces replaced by `_`) to find the mask.
    pub texture_suffix: String,
}

impl Default for OverlaySpec {
    fn default() -> Self {
        Self {
            base_part: "Body".to_string(),
            offset: Vec3::new(0.0, 0.0, 0.01),
            color: Color::from_hex(0x72_5147),
            texture_suffix: "_mask".to_string(),
        }
    }
}

impl OverlaySpec {
    /// `"Mouth 1"` → `"Mouth_1_mask"`.
    #[must_use]
    pub fn mask_texture_name(&self, style: &str) -> String {
        format!("{}{}", style.replace(' ', "_"), self.texture_suffix)
    }
}

/// Parts of which at most one is in the scene at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusiveSet {
    pub members: Vec<String>,
    /// Present when missing members are synthesized on first selection.
    pub synthesis: Option<OverlaySpec>,
    /// Members (and their meshes) render both faces.
    pub double_sided: bool,
}

/// Parts recolored together from one swatch palette.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecolorSet {
    pub targets: Vec<String>,
    pub palette: Vec<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(default)]
    pub exclusive: Option<ExclusiveSet>,
    #[serde(default)]
    pub recolor: Option<RecolorSet>,
}

impl Category {
    #[must_use]
    pub fn new(id: CategoryId) -> Self {
        Self {
            id,
            exclusive: None,
            recolor: None,
        }
    }

    #[must_use]
    pub fn with_exclusive(mut self, members: &[&str]) -> Self {
        self.exclusive = Some(ExclusiveSet {
            members: members.iter().map(|s| (*s).to_string()).collect(),
            ..ExclusiveSet::default()
        });
        self
    }

    #[must_use]
    pub fn double_sided(mut self) -> Self {
        if let Some(set) = &mut self.exclusive {
            set.double_sided = true;
        }
        self
    }

    #[must_use]
    pub fn synthesized(mut self, spec: OverlaySpec) -> Self {
        if let Some(set) = &mut self.exclusive {
            set.synthesis = Some(spec);
        }
        self
    }

    #[must_use]
    pub fn with_recolor(mut self, targets: &[&str], palette: &[&str]) -> Self {
        self.recolor = Some(RecolorSet {
            targets: targets.iter().map(|s| (*s).to_string()).collect(),
            palette: palette.iter().filter_map(|c| Color::parse(c).ok()).collect(),
        });
        self
    }

    #[must_use]
    pub fn members(&self) -> &[String] {
        self.exclusive.as_ref().map_or(&[], |s| s.members.as_slice())
    }

    #[must_use]
    pub fn is_member(&self, name: &str) -> bool {
        self.members().iter().any(|m| m == name)
    }

    #[must_use]
    pub fn recolor_targets(&self) -> &[String] {
        self.recolor.as_ref().map_or(&[], |s| s.targets.as_slice())
    }
}

pub mod palettes {
    pub const SKIN: &[&str] = &["#f0f0f0", "#f8d6bf", "#e7b292", "#a45f41", "#6e442a", "#2c1c11"];
    pub const EYES: &[&str] = &["#686867", "#9a7356", "#59b3ae", "#91a57b", "#577fd8", "#9a95a9"];
    pub const HAIR: &[&str] = &[
        "#edeb2f", "#583c36", "#814043", "#bf502f", "#f1ce34", "#92908f", "#cfc9b7", "#3087d0",
        "#9dbcca", "#34984f", "#57cbb5", "#f54e4c", "#ff874c", "#dd98cf", "#f7aebd",
    ];
}

/// Validated, read-only category configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategoryTable {
    categories: Vec<Category>,
    exclusive_of: FxHashMap<String, CategoryId>,
}

impl CategoryTable {
    /// Builds the table. A part may belong to at most one exclusivity set and
    /// each id may appear once.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        let mut exclusive_of = FxHashMap::default();

        for (i, category) in categories.iter().enumerate() {
            if categories[..i].iter().any(|c| c.id == category.id) {
                return Err(AvatarError::InvalidConfig(format!(
                    "category '{}' declared twice",
                    category.id
                )));
            }
            for member in category.members() {
                if let Some(other) = exclusive_of.insert(member.clone(), category.id) {
                    return Err(AvatarError::InvalidConfig(format!(
                        "part '{member}' is exclusive in both '{other}' and '{}'",
                        category.id
                    )));
                }
            }
        }

        Ok(Self {
            categories,
            exclusive_of,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// The exclusivity category `part` belongs to, if any.
    #[must_use]
    pub fn exclusive_category_of(&self, part: &str) -> Option<&Category> {
        self.exclusive_of.get(part).and_then(|&id| self.get(id))
    }

    /// Whether `name` (case-insensitive) is a member of a double-sided set.
    #[must_use]
    pub fn is_double_sided(&self, name: &str) -> bool {
        self.categories
            .iter()
            .filter_map(|c| c.exclusive.as_ref())
            .filter(|set| set.double_sided)
            .flat_map(|set| set.members.iter())
            .any(|m| m.eq_ignore_ascii_case(name))
    }
}

impl TryFrom<Vec<Category>> for CategoryTable {
    type Error = AvatarError;

    fn try_from(categories: Vec<Category>) -> Result<Self> {
        Self::new(categories)
    }
}

impl From<CategoryTable> for Vec<Category> {
    fn from(table: CategoryTable) -> Self {
        table.categories
    }
}

impl Default for CategoryTable {
    /// The built-in character catalog.
    fn default() -> Self {
        use palettes::{EYES, HAIR, SKIN};

        let categories = vec![
            Category::new(CategoryId::Skin).with_recolor(&["Body"], SKIN),
            Category::new(CategoryId::Eyes).with_recolor(&["Left Iris", "Right Iris"], EYES),
            Category::new(CategoryId::Hair)
                .with_exclusive(&["Spikey", "Wavy"])
                .double_sided()
                .with_recolor(&["Spikey", "Wavy", "Eyebrows"], HAIR),
            Category::new(CategoryId::Nose)
                .with_exclusive(&["Nose Triangle", "Nose Oval", "Nose Cube"])
                .with_recolor(&["Nose Triangle", "Nose Oval", "Nose Cube"], SKIN),
            Category::new(CategoryId::Mouth)
                .with_exclusive(&["Mouth 1", "Mouth 2", "Mouth 3"])
                .synthesized(OverlaySpec::default()),
            Category::new(CategoryId::Top).with_exclusive(&["tshirt", "yshirt"]),
            Category::new(CategoryId::Bottom).with_exclusive(&["askirt", "lskirt", "shorts", "pants"]),
        ];

        Self {
            exclusive_of: categories
                .iter()
                .flat_map(|c| c.members().iter().map(move |m| (m.clone(), c.id)))
                .collect(),
            categories,
        }
    }
}
