use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{AvatarError, Result};
use crate::resources::color::Color;

/// Key the selected theme is stored under.
pub const THEME_KEY: &str = "selectedTheme";

/// String key-value store that outlives the session.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// Volatile store, for tests and hosts without persistence.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: FxHashMap<String, String>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: FxHashMap<String, String>,
}

impl FilePreferences {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                AvatarError::PreferenceError(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FxHashMap::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// UI color theme. The scene uses `primary` for the floor and `background`
/// for the clear color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub primary: Color,
    pub primary_dark: Color,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
    pub light_background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            primary: Color::from_hex(0xf0_f0f0),
            primary_dark: Color::from_hex(0xc8_b8a4),
            secondary: Color::from_hex(0x72_5147),
            accent: Color::from_hex(0xe7_b292),
            background: Color::from_hex(0xf0_f0f0),
            light_background: Color::from_hex(0xfa_f6f0),
        }
    }
}

impl Theme {
    /// Reads the saved theme. A missing or unreadable entry yields `None`.
    #[must_use]
    pub fn load(store: &dyn PreferenceStore) -> Option<Theme> {
        let raw = store.get(THEME_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(theme) => Some(theme),
            Err(e) => {
                log::warn!("Ignoring unreadable saved theme: {e}");
                None
            }
        }
    }

    pub fn save(&self, store: &mut dyn PreferenceStore) -> Result<()> {
        store.set(THEME_KEY, serde_json::to_string(self)?)
    }
}
