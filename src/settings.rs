use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";
const APP_DIR: &str = "CrosshairOverlay";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file that receives a copy of the log output.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Directory holding the saved offset and image. If `None`, a per-user
    /// data directory is used.
    #[serde(default)]
    pub data_dir: Option<String>,
    /// Click-through state the preview host reports at startup.
    #[serde(default = "default_click_through")]
    pub click_through: bool,
}

fn default_click_through() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            data_dir: None,
            click_through: default_click_through(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Resolve where the overlay keeps its persisted state.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = self.data_dir.as_deref().filter(|d| !d.trim().is_empty()) {
            return PathBuf::from(dir);
        }
        dirs_next::data_local_dir()
            .unwrap_or_else(|| {
                std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir())
            })
            .join(APP_DIR)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }
}
