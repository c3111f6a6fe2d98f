//! Persisted user preferences
//!
//! Long-lived options that survive between sessions. Note that the
//! overwrite decision is deliberately NOT here: it is scoped to a single
//! conversion run (see `convert::overwrite`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application-wide settings
///
/// Persisted to `<data dir>/srt2txt/settings.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppSettings {
    /// Show full normalized paths instead of basenames in the list;
    /// also switches the name-sort and search keys
    #[serde(default)]
    pub show_full_path: bool,
    /// Search subdirectories when expanding a folder
    #[serde(default)]
    pub recursive: bool,
    /// Interpret the search box as a regular expression
    #[serde(default)]
    pub regex_search: bool,
    /// Shared output folder, when "output to one folder" is enabled
    #[serde(default)]
    pub output_folder: Option<PathBuf>,
}

impl AppSettings {
    const SETTINGS_FILE: &'static str = "settings.json";

    fn get_app_data_dir() -> Result<PathBuf, String> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| "Could not determine data directory".to_string())?;

        let app_dir = data_dir.join("srt2txt");

        if !app_dir.exists() {
            std::fs::create_dir_all(&app_dir)
                .map_err(|e| format!("Failed to create app data directory: {}", e))?;
        }

        Ok(app_dir)
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(settings) => {
                log::debug!("Loaded settings from disk");
                settings
            }
            Err(e) => {
                log::debug!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self, String> {
        let app_dir = Self::get_app_data_dir()?;
        let settings_path = app_dir.join(Self::SETTINGS_FILE);

        if !settings_path.exists() {
            return Err("Settings file not found".to_string());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| format!("Failed to read settings: {}", e))?;

        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse settings: {}", e))
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), String> {
        let app_dir = Self::get_app_data_dir()?;
        let settings_path = app_dir.join(Self::SETTINGS_FILE);

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(&settings_path, json)
            .map_err(|e| format!("Failed to write settings: {}", e))?;

        log::debug!("Saved settings to {:?}", settings_path);
        Ok(())
    }
}
