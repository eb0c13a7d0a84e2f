//! Game settings and preferences
//!
//! Edited on the SETTINGS screen and persisted separately from highscores.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Background music loop on/off
    pub music_enabled: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            music_volume: 0.7,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Volume step applied per tick while left/right is held
    pub const VOLUME_STEP: f32 = 0.01;

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "valhalla_hop_settings";

    /// Native save file
    #[allow(dead_code)]
    const NATIVE_PATH: &'static str = "valhalla_hop_settings.json";

    pub fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
    }

    /// Nudge the music volume, staying in 0.0 - 1.0.
    /// Returns false when the volume was already pinned at the limit.
    pub fn adjust_volume(&mut self, delta: f32) -> bool {
        let volume = (self.music_volume + delta).clamp(0.0, 1.0);
        let changed = volume != self.music_volume;
        self.music_volume = volume;
        changed
    }

    /// Volume the front end should play music at (respects the toggle)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            self.music_volume
        } else {
            0.0
        }
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the native save file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::NATIVE_PATH) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::NATIVE_PATH);
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings: {e}, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to the native save file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let result = serde_json::to_string_pretty(self)
            .map_err(GameError::from)
            .and_then(|json| std::fs::write(Self::NATIVE_PATH, json).map_err(GameError::from));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {e}"),
        }
    }
}
