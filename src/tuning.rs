//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-tuned from a JSON
//! file without recompiling. Defaults mirror `crate::consts`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;
use crate::sim::kinematics;

/// Environment variable naming the tuning file
pub const TUNING_ENV: &str = "VALHALLA_HOP_TUNING";
/// Tuning file used when the environment variable is unset
pub const DEFAULT_TUNING_PATH: &str = "config/tuning.json";

/// Gameplay constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen_width: f32,
    pub screen_height: f32,

    pub platform_size: Vec2,
    pub floor_height: f32,
    pub player_size: Vec2,
    /// Top-left corner of the player at session start/reset
    pub spawn: Vec2,

    pub gravity: f32,
    pub jump_strength: f32,
    pub horizontal_speed: f32,

    pub min_v_jump_distance: f32,
    pub min_h_jump_distance: f32,

    pub scroll_step: f32,
    /// Scroll up when the player's top edge is at or above this fraction of the screen
    pub scroll_up_fraction: f32,
    /// Scroll back down when the airborne player's bottom is within this many pixels of the screen bottom
    pub scroll_down_margin: f32,
    /// Entities this far below the screen top are removed
    pub cull_depth: f32,

    pub raven_size: Vec2,
    pub raven_score_step: u32,
    pub raven_min_speed: f32,
    pub raven_max_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            platform_size: Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
            floor_height: FLOOR_HEIGHT,
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            spawn: Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1),

            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            horizontal_speed: HORIZONTAL_SPEED,

            min_v_jump_distance: MIN_V_JUMP_DISTANCE,
            min_h_jump_distance: MIN_H_JUMP_DISTANCE,

            scroll_step: SCROLL_STEP,
            scroll_up_fraction: 0.25,
            scroll_down_margin: SCREEN_HEIGHT / 8.0,
            cull_depth: SCREEN_HEIGHT * 2.0,

            raven_size: Vec2::new(RAVEN_WIDTH, RAVEN_HEIGHT),
            raven_score_step: RAVEN_SCORE_STEP,
            raven_min_speed: RAVEN_MIN_SPEED,
            raven_max_speed: RAVEN_MAX_SPEED,
        }
    }
}

impl Tuning {
    /// Y of the floor's top edge
    pub fn floor_top(&self) -> f32 {
        self.screen_height - self.floor_height
    }

    /// Player top edge at or above this line triggers an upward scroll
    pub fn scroll_up_line(&self) -> f32 {
        self.screen_height * self.scroll_up_fraction
    }

    /// Airborne player bottom at or below this line triggers a downward scroll
    pub fn scroll_down_line(&self) -> f32 {
        self.screen_height - self.scroll_down_margin
    }

    /// Load tuning from the JSON file named by `VALHALLA_HOP_TUNING`.
    /// Falls back to defaults if the file is missing, unparseable or invalid.
    pub fn load() -> Self {
        let path =
            std::env::var(TUNING_ENV).unwrap_or_else(|_| DEFAULT_TUNING_PATH.to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {path}");
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to load {path}: {e}, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that generated levels stay beatable with these values
    pub fn validate(&self) -> Result<(), GameError> {
        if self.gravity <= 0.0 || self.jump_strength >= 0.0 {
            return Err(GameError::InvalidTuning(
                "gravity must be positive and jump strength negative".to_string(),
            ));
        }
        if self.platform_size.x > self.screen_width || self.player_size.x > self.screen_width {
            return Err(GameError::InvalidTuning(
                "platform and player must fit the screen width".to_string(),
            ));
        }
        if self.raven_min_speed > self.raven_max_speed {
            return Err(GameError::InvalidTuning(
                "raven speed range is inverted".to_string(),
            ));
        }

        let apex = kinematics::jump_apex(self.jump_strength, self.gravity);
        if self.min_v_jump_distance > apex {
            return Err(GameError::InvalidTuning(format!(
                "platform gap {} exceeds jump apex {apex}",
                self.min_v_jump_distance
            )));
        }

        let reach = kinematics::horizontal_reach(self, self.min_v_jump_distance);
        if reach < self.min_h_jump_distance {
            return Err(GameError::InvalidTuning(format!(
                "horizontal reach {reach} is below the platform offset {}",
                self.min_h_jump_distance
            )));
        }
        Ok(())
    }
}
