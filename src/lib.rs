//! Valhalla Hop - a vertical platform jumper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, level generation, state machine)
//! - `input`: Edge-triggered input tracking
//! - `menu`: Button layout and pointer hit-testing for the overlay states
//! - `render`: Render sink contract consumed by a front end
//! - `highscores`: Leaderboard and its persistence
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (music, FPS counter)
//! - `error`: Crate error type

pub mod error;
pub mod highscores;
pub mod input;
pub mod menu;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_RATE_HZ: u32 = 60;

    /// Screen dimensions (pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    pub const PLATFORM_WIDTH: f32 = 70.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const FLOOR_HEIGHT: f32 = 20.0;

    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Default spawn (top-left corner of the player box)
    pub const PLAYER_SPAWN: (f32, f32) = (400.0, 400.0);

    /// Per-tick gravity while airborne
    pub const GRAVITY: f32 = 0.5;
    /// Vertical velocity applied on jump (negative is up)
    pub const JUMP_STRENGTH: f32 = -10.0;
    /// Horizontal velocity magnitude while a direction is held
    pub const HORIZONTAL_SPEED: f32 = 5.0;

    /// Fixed vertical gap between consecutive platforms
    pub const MIN_V_JUMP_DISTANCE: f32 = 80.0;
    /// Max horizontal offset between consecutive platforms
    pub const MIN_H_JUMP_DISTANCE: f32 = 120.0;

    /// Camera shift per scrolling tick
    pub const SCROLL_STEP: f32 = 5.0;

    pub const RAVEN_WIDTH: f32 = 40.0;
    pub const RAVEN_HEIGHT: f32 = 30.0;
    /// One raven per this many points
    pub const RAVEN_SCORE_STEP: u32 = 25;
    pub const RAVEN_MIN_SPEED: f32 = 2.0;
    pub const RAVEN_MAX_SPEED: f32 = 4.0;

    /// Highscore table size
    pub const MAX_HIGH_SCORES: usize = 10;
    /// Longest name accepted at the highscore prompt
    pub const MAX_NAME_LEN: usize = 12;
}

/// Install the browser console logger and panic hook (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn init_web_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Seed derived from the wall clock, used when no seed is given
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed derived from the wall clock, used when no seed is given
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
