//! Game state and session lifecycle
//!
//! All state that must survive between ticks lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level_gen::{LevelGenerator, spawn_floor};
use super::scroll::Camera;
use super::world::{Body, Category, Entity, EntityId, World};
use crate::error::GameError;
use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Paused with the menu overlay open
    Menu,
    /// Settings screen (reached from the menu)
    Settings,
    /// Run ended
    Highscore(HighscoreStage),
}

/// Steps of the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighscoreStage {
    /// Typing a name for the leaderboard
    EnterName,
    /// Showing the leaderboard, waiting for restart or quit
    Leaderboard,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    Raven,
    Fell,
}

/// Notifications for the front end, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Start the background music loop (once per session)
    StartMusic,
    PlatformScored { id: EntityId, score: u32 },
    RavensSpawned { count: usize },
    GameOver { score: u32, cause: GameOverCause },
    /// Score written to the leaderboard; `rank` is None if it did not place
    HighScoreRecorded { rank: Option<usize> },
    /// Settings were edited and should be persisted
    SettingsChanged,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Platforms scored this run
    pub score: u32,
    /// Simulation ticks spent running this run
    pub time_ticks: u64,
    pub world: World,
    pub player: EntityId,
    pub generator: LevelGenerator,
    pub camera: Camera,
    pub highscores: HighScores,
    pub settings: Settings,
    /// Name typed at the highscore prompt
    pub name_entry: String,
    /// Rank achieved by the last recorded score
    pub last_rank: Option<usize>,
    /// Front end should exit; in-memory state is discarded
    pub quit_requested: bool,
    /// Settings edited since the SETTINGS screen was opened
    #[serde(default)]
    pub settings_dirty: bool,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session with default tuning, settings and an empty leaderboard
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Settings::default(), HighScores::new())
    }

    /// Create a session from loaded configuration
    pub fn with_config(seed: u64, tuning: Tuning, settings: Settings, highscores: HighScores) -> Self {
        let generator = LevelGenerator::new(&tuning);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Running,
            score: 0,
            time_ticks: 0,
            world: World::new(),
            player: 0,
            generator,
            camera: Camera::default(),
            highscores,
            settings,
            name_entry: String::new(),
            last_rank: None,
            quit_requested: false,
            settings_dirty: false,
            events: Vec::new(),
        };

        log::info!("Session starting (seed {seed})");
        state.reset();
        state.events.push(GameEvent::StartMusic);
        state
    }

    /// Start a fresh run: rebuild the level, respawn the player and zero the score.
    ///
    /// The RNG stream continues, so each restart gets a new layout that is
    /// still reproducible from the session seed.
    pub fn reset(&mut self) {
        self.world.clear();
        spawn_floor(&mut self.world, &self.tuning);

        self.generator = LevelGenerator::new(&self.tuning);
        let placed = self
            .generator
            .populate_initial(&mut self.world, &mut self.rng, &self.tuning);

        self.player = self.world.spawn(
            Category::Player,
            self.tuning.spawn,
            self.tuning.player_size,
            Body::Kinematic {
                vel: Vec2::ZERO,
                on_ground: false,
            },
        );

        self.score = 0;
        self.time_ticks = 0;
        self.camera = Camera::default();
        self.name_entry.clear();
        self.last_rank = None;
        self.phase = GamePhase::Running;
        log::info!("Run reset: {} platforms generated", placed.len());
    }

    pub fn player(&self) -> Option<&Entity> {
        self.world.get(self.player)
    }

    /// Platforms the player has already scored on this run
    pub fn collected_platforms(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.world
            .iter_category(Category::Platform)
            .filter(|platform| platform.is_collected())
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// End the run and move to the highscore screen
    pub fn game_over(&mut self, cause: GameOverCause) {
        log::info!("Game over ({cause:?}) with score {}", self.score);
        self.push_event(GameEvent::GameOver {
            score: self.score,
            cause,
        });
        self.name_entry.clear();
        let stage = if self.highscores.qualifies(self.score) {
            HighscoreStage::EnterName
        } else {
            HighscoreStage::Leaderboard
        };
        self.set_phase(GamePhase::Highscore(stage));
    }

    /// Write the current score to the leaderboard under the typed name
    pub fn record_score(&mut self) -> Option<usize> {
        let name = self.name_entry.trim();
        let name = if name.is_empty() { "Anonymous" } else { name }.to_string();
        let rank = self.highscores.record_score(&name, self.score);
        log::info!("Recorded {} for {name}: rank {rank:?}", self.score);
        self.last_rank = rank;
        self.push_event(GameEvent::HighScoreRecorded { rank });
        rank
    }

    /// Return from SETTINGS to the menu, asking the front end to persist
    /// the settings once if anything was edited
    pub fn leave_settings(&mut self) {
        if self.settings_dirty {
            self.settings_dirty = false;
            self.push_event(GameEvent::SettingsChanged);
        }
        self.set_phase(GamePhase::Menu);
    }

    pub fn request_quit(&mut self) {
        log::info!("Quit requested");
        self.quit_requested = true;
    }

    /// Verify the generator kept the level climbable.
    ///
    /// A failure here is a generator bug, never a player mistake.
    pub fn check_integrity(&self) -> Result<(), GameError> {
        if self.player().is_none() {
            return Err(GameError::Integrity("player entity missing".to_string()));
        }
        if self.world.count(Category::Floor) + self.world.count(Category::Platform) == 0 {
            return Err(GameError::Integrity(
                "no floor or platform left to stand on".to_string(),
            ));
        }
        if self.generator.highest_y > self.tuning.min_v_jump_distance {
            return Err(GameError::Integrity(format!(
                "highest platform at y={} leaves the top of the screen unreachable",
                self.generator.highest_y
            )));
        }
        Ok(())
    }
}
