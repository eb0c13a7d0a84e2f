//! Valhalla Hop entry point
//!
//! The native binary is a headless driver: it loads configuration, runs the
//! simulation at a fixed 60 Hz with a simple autopilot at the controls and
//! persists whatever the session produces. A graphical front end plugs into
//! the same loop through `RenderSink`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    use valhalla_hop::consts::TICK_RATE_HZ;
    use valhalla_hop::input::{InputTracker, RawInput};
    use valhalla_hop::render::{RenderFrame, RenderSink};
    use valhalla_hop::sim::{Category, GameEvent, GamePhase, GameState, HighscoreStage, tick};
    use valhalla_hop::{HighScores, Settings, Tuning, clock_seed};

    const SEED_ENV: &str = "VALHALLA_HOP_SEED";
    const MAX_TICKS_ENV: &str = "VALHALLA_HOP_MAX_TICKS";
    const REALTIME_ENV: &str = "VALHALLA_HOP_REALTIME";

    /// Five minutes of play
    const DEFAULT_MAX_TICKS: u64 = 5 * 60 * TICK_RATE_HZ as u64;

    /// Logs a summary of every second of frames
    struct LogSink {
        frames: u64,
    }

    impl RenderSink for LogSink {
        fn present(&mut self, frame: &RenderFrame) {
            self.frames += 1;
            if self.frames % TICK_RATE_HZ as u64 == 0 {
                log::debug!(
                    "frame {}: {:?}, score {}, {} sprites",
                    self.frames,
                    frame.phase,
                    frame.score,
                    frame.sprites.len()
                );
            }
        }
    }

    /// Climbs toward the closest platform above the player
    fn autopilot(state: &GameState, frame: u64) -> RawInput {
        let mut raw = RawInput::default();
        match state.phase {
            GamePhase::Running => {
                let Some(player) = state.player() else {
                    return raw;
                };
                let body = player.aabb();
                let target = state
                    .world
                    .iter_category(Category::Platform)
                    .filter(|p| p.aabb().top() < body.bottom() - 1.0)
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
                if let Some(target) = target {
                    let dx = target.aabb().center().x - body.center().x;
                    raw.left = dx < -state.tuning.horizontal_speed;
                    raw.right = dx > state.tuning.horizontal_speed;
                }
                // Release every other frame so the edge fires again
                raw.jump = player.on_ground() && frame % 2 == 0;
            }
            GamePhase::Highscore(HighscoreStage::EnterName) => {
                if state.name_entry.is_empty() {
                    raw.text = "HOP".chars().collect();
                } else {
                    raw.confirm = frame % 2 == 0;
                }
            }
            GamePhase::Highscore(HighscoreStage::Leaderboard) => raw.quit = true,
            GamePhase::Menu | GamePhase::Settings => raw.pause = frame % 2 == 0,
        }
        raw
    }

    fn env_u64(key: &str) -> Option<u64> {
        let value = std::env::var(key).ok()?;
        match value.parse() {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("Ignoring {key}={value}: {e}");
                None
            }
        }
    }

    pub fn run() -> std::process::ExitCode {
        env_logger::init();
        log::info!("Valhalla Hop (native, headless) starting...");

        let seed = env_u64(SEED_ENV).unwrap_or_else(clock_seed);
        let max_ticks = env_u64(MAX_TICKS_ENV).unwrap_or(DEFAULT_MAX_TICKS);
        let realtime = std::env::var_os(REALTIME_ENV).is_some();

        let mut state = GameState::with_config(seed, Tuning::load(), Settings::load(), HighScores::load());
        log::info!("Game initialized with seed: {seed}");

        let mut tracker = InputTracker::new();
        let mut sink = LogSink { frames: 0 };
        let step = Duration::from_secs_f64(1.0 / TICK_RATE_HZ as f64);

        for frame in 0..max_ticks {
            let started = Instant::now();

            let input = tracker.update(&autopilot(&state, frame));
            if let Err(e) = tick(&mut state, &input) {
                log::error!("Simulation halted: {e}");
                return std::process::ExitCode::FAILURE;
            }

            for event in state.drain_events() {
                match event {
                    GameEvent::StartMusic => log::info!(
                        "Music on at volume {:.2}",
                        state.settings.effective_music_volume()
                    ),
                    GameEvent::HighScoreRecorded { .. } => state.highscores.save(),
                    GameEvent::SettingsChanged => state.settings.save(),
                    GameEvent::GameOver { score, cause } => {
                        log::info!("Run over ({cause:?}): {score} points")
                    }
                    GameEvent::PlatformScored { .. } | GameEvent::RavensSpawned { .. } => {}
                }
            }

            sink.present(&RenderFrame::capture(&state));

            if state.quit_requested {
                break;
            }
            if realtime {
                if let Some(rest) = step.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }

        match state.highscores.top_score() {
            Some(best) => log::info!("Best score: {best}"),
            None => log::info!("No scores recorded"),
        }
        std::process::ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser front end drives the library directly
}
