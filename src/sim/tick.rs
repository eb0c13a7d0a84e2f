//! Fixed timestep simulation tick
//!
//! One call per frame at 60 Hz. Dispatches on the current phase; while
//! running, the order is kinematics, raven motion, collisions, scrolling
//! (which extends the level), then the fall and integrity checks.

use glam::Vec2;

use super::collision;
use super::kinematics::{self, MoveIntent};
use super::state::{GameEvent, GameOverCause, GamePhase, GameState, HighscoreStage};
use super::world::Category;
use crate::consts::MAX_NAME_LEN;
use crate::error::GameError;
use crate::menu::{self, MenuAction};
use crate::settings::Settings;

/// Input intents for a single tick (already edge-filtered, see `input`)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub jump: bool,
    /// Held this tick
    pub move_left: bool,
    /// Held this tick
    pub move_right: bool,
    pub pause: bool,
    pub confirm: bool,
    pub backspace: bool,
    /// Characters typed this tick
    pub text: Vec<char>,
    pub quit: bool,
    pub pointer: Vec2,
    pub clicked: bool,
}

/// Advance the session by one tick.
///
/// Only fails with `GameError::Integrity`, when the level generator left
/// nothing to climb.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), GameError> {
    if state.quit_requested {
        return Ok(());
    }
    if input.quit {
        state.request_quit();
        return Ok(());
    }

    let clicked = if input.clicked {
        menu::hit_test(state.phase, &state.tuning, input.pointer)
    } else {
        None
    };

    match state.phase {
        GamePhase::Running => return run(state, input),
        GamePhase::Menu => {
            if input.pause || input.confirm {
                state.set_phase(GamePhase::Running);
            } else if let Some(action) = clicked {
                apply_action(state, action);
            }
        }
        GamePhase::Settings => {
            if input.pause {
                state.leave_settings();
                return Ok(());
            }
            let nudge = match MoveIntent::from_held(input.move_left, input.move_right) {
                MoveIntent::Left => -Settings::VOLUME_STEP,
                MoveIntent::Right => Settings::VOLUME_STEP,
                MoveIntent::None => 0.0,
            };
            if nudge != 0.0 && state.settings.adjust_volume(nudge) {
                state.settings_dirty = true;
            }
            if let Some(action) = clicked {
                apply_action(state, action);
            }
        }
        GamePhase::Highscore(HighscoreStage::EnterName) => {
            for &c in &input.text {
                if state.name_entry.chars().count() < MAX_NAME_LEN
                    && (c.is_alphanumeric() || c == ' ' || c == '-' || c == '_')
                {
                    state.name_entry.push(c);
                }
            }
            if input.backspace {
                state.name_entry.pop();
            }
            if input.confirm {
                state.record_score();
                state.set_phase(GamePhase::Highscore(HighscoreStage::Leaderboard));
            }
        }
        GamePhase::Highscore(HighscoreStage::Leaderboard) => {
            if input.confirm {
                state.reset();
            } else if let Some(action) = clicked {
                apply_action(state, action);
            }
        }
    }
    Ok(())
}

fn apply_action(state: &mut GameState, action: MenuAction) {
    match action {
        MenuAction::Resume => state.set_phase(GamePhase::Running),
        MenuAction::OpenSettings => state.set_phase(GamePhase::Settings),
        MenuAction::Back => state.leave_settings(),
        MenuAction::ToggleMusic => {
            state.settings.toggle_music();
            state.settings_dirty = true;
        }
        MenuAction::Restart => state.reset(),
        MenuAction::Quit => state.request_quit(),
    }
}

fn run(state: &mut GameState, input: &TickInput) -> Result<(), GameError> {
    if input.pause {
        state.set_phase(GamePhase::Menu);
        return Ok(());
    }

    state.time_ticks += 1;

    // Kinematics
    let intent = MoveIntent::from_held(input.move_left, input.move_right);
    if let Some(player) = state.world.get_mut(state.player) {
        kinematics::step_player(player, intent, input.jump, &state.tuning);
    }

    // Ravens move on their own
    for id in state.world.ids(Category::Raven) {
        if let Some(raven) = state.world.get_mut(id) {
            kinematics::step_hazard(raven, state.tuning.screen_width);
        }
    }

    // Collisions
    let outcome = collision::resolve(&mut state.world, state.player);
    if let Some(id) = outcome.scored {
        state.score += 1;
        log::debug!("Platform {id} scored, score {}", state.score);
        let score = state.score;
        state.push_event(GameEvent::PlatformScored { id, score });
    }
    if outcome.hazard.is_some() {
        state.game_over(GameOverCause::Raven);
        return Ok(());
    }

    // Scrolling
    let request = state
        .player()
        .and_then(|p| state.camera.scroll_request(&p.aabb(), p.on_ground(), &state.tuning));
    if let Some(dy) = request {
        state
            .camera
            .apply(dy, &mut state.world, &mut state.generator, &state.tuning);
        if dy > 0.0 {
            let spawned = state.generator.extend(
                &mut state.world,
                &mut state.rng,
                &state.tuning,
                state.score,
            );
            if spawned > 0 {
                state.push_event(GameEvent::RavensSpawned { count: spawned });
            }
        }
    }

    // Fell off the bottom of the screen
    if state
        .player()
        .is_some_and(|p| p.aabb().top() > state.tuning.screen_height)
    {
        state.game_over(GameOverCause::Fell);
        return Ok(());
    }

    state.check_integrity().inspect_err(|e| log::error!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Body;

    fn press(f: impl FnOnce(&mut TickInput)) -> TickInput {
        let mut input = TickInput::default();
        f(&mut input);
        input
    }

    /// Tick with no input until the player is grounded
    fn settle(state: &mut GameState) {
        for _ in 0..200 {
            tick(state, &TickInput::default()).unwrap();
            if state.player().unwrap().on_ground() {
                return;
            }
        }
        panic!("player never landed");
    }

    #[test]
    fn test_falls_onto_floor() {
        for seed in 0..200 {
            let mut state = GameState::new(seed);
            settle(&mut state);
            let player = state.player().unwrap();
            assert!(player.on_ground());
            assert_eq!(player.vel().y, 0.0);
            assert_eq!(player.pos, Vec2::new(400.0, 540.0), "seed {seed}");
            assert_eq!(player.aabb().bottom(), 580.0, "seed {seed}");
            assert_eq!(state.score, 0, "Floor landings never score (seed {seed})");
        }
    }

    #[test]
    fn test_scoring_once_per_platform() {
        let mut state = GameState::new(1);
        state.world.clear_category(Category::Platform);
        let id = state.world.spawn(
            Category::Platform,
            Vec2::new(380.0, 500.0),
            Vec2::new(70.0, 20.0),
            Body::Static { collected: false },
        );
        state.generator.highest_y = 0.0;

        settle(&mut state);
        assert_eq!(state.player().unwrap().aabb().bottom(), 500.0);
        assert_eq!(state.score, 1);
        assert!(state.world.get(id).unwrap().is_collected());

        // Jump and land on the same platform again
        tick(&mut state, &press(|i| i.jump = true)).unwrap();
        assert!(!state.player().unwrap().on_ground());
        settle(&mut state);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_airborne_jump_ignored() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default()).unwrap();
        let vy_before = state.player().unwrap().vel().y;
        tick(&mut state, &press(|i| i.jump = true)).unwrap();
        // Only gravity was added
        assert_eq!(
            state.player().unwrap().vel().y,
            vy_before + state.tuning.gravity
        );
    }

    #[test]
    fn test_pause_opens_menu_and_freezes() {
        let mut state = GameState::new(1);
        tick(&mut state, &press(|i| i.pause = true)).unwrap();
        assert_eq!(state.phase, GamePhase::Menu);

        let pos = state.player().unwrap().pos;
        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.player().unwrap().pos, pos);

        tick(&mut state, &press(|i| i.pause = true)).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_menu_navigation_by_pointer() {
        let mut state = GameState::new(1);
        state.set_phase(GamePhase::Menu);

        let settings_button = menu::buttons(GamePhase::Menu, &state.tuning)[1];
        let click = press(|i| {
            i.clicked = true;
            i.pointer = settings_button.rect.pos + Vec2::splat(1.0);
        });
        tick(&mut state, &click).unwrap();
        assert_eq!(state.phase, GamePhase::Settings);

        let toggle = menu::buttons(GamePhase::Settings, &state.tuning)[0];
        let click = press(|i| {
            i.clicked = true;
            i.pointer = toggle.rect.pos + Vec2::splat(1.0);
        });
        tick(&mut state, &click).unwrap();
        assert!(!state.settings.music_enabled);
        // Persisted on the way out, not on every edit
        assert!(!state.drain_events().contains(&GameEvent::SettingsChanged));

        tick(&mut state, &press(|i| i.pause = true)).unwrap();
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.drain_events().contains(&GameEvent::SettingsChanged));
    }

    #[test]
    fn test_settings_volume_held() {
        let mut state = GameState::new(1);
        state.set_phase(GamePhase::Settings);
        state.drain_events();
        let before = state.settings.music_volume;
        let hold = press(|i| i.move_right = true);
        for _ in 0..120 {
            tick(&mut state, &hold).unwrap();
        }
        assert_eq!(state.settings.music_volume, 1.0);
        assert!(state.settings.music_volume > before);
        assert!(state.drain_events().is_empty(), "No save while the key is held");

        tick(&mut state, &press(|i| i.pause = true)).unwrap();
        let saves = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::SettingsChanged)
            .count();
        assert_eq!(saves, 1);
    }

    #[test]
    fn test_settings_untouched_not_saved() {
        let mut state = GameState::new(1);
        state.set_phase(GamePhase::Settings);
        state.drain_events();
        // Already at the floor: nothing changes
        state.settings.music_volume = 0.0;
        tick(&mut state, &press(|i| i.move_left = true)).unwrap();
        tick(&mut state, &press(|i| i.pause = true)).unwrap();
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_raven_collision_ends_run() {
        let mut state = GameState::new(1);
        let pos = state.player().unwrap().pos;
        state.world.spawn(
            Category::Raven,
            pos,
            Vec2::new(40.0, 30.0),
            Body::Hazard { vel: Vec2::ZERO },
        );
        tick(&mut state, &TickInput::default()).unwrap();
        assert!(matches!(state.phase, GamePhase::Highscore(_)));
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                cause: GameOverCause::Raven,
                ..
            }
        )));
    }

    #[test]
    fn test_falling_off_screen_ends_run() {
        let mut state = GameState::new(1);
        state.world.clear_category(Category::Floor);
        state.world.clear_category(Category::Platform);
        // Keep one surface far away so integrity holds
        state.world.spawn(
            Category::Platform,
            Vec2::new(0.0, 0.0),
            Vec2::new(70.0, 20.0),
            Body::Static { collected: false },
        );
        state.generator.highest_y = 0.0;

        for _ in 0..200 {
            tick(&mut state, &TickInput::default()).unwrap();
            if state.phase != GamePhase::Running {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::Highscore(HighscoreStage::Leaderboard));
    }

    #[test]
    fn test_scroll_extends_level() {
        let mut state = GameState::new(4);
        if let Some(player) = state.world.get_mut(state.player) {
            player.pos.y = 100.0;
        }
        let before = state.world.count(Category::Platform);
        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.camera.offset, state.tuning.scroll_step);
        assert_eq!(state.world.count(Category::Platform), before + 1);
        assert!(state.generator.highest_y < 0.0);
    }

    #[test]
    fn test_ravens_spawn_from_score() {
        let mut state = GameState::new(4);
        state.score = 30;
        if let Some(player) = state.world.get_mut(state.player) {
            player.pos.y = 100.0;
        }
        state.drain_events();
        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.world.count(Category::Raven), 1);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::RavensSpawned { count: 1 })
        );
    }

    #[test]
    fn test_name_entry_and_restart() {
        let mut state = GameState::new(1);
        state.score = 3;
        state.game_over(GameOverCause::Fell);
        assert_eq!(state.phase, GamePhase::Highscore(HighscoreStage::EnterName));

        tick(&mut state, &press(|i| i.text = "Odin!x".chars().collect())).unwrap();
        assert_eq!(state.name_entry, "Odinx");
        tick(&mut state, &press(|i| i.backspace = true)).unwrap();
        assert_eq!(state.name_entry, "Odin");
        tick(&mut state, &press(|i| i.confirm = true)).unwrap();
        assert_eq!(state.phase, GamePhase::Highscore(HighscoreStage::Leaderboard));
        assert_eq!(state.highscores.top_n_scores(1)[0].name, "Odin");
        assert_eq!(state.last_rank, Some(1));

        tick(&mut state, &press(|i| i.confirm = true)).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        // Leaderboard survives restarts
        assert_eq!(state.highscores.entries.len(), 1);
    }

    #[test]
    fn test_name_length_bounded() {
        let mut state = GameState::new(1);
        state.score = 3;
        state.game_over(GameOverCause::Fell);
        tick(&mut state, &press(|i| i.text = vec!['a'; 40])).unwrap();
        assert_eq!(state.name_entry.len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_quit_stops_ticking() {
        let mut state = GameState::new(1);
        tick(&mut state, &press(|i| i.quit = true)).unwrap();
        assert!(state.quit_requested);
        let pos = state.player().unwrap().pos;
        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.player().unwrap().pos, pos);
    }

    #[test]
    fn test_integrity_fault_surfaces() {
        let mut state = GameState::new(1);
        state.generator.highest_y = 400.0;
        assert!(matches!(
            tick(&mut state, &TickInput::default()),
            Err(GameError::Integrity(_))
        ));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            press(|i| i.move_right = true),
            press(|i| i.jump = true),
            press(|i| i.move_left = true),
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input).unwrap();
                tick(&mut state2, input).unwrap();
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player().unwrap().pos, state2.player().unwrap().pos);
        assert_eq!(state1.world.len(), state2.world.len());
    }
}
