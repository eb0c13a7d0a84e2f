//! Render sink contract
//!
//! Each frame the core captures what is visible into a `RenderFrame`; a
//! front end implements `RenderSink` to draw it. The core never touches
//! pixels, fonts or images.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::highscores::HighScoreEntry;
use crate::menu::{self, Button};
use crate::sim::aabb::Aabb;
use crate::sim::world::{Category, EntityId};
use crate::sim::{GamePhase, GameState};

/// Leaderboard rows shown on the highscore screen
pub const LEADERBOARD_ROWS: usize = 10;

/// Back-to-front draw order
const DRAW_ORDER: [Category; 4] = [
    Category::Floor,
    Category::Platform,
    Category::Raven,
    Category::Player,
];

/// Visual identity of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    Player,
    Floor,
    Platform,
    /// Platform the player already scored on
    PlatformCollected,
    Raven,
}

/// How a front end should paint a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skin {
    Texture(&'static str),
    /// Asset missing: draw a solid box instead
    Solid([u8; 3]),
}

impl Visual {
    pub fn asset_key(&self) -> &'static str {
        match self {
            Visual::Player => "player.png",
            Visual::Floor => "floor.png",
            Visual::Platform | Visual::PlatformCollected => "platform.png",
            Visual::Raven => "raven.png",
        }
    }

    pub fn fallback_color(&self) -> [u8; 3] {
        match self {
            Visual::Player => [0, 0, 255],
            Visual::Floor => [96, 64, 32],
            Visual::Platform => [128, 128, 128],
            Visual::PlatformCollected => [180, 160, 90],
            Visual::Raven => [24, 24, 24],
        }
    }

    /// Pick the texture if the front end loaded it, otherwise the fallback colour
    pub fn skin(&self, is_loaded: impl Fn(&str) -> bool) -> Skin {
        let key = self.asset_key();
        if is_loaded(key) {
            Skin::Texture(key)
        } else {
            Skin::Solid(self.fallback_color())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: EntityId,
    pub visual: Visual,
    pub pos: Vec2,
    pub size: Vec2,
}

/// Everything a front end needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Visible sprites, back to front
    pub sprites: Vec<Sprite>,
    pub score: u32,
    pub phase: GamePhase,
    pub buttons: Vec<Button>,
    /// Name typed so far at the highscore prompt
    pub name_entry: String,
    pub leaderboard: Vec<HighScoreEntry>,
    pub show_fps: bool,
}

impl RenderFrame {
    pub fn capture(state: &GameState) -> Self {
        let screen = Aabb::new(
            Vec2::ZERO,
            Vec2::new(state.tuning.screen_width, state.tuning.screen_height),
        );

        let sprites = DRAW_ORDER
            .iter()
            .flat_map(|&category| state.world.iter_category(category))
            .filter(|entity| entity.aabb().overlaps(&screen))
            .map(|entity| Sprite {
                id: entity.id,
                visual: match entity.category {
                    Category::Player => Visual::Player,
                    Category::Floor => Visual::Floor,
                    Category::Platform if entity.is_collected() => Visual::PlatformCollected,
                    Category::Platform => Visual::Platform,
                    Category::Raven => Visual::Raven,
                },
                pos: entity.pos,
                size: entity.size,
            })
            .collect();

        let leaderboard = match state.phase {
            GamePhase::Highscore(_) => state.highscores.top_n_scores(LEADERBOARD_ROWS).to_vec(),
            _ => Vec::new(),
        };

        Self {
            sprites,
            score: state.score,
            phase: state.phase,
            buttons: menu::buttons(state.phase, &state.tuning),
            name_entry: state.name_entry.clone(),
            leaderboard,
            show_fps: state.settings.show_fps,
        }
    }
}

/// Implemented by whatever draws frames
pub trait RenderSink {
    fn present(&mut self, frame: &RenderFrame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Body;

    #[test]
    fn test_capture_new_session() {
        let state = GameState::new(3);
        let frame = RenderFrame::capture(&state);
        assert_eq!(frame.score, 0);
        assert_eq!(frame.phase, GamePhase::Running);
        assert!(frame.buttons.is_empty());
        // Floor + 7 platforms + player
        assert_eq!(frame.sprites.len(), 9);
        assert_eq!(frame.sprites[0].visual, Visual::Floor);
        assert_eq!(frame.sprites.last().map(|s| s.visual), Some(Visual::Player));
    }

    #[test]
    fn test_offscreen_entities_hidden() {
        let mut state = GameState::new(3);
        state.world.spawn(
            Category::Platform,
            Vec2::new(0.0, -200.0),
            Vec2::new(70.0, 20.0),
            Body::Static { collected: false },
        );
        let frame = RenderFrame::capture(&state);
        assert_eq!(frame.sprites.len(), 9);
    }

    #[test]
    fn test_collected_platform_visual() {
        let mut state = GameState::new(3);
        let id = state.world.ids(Category::Platform)[0];
        if let Some(platform) = state.world.get_mut(id) {
            platform.body = Body::Static { collected: true };
        }
        let frame = RenderFrame::capture(&state);
        let sprite = frame.sprites.iter().find(|s| s.id == id).unwrap();
        assert_eq!(sprite.visual, Visual::PlatformCollected);
    }

    #[test]
    fn test_skin_falls_back_when_missing() {
        assert_eq!(
            Visual::Raven.skin(|key| key == "raven.png"),
            Skin::Texture("raven.png")
        );
        assert_eq!(Visual::Player.skin(|_| false), Skin::Solid([0, 0, 255]));
    }
}
