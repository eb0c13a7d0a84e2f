//! Overlay buttons and pointer hit-testing
//!
//! The core owns button placement so pointer clicks can be resolved to
//! actions deterministically; drawing them is the front end's job.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::aabb::Aabb;
use crate::sim::{GamePhase, HighscoreStage};
use crate::tuning::Tuning;

pub const BUTTON_SIZE: Vec2 = Vec2::new(200.0, 50.0);
pub const BUTTON_SPACING: f32 = 20.0;

/// What a button does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    Resume,
    OpenSettings,
    ToggleMusic,
    Back,
    Restart,
    Quit,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Resume => "Resume",
            MenuAction::OpenSettings => "Settings",
            MenuAction::ToggleMusic => "Toggle Music",
            MenuAction::Back => "Back",
            MenuAction::Restart => "Restart",
            MenuAction::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub action: MenuAction,
    pub rect: Aabb,
}

/// Actions offered on a screen, top to bottom
pub fn actions(phase: GamePhase) -> &'static [MenuAction] {
    match phase {
        GamePhase::Running | GamePhase::Highscore(HighscoreStage::EnterName) => &[],
        GamePhase::Menu => &[MenuAction::Resume, MenuAction::OpenSettings, MenuAction::Quit],
        GamePhase::Settings => &[MenuAction::ToggleMusic, MenuAction::Back],
        GamePhase::Highscore(HighscoreStage::Leaderboard) => &[MenuAction::Restart, MenuAction::Quit],
    }
}

/// Buttons for a screen, stacked and centred horizontally
pub fn buttons(phase: GamePhase, tuning: &Tuning) -> Vec<Button> {
    let actions = actions(phase);
    let count = actions.len() as f32;
    let column_height = count * BUTTON_SIZE.y + (count - 1.0).max(0.0) * BUTTON_SPACING;
    let x = (tuning.screen_width - BUTTON_SIZE.x) / 2.0;
    let top = (tuning.screen_height - column_height) / 2.0;

    actions
        .iter()
        .enumerate()
        .map(|(i, &action)| Button {
            action,
            rect: Aabb::new(
                Vec2::new(x, top + i as f32 * (BUTTON_SIZE.y + BUTTON_SPACING)),
                BUTTON_SIZE,
            ),
        })
        .collect()
}

/// Action under the pointer, if any
pub fn hit_test(phase: GamePhase, tuning: &Tuning, pointer: Vec2) -> Option<MenuAction> {
    buttons(phase, tuning)
        .into_iter()
        .find(|button| button.rect.contains(pointer))
        .map(|button| button.action)
}
