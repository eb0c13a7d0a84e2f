//! Camera scrolling
//!
//! The camera never moves; the world does. Scrolling shifts every entity's
//! y by a fixed step, up-scrolls keep the level populated above the
//! viewport, and entities that fall far enough below the screen are culled.

use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::level_gen::LevelGenerator;
use super::world::{Category, World};
use crate::tuning::Tuning;

/// Accumulated camera travel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Total downward world shift applied so far (how far the camera has climbed)
    pub offset: f32,
}

impl Camera {
    /// World shift wanted this tick, if any.
    ///
    /// Positive: player's top edge reached the upper threshold, move the world
    /// down. Negative: airborne player's bottom edge reached the lower dead
    /// zone, move the world back up, never below the starting camera height.
    pub fn scroll_request(&self, player: &Aabb, on_ground: bool, tuning: &Tuning) -> Option<f32> {
        if player.top() <= tuning.scroll_up_line() {
            return Some(tuning.scroll_step);
        }
        if !on_ground && player.bottom() >= tuning.scroll_down_line() && self.offset > 0.0 {
            return Some(-tuning.scroll_step.min(self.offset));
        }
        None
    }

    /// Shift the world and the generator cursor by `dy`, then cull whatever
    /// dropped past the cull depth. Returns the number of culled entities.
    pub fn apply(&mut self, dy: f32, world: &mut World, generator: &mut LevelGenerator, tuning: &Tuning) -> usize {
        for entity in world.iter_mut() {
            entity.pos.y += dy;
        }
        generator.shift(dy);
        self.offset += dy;

        let culled = cull(world, tuning.cull_depth);
        // Never scroll back far enough to reveal culled space
        self.offset = self
            .offset
            .min((tuning.cull_depth - tuning.screen_height).max(0.0));
        culled
    }
}

/// Remove every non-player entity whose top edge is below `depth`
pub fn cull(world: &mut World, depth: f32) -> usize {
    let doomed: Vec<_> = world
        .iter()
        .filter(|e| e.category != Category::Player && e.pos.y > depth)
        .map(|e| e.id)
        .collect();
    for id in &doomed {
        world.despawn(*id);
    }
    if !doomed.is_empty() {
        log::debug!("Culled {} entities below {depth}", doomed.len());
    }
    doomed.len()
}
