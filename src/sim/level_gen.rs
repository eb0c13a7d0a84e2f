//! Procedural level generation
//!
//! Platforms are stacked upward at a fixed vertical gap, each one shifted
//! horizontally by at most `min_h_jump_distance` from the previous one, so
//! every platform is inside the jump arc of the one below it. Ravens are
//! spawned in batches sized by the score.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::LANDING_TOLERANCE;
use super::world::{Body, Category, EntityId, World};
use crate::tuning::Tuning;

/// Generation cursor: where the next platform goes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelGenerator {
    /// Top edge of the most recently placed platform (screen space, moves with scrolling)
    pub highest_y: f32,
    /// Left edge of the most recently placed platform
    pub prev_x: f32,
    /// `score / raven_score_step` when the live raven batch was spawned
    pub raven_tier: u32,
}

impl LevelGenerator {
    /// Start a column on top of the floor, centred under the spawn point
    pub fn new(tuning: &Tuning) -> Self {
        let center = tuning.spawn.x + tuning.player_size.x / 2.0;
        Self {
            highest_y: tuning.floor_top(),
            prev_x: clamp_platform_x(center - tuning.platform_size.x / 2.0, tuning),
            raven_tier: 0,
        }
    }

    /// Where the next platform would go, without placing it.
    ///
    /// Rows below the spawn point's feet keep out of the player's fall lane,
    /// so a fresh run always drops onto the floor.
    pub fn next_platform_pos(&self, rng: &mut Pcg32, tuning: &Tuning) -> Vec2 {
        let y = self.highest_y - tuning.min_v_jump_distance;
        let lo = clamp_platform_x(self.prev_x - tuning.min_h_jump_distance, tuning);
        let hi = clamp_platform_x(self.prev_x + tuning.min_h_jump_distance, tuning);

        let spawn_bottom = tuning.spawn.y + tuning.player_size.y;
        let x = if y >= spawn_bottom - LANDING_TOLERANCE {
            let (left, right) = fall_lane(tuning);
            sample_outside(rng, lo, hi, left, right)
        } else if hi > lo {
            rng.random_range(lo..=hi)
        } else {
            lo
        };
        Vec2::new(x, y)
    }

    /// Place one platform strictly above the current highest and advance the cursor
    pub fn place_platform(&mut self, world: &mut World, rng: &mut Pcg32, tuning: &Tuning) -> EntityId {
        let pos = self.next_platform_pos(rng, tuning);
        self.highest_y = pos.y;
        self.prev_x = pos.x;
        world.spawn(
            Category::Platform,
            pos,
            tuning.platform_size,
            Body::Static { collected: false },
        )
    }

    /// Fill the screen from the floor up to just below the top edge
    pub fn populate_initial(&mut self, world: &mut World, rng: &mut Pcg32, tuning: &Tuning) -> Vec<EntityId> {
        self.fill_to(world, rng, tuning, 0.0)
    }

    /// Place platforms until the next one would sit above `ceiling`
    pub fn fill_to(
        &mut self,
        world: &mut World,
        rng: &mut Pcg32,
        tuning: &Tuning,
        ceiling: f32,
    ) -> Vec<EntityId> {
        let mut placed = Vec::new();
        if tuning.min_v_jump_distance <= 0.0 {
            return placed;
        }
        while self.highest_y - tuning.min_v_jump_distance >= ceiling {
            placed.push(self.place_platform(world, rng, tuning));
        }
        placed
    }

    /// Keep one platform pre-generated above the viewport and refresh the raven batch.
    /// Returns the number of ravens spawned.
    pub fn extend(&mut self, world: &mut World, rng: &mut Pcg32, tuning: &Tuning, score: u32) -> usize {
        let placed = self.fill_to(world, rng, tuning, -tuning.min_v_jump_distance);
        if placed.is_empty() {
            return 0;
        }
        self.refresh_ravens(world, rng, tuning, score)
    }

    /// Move the cursor along with a camera shift
    pub fn shift(&mut self, dy: f32) {
        self.highest_y += dy;
    }

    /// Respawn the raven batch when the score tier changed or the last batch is gone.
    ///
    /// Unlike a respawn on every generation call, a live batch survives
    /// extends within the same tier, so ravens do not teleport each time a
    /// platform is added. The batch is spawned once per call; the old batch
    /// is removed first.
    pub fn refresh_ravens(&mut self, world: &mut World, rng: &mut Pcg32, tuning: &Tuning, score: u32) -> usize {
        let tier = raven_count(score, tuning.raven_score_step);
        if tier == 0 {
            return 0;
        }
        if tier == self.raven_tier && world.count(Category::Raven) > 0 {
            return 0;
        }

        world.clear_category(Category::Raven);
        for _ in 0..tier {
            let x = rng.random_range(0.0..=(tuning.screen_width - tuning.raven_size.x).max(0.0));
            let y = self.highest_y - rng.random_range(0.0..=tuning.min_v_jump_distance);
            let speed = if tuning.raven_max_speed > tuning.raven_min_speed {
                rng.random_range(tuning.raven_min_speed..=tuning.raven_max_speed)
            } else {
                tuning.raven_min_speed
            };
            let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            world.spawn(
                Category::Raven,
                Vec2::new(x, y),
                tuning.raven_size,
                Body::Hazard {
                    vel: Vec2::new(speed * dir, 0.0),
                },
            );
        }
        self.raven_tier = tier;
        log::info!("Spawned {tier} ravens at score {score}");
        tier as usize
    }
}

/// Number of ravens in a batch for the given score
pub fn raven_count(score: u32, step: u32) -> u32 {
    if step == 0 { 0 } else { score / step }
}

/// Spawn the full-width floor at the bottom of the screen
pub fn spawn_floor(world: &mut World, tuning: &Tuning) -> EntityId {
    world.spawn(
        Category::Floor,
        Vec2::new(0.0, tuning.floor_top()),
        Vec2::new(tuning.screen_width, tuning.floor_height),
        Body::Static { collected: false },
    )
}

fn clamp_platform_x(x: f32, tuning: &Tuning) -> f32 {
    x.clamp(0.0, (tuning.screen_width - tuning.platform_size.x).max(0.0))
}

/// Open range of platform x values that overlap the spawned player's column
fn fall_lane(tuning: &Tuning) -> (f32, f32) {
    (
        tuning.spawn.x - tuning.platform_size.x,
        tuning.spawn.x + tuning.player_size.x,
    )
}

/// Uniform x in `[lo, hi]` that avoids the open range `(left, right)`.
///
/// Falls back to the whole window when the lane covers it.
fn sample_outside(rng: &mut Pcg32, lo: f32, hi: f32, left: f32, right: f32) -> f32 {
    let below = (lo <= left).then(|| (lo, hi.min(left)));
    let above = (right <= hi).then(|| (lo.max(right), hi));

    match (below, above) {
        (Some((a, b)), Some((c, d))) => {
            let total = (b - a) + (d - c);
            if total <= 0.0 {
                return if rng.random_bool(0.5) { a } else { c };
            }
            let t = rng.random_range(0.0..=total);
            if t <= b - a { a + t } else { c + (t - (b - a)) }
        }
        (Some((a, b)), None) | (None, Some((a, b))) => {
            if b > a { rng.random_range(a..=b) } else { a }
        }
        (None, None) => {
            if hi > lo { rng.random_range(lo..=hi) } else { lo }
        }
    }
}
