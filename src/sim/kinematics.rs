//! Per-tick motion integration
//!
//! Explicit Euler with one step per tick: velocity first, then position.
//! Gravity is derived from the grounded flag each tick rather than stored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::{Body, Entity};
use crate::tuning::Tuning;

/// Horizontal input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveIntent {
    Left,
    Right,
    #[default]
    None,
}

impl MoveIntent {
    /// Resolve held directions; both or neither held means no movement
    pub fn from_held(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => MoveIntent::Left,
            (false, true) => MoveIntent::Right,
            _ => MoveIntent::None,
        }
    }

    fn sign(self) -> f32 {
        match self {
            MoveIntent::Left => -1.0,
            MoveIntent::Right => 1.0,
            MoveIntent::None => 0.0,
        }
    }
}

/// Gravity for this tick: zero while resting on a surface
#[inline]
pub fn gravity(on_ground: bool, tuning: &Tuning) -> Vec2 {
    if on_ground {
        Vec2::ZERO
    } else {
        Vec2::new(0.0, tuning.gravity)
    }
}

/// Advance a kinematic entity by one tick.
///
/// A jump only fires while grounded; airborne jump requests are ignored.
/// Non-kinematic entities are left untouched.
pub fn step_player(player: &mut Entity, intent: MoveIntent, jump: bool, tuning: &Tuning) {
    let Body::Kinematic {
        ref mut vel,
        ref mut on_ground,
    } = player.body
    else {
        return;
    };

    if jump && *on_ground {
        vel.y = tuning.jump_strength;
        *on_ground = false;
    }

    vel.x = intent.sign() * tuning.horizontal_speed;
    *vel += gravity(*on_ground, tuning);

    player.pos += *vel;
    player.pos.x = player
        .pos
        .x
        .clamp(0.0, (tuning.screen_width - player.size.x).max(0.0));
}

/// Move a hazard along its velocity, wrapping around the screen width
pub fn step_hazard(hazard: &mut Entity, screen_width: f32) {
    let Body::Hazard { vel } = hazard.body else {
        return;
    };

    hazard.pos += vel;
    if hazard.pos.x > screen_width {
        hazard.pos.x = -hazard.size.x;
    } else if hazard.pos.x + hazard.size.x < 0.0 {
        hazard.pos.x = screen_width;
    }
}

/// Height gained by a jump before the player starts falling
pub fn jump_apex(jump_strength: f32, gravity: f32) -> f32 {
    if gravity <= 0.0 || jump_strength >= 0.0 {
        return 0.0;
    }
    let mut vy = jump_strength;
    let mut height = 0.0;
    loop {
        vy += gravity;
        if vy >= 0.0 {
            return height;
        }
        height -= vy;
    }
}

/// Horizontal distance covered while jumping onto a surface `rise` pixels
/// above the launch point (the airtime until the feet come back down to it).
pub fn horizontal_reach(tuning: &Tuning, rise: f32) -> f32 {
    const MAX_AIRTIME_TICKS: u32 = 10_000;

    if jump_apex(tuning.jump_strength, tuning.gravity) < rise {
        return 0.0;
    }

    let mut vy = tuning.jump_strength;
    let mut height = 0.0;
    let mut ticks = 0;
    while ticks < MAX_AIRTIME_TICKS {
        vy += tuning.gravity;
        height -= vy;
        ticks += 1;
        if vy > 0.0 && height <= rise {
            break;
        }
    }
    ticks as f32 * tuning.horizontal_speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Category;

    fn player(on_ground: bool) -> Entity {
        Entity {
            id: 1,
            category: Category::Player,
            pos: Vec2::new(400.0, 400.0),
            size: Vec2::splat(40.0),
            body: Body::Kinematic {
                vel: Vec2::ZERO,
                on_ground,
            },
        }
    }

    #[test]
    fn test_gravity_accumulates_while_airborne() {
        let tuning = Tuning::default();
        let mut p = player(false);
        step_player(&mut p, MoveIntent::None, false, &tuning);
        assert_eq!(p.vel().y, 0.5);
        assert_eq!(p.pos.y, 400.5);
        step_player(&mut p, MoveIntent::None, false, &tuning);
        assert_eq!(p.vel().y, 1.0);
        assert_eq!(p.pos.y, 401.5);
    }

    #[test]
    fn test_no_gravity_while_grounded() {
        let tuning = Tuning::default();
        let mut p = player(true);
        step_player(&mut p, MoveIntent::None, false, &tuning);
        assert_eq!(p.vel().y, 0.0);
        assert_eq!(p.pos.y, 400.0);
    }

    #[test]
    fn test_horizontal_is_instant() {
        let tuning = Tuning::default();
        let mut p = player(true);
        step_player(&mut p, MoveIntent::Right, false, &tuning);
        assert_eq!(p.vel().x, tuning.horizontal_speed);
        assert_eq!(p.pos.x, 405.0);
        step_player(&mut p, MoveIntent::None, false, &tuning);
        assert_eq!(p.vel().x, 0.0);
        assert_eq!(p.pos.x, 405.0);
        step_player(&mut p, MoveIntent::Left, false, &tuning);
        assert_eq!(p.vel().x, -tuning.horizontal_speed);
    }

    #[test]
    fn test_jump_from_ground() {
        let tuning = Tuning::default();
        let mut p = player(true);
        step_player(&mut p, MoveIntent::None, true, &tuning);
        assert!(!p.on_ground());
        // Jump sets -10, then airborne gravity applies in the same tick
        assert_eq!(p.vel().y, -9.5);
        assert_eq!(p.pos.y, 390.5);
    }

    #[test]
    fn test_airborne_jump_ignored() {
        let tuning = Tuning::default();
        let mut p = player(false);
        p.body = Body::Kinematic {
            vel: Vec2::new(0.0, 3.0),
            on_ground: false,
        };
        step_player(&mut p, MoveIntent::None, true, &tuning);
        // Only gravity changed velocity
        assert_eq!(p.vel().y, 3.5);
    }

    #[test]
    fn test_player_clamped_to_screen() {
        let tuning = Tuning::default();
        let mut p = player(true);
        p.pos.x = 2.0;
        step_player(&mut p, MoveIntent::Left, false, &tuning);
        assert_eq!(p.pos.x, 0.0);
        p.pos.x = tuning.screen_width - p.size.x - 1.0;
        step_player(&mut p, MoveIntent::Right, false, &tuning);
        assert_eq!(p.pos.x, tuning.screen_width - p.size.x);
    }

    #[test]
    fn test_hazard_wraps() {
        let mut raven = Entity {
            id: 2,
            category: Category::Raven,
            pos: Vec2::new(799.0, 100.0),
            size: Vec2::new(40.0, 30.0),
            body: Body::Hazard {
                vel: Vec2::new(3.0, 0.0),
            },
        };
        step_hazard(&mut raven, 800.0);
        assert_eq!(raven.pos.x, -40.0);

        raven.body = Body::Hazard {
            vel: Vec2::new(-3.0, 0.0),
        };
        raven.pos.x = -38.0;
        step_hazard(&mut raven, 800.0);
        assert_eq!(raven.pos.x, 800.0);
    }

    #[test]
    fn test_step_ignores_static() {
        let tuning = Tuning::default();
        let mut platform = player(false);
        platform.body = Body::Static { collected: false };
        let before = platform.clone();
        step_player(&mut platform, MoveIntent::Right, true, &tuning);
        step_hazard(&mut platform, 800.0);
        assert_eq!(platform, before);
    }

    #[test]
    fn test_jump_apex() {
        assert_eq!(jump_apex(-10.0, 0.5), 95.0);
        assert_eq!(jump_apex(10.0, 0.5), 0.0);
    }

    #[test]
    fn test_horizontal_reach_default() {
        let tuning = Tuning::default();
        let reach = horizontal_reach(&tuning, tuning.min_v_jump_distance);
        assert_eq!(reach, 140.0);
        assert_eq!(horizontal_reach(&tuning, 500.0), 0.0);
    }
}
