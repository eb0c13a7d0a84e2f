//! Collision detection and response for the player
//!
//! Surfaces are one-way: the player lands on a floor or platform only while
//! falling (or resting) and only if its feet were at or above the surface
//! top on the previous tick. Ravens are tested on plain overlap.

use super::aabb::Aabb;
use super::world::{Body, Category, Entity, EntityId, World};

/// Slack allowed between the previous foot position and a surface top
pub const LANDING_TOLERANCE: f32 = 1.0;

/// What the player ended up standing on this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Floor(EntityId),
    Platform(EntityId),
}

/// Result of resolving one tick of player collisions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Surface the player is resting on after resolution
    pub support: Option<Support>,
    /// Platform landed on for the first time this session
    pub scored: Option<EntityId>,
    /// Raven touching the player
    pub hazard: Option<EntityId>,
}

/// Check whether a falling box lands on a surface this tick
pub fn lands_on(player: &Aabb, vel_y: f32, surface: &Aabb) -> bool {
    if vel_y < 0.0 || !player.overlaps_x(surface) {
        return false;
    }
    let prev_bottom = player.bottom() - vel_y;
    player.bottom() >= surface.top() && prev_bottom <= surface.top() + LANDING_TOLERANCE
}

/// Pick the surface the player lands on among `candidates`.
///
/// Several surfaces can qualify in one tick; the highest top wins and ties
/// go to the lowest id so the result never depends on storage order.
pub fn landing_surface<'a>(
    player: &Aabb,
    vel_y: f32,
    candidates: impl Iterator<Item = &'a Entity>,
) -> Option<&'a Entity> {
    candidates
        .filter(|surface| lands_on(player, vel_y, &surface.aabb()))
        .min_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        })
}

/// Resolve the player against floors, then platforms, then ravens.
///
/// Landing snaps the player's bottom edge to the surface top, zeroes the
/// vertical velocity and sets the grounded flag. The first landing on a
/// platform marks it collected and reports it in `scored`. A missing player
/// id resolves to an empty outcome.
pub fn resolve(world: &mut World, player_id: EntityId) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    let Some(mut player) = world.get(player_id).cloned() else {
        return outcome;
    };
    let Body::Kinematic { mut vel, .. } = player.body else {
        return outcome;
    };

    let player_box = player.aabb();
    let landing = landing_surface(&player_box, vel.y, world.iter_category(Category::Floor))
        .map(|floor| (Support::Floor(floor.id), floor.pos.y))
        .or_else(|| {
            landing_surface(&player_box, vel.y, world.iter_category(Category::Platform))
                .map(|platform| (Support::Platform(platform.id), platform.pos.y))
        });

    let on_ground = match landing {
        Some((support, top)) => {
            player.pos.y = top - player.size.y;
            vel.y = 0.0;
            outcome.support = Some(support);
            true
        }
        None => false,
    };
    player.body = Body::Kinematic { vel, on_ground };

    if let Some(Support::Platform(id)) = outcome.support {
        if let Some(platform) = world.get_mut(id) {
            if let Body::Static { ref mut collected } = platform.body {
                if !*collected {
                    *collected = true;
                    outcome.scored = Some(id);
                }
            }
        }
    }

    let player_box = player.aabb();
    outcome.hazard = world
        .iter_category(Category::Raven)
        .find(|raven| raven.aabb().overlaps(&player_box))
        .map(|raven| raven.id);

    if let Some(slot) = world.get_mut(player_id) {
        *slot = player;
    }
    outcome
}
