//! Entity arena
//!
//! Every entity lives in one map keyed by a stable `EntityId`. Category
//! membership (floors, platforms, ravens, player) is kept as index sets
//! derived from the arena, so an entity is owned in exactly one place.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// Stable entity handle (never reused within a session)
pub type EntityId = u32;

/// What an entity is, for collision priority and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Player,
    Floor,
    Platform,
    Raven,
}

/// Capability tag with the fields that capability needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Body {
    /// Never moves on its own (floors, platforms)
    Static {
        /// Player already scored for landing here
        collected: bool,
    },
    /// Integrated by kinematics every tick (the player)
    Kinematic { vel: Vec2, on_ground: bool },
    /// Moves at a constant velocity and ends the run on contact (ravens)
    Hazard { vel: Vec2 },
}

/// A flat entity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub category: Category,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub body: Body,
}

impl Entity {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn vel(&self) -> Vec2 {
        match self.body {
            Body::Static { .. } => Vec2::ZERO,
            Body::Kinematic { vel, .. } | Body::Hazard { vel } => vel,
        }
    }

    pub fn on_ground(&self) -> bool {
        matches!(self.body, Body::Kinematic { on_ground: true, .. })
    }

    pub fn is_collected(&self) -> bool {
        matches!(self.body, Body::Static { collected: true })
    }
}

/// The entity arena plus per-category index views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    entities: BTreeMap<EntityId, Entity>,
    index: BTreeMap<Category, BTreeSet<EntityId>>,
    next_id: EntityId,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            index: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Insert a new entity and return its id
    pub fn spawn(&mut self, category: Category, pos: Vec2, size: Vec2, body: Body) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(
            id,
            Entity {
                id,
                category,
                pos,
                size,
                body,
            },
        );
        self.index.entry(category).or_default().insert(id);
        id
    }

    /// Remove an entity. Removing an unknown id is a no-op.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        if let Some(ids) = self.index.get_mut(&entity.category) {
            ids.remove(&id);
        }
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Snapshot of the ids in a category, in id order
    pub fn ids(&self, category: Category) -> Vec<EntityId> {
        self.index
            .get(&category)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Iterate the entities of one category in id order
    pub fn iter_category(&self, category: Category) -> impl Iterator<Item = &Entity> + '_ {
        self.index
            .get(&category)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.entities.get(id))
    }

    /// Iterate every entity in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    pub fn count(&self, category: Category) -> usize {
        self.index.get(&category).map_or(0, BTreeSet::len)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove every entity of one category
    pub fn clear_category(&mut self, category: Category) {
        for id in self.ids(category) {
            self.despawn(id);
        }
    }

    /// Remove everything. Ids keep counting up so stale handles never alias.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(world: &mut World, y: f32) -> EntityId {
        world.spawn(
            Category::Platform,
            Vec2::new(0.0, y),
            Vec2::new(70.0, 20.0),
            Body::Static { collected: false },
        )
    }

    #[test]
    fn test_spawn_indexes_by_category() {
        let mut world = World::new();
        let a = platform(&mut world, 100.0);
        let b = platform(&mut world, 200.0);
        let raven = world.spawn(
            Category::Raven,
            Vec2::ZERO,
            Vec2::new(40.0, 30.0),
            Body::Hazard { vel: Vec2::X },
        );

        assert_eq!(world.ids(Category::Platform), vec![a, b]);
        assert_eq!(world.ids(Category::Raven), vec![raven]);
        assert_eq!(world.count(Category::Floor), 0);
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn test_despawn_updates_index() {
        let mut world = World::new();
        let a = platform(&mut world, 100.0);
        assert!(world.despawn(a).is_some());
        assert!(world.despawn(a).is_none());
        assert_eq!(world.count(Category::Platform), 0);
        assert!(world.get(a).is_none());
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut world = World::new();
        let a = platform(&mut world, 100.0);
        world.clear();
        let b = platform(&mut world, 100.0);
        assert!(b > a);
        assert!(world.get(a).is_none());
    }

    #[test]
    fn test_body_accessors() {
        let mut world = World::new();
        let id = world.spawn(
            Category::Player,
            Vec2::ZERO,
            Vec2::splat(40.0),
            Body::Kinematic {
                vel: Vec2::new(1.0, 2.0),
                on_ground: true,
            },
        );
        let player = world.get(id).unwrap();
        assert!(player.on_ground());
        assert_eq!(player.vel(), Vec2::new(1.0, 2.0));
        assert!(!player.is_collected());
    }
}
