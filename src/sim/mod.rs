//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod kinematics;
pub mod level_gen;
pub mod scroll;
pub mod state;
pub mod tick;
pub mod world;

pub use aabb::Aabb;
pub use collision::{CollisionOutcome, Support, resolve};
pub use kinematics::MoveIntent;
pub use level_gen::LevelGenerator;
pub use scroll::Camera;
pub use state::{GameEvent, GameOverCause, GamePhase, GameState, HighscoreStage};
pub use tick::{TickInput, tick};
pub use world::{Body, Category, Entity, EntityId, World};
