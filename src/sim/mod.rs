//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per frame tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{
    GameEvent, GameState, OBSTACLE_KINDS, Obstacle, ObstacleKind, ObstacleView, PlayerCar,
    PlayerView, RenderSnapshot, SessionPhase, Steer,
};
pub use tick::{spawn_obstacle, tick};
