//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod obstacles;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Rect, rects_overlap};
pub use obstacles::ObstacleManager;
pub use player::{AnimState, Facing, MoveInput, Player};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
