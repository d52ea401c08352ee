//! Data-driven game balance
//!
//! All distances are logical canvas pixels, all times are seconds.

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_WIDTH, FLOOR_TOP};

/// Gameplay tuning values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player hitbox edge length
    pub player_size: f32,
    /// Player horizontal speed (px/s)
    pub player_speed: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Upward launch velocity of a jump (px/s)
    pub jump_velocity: f32,
    /// Player spawn x (spawn y is always standing on the floor)
    pub spawn_x: f32,

    /// Obstacle hitbox edge length
    pub obstacle_size: f32,
    /// Obstacle speed at the start of a session (px/s)
    pub obstacle_start_speed: f32,
    /// Obstacle speed added every speed-up interval (px/s)
    pub obstacle_speed_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 32.0,
            player_speed: 240.0,
            gravity: 1800.0,
            jump_velocity: 620.0,
            spawn_x: 50.0,

            obstacle_size: 20.0,
            obstacle_start_speed: 120.0,
            obstacle_speed_step: 30.0,
        }
    }
}

impl Tuning {
    /// Top-left corner of the player at session start
    pub fn spawn_pos(&self) -> (f32, f32) {
        (self.spawn_x, FLOOR_TOP - self.player_size)
    }

    /// Rightmost x at which the player still accepts right input
    pub fn player_max_x(&self) -> f32 {
        CANVAS_WIDTH - self.player_size * 2.0
    }

    /// Peak jump height (px) for the current gravity and launch velocity
    pub fn jump_height(&self) -> f32 {
        self.jump_velocity * self.jump_velocity / (2.0 * self.gravity)
    }

    /// Time spent airborne by a jump from the floor (s)
    pub fn airtime(&self) -> f32 {
        2.0 * self.jump_velocity / self.gravity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_jump_clears_obstacle() {
        let tuning = Tuning::default();
        assert!(tuning.jump_height() > tuning.obstacle_size * 2.0);
        // An obstacle at start speed travels less than the canvas during one jump
        assert!(tuning.airtime() * tuning.obstacle_start_speed < CANVAS_WIDTH);
    }

    #[test]
    fn test_spawn_stands_on_floor() {
        let tuning = Tuning::default();
        let (_, y) = tuning.spawn_pos();
        assert_eq!(y + tuning.player_size, FLOOR_TOP);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"gravity": 900.0}"#).unwrap();
        assert_eq!(tuning.gravity, 900.0);
        assert_eq!(tuning.player_size, Tuning::default().player_size);
    }
}
