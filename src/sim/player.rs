//! The player's dino
//!
//! Position is the top-left corner of a square hitbox. Velocity is in px/s in
//! screen space, so a rising player has a negative `vel.y`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Animation state, derived every tick from velocity and grounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    Idle,
    Walking,
    Jumping,
}

/// Horizontal facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Movement intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hitbox edge length
    pub size: f32,
    /// Horizontal speed (px/s)
    pub speed: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Launch velocity of a jump (px/s, upward)
    pub jump_velocity: f32,
    pub on_ground: bool,
    pub state: AnimState,
    pub facing: Facing,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let (x, y) = tuning.spawn_pos();
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: tuning.player_size,
            speed: tuning.player_speed,
            gravity: tuning.gravity,
            jump_velocity: tuning.jump_velocity,
            on_ground: false,
            state: AnimState::Idle,
            facing: Facing::Right,
        }
    }

    /// Put the player back at a spawn pose, motionless and not yet grounded
    pub fn reset(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::ZERO;
        self.on_ground = false;
        self.state = AnimState::Idle;
    }

    /// Hitbox for collision queries
    pub fn bounding_rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Advance the player by one tick
    ///
    /// Left wins over right. A jump only launches from the ground. Gravity is
    /// applied after the position update, so it shows up on the next tick.
    /// Returns true if a jump launched this tick.
    pub fn step(&mut self, input: &MoveInput, floor_top: f32, max_x: f32, dt: f32) -> bool {
        // Horizontal
        self.vel.x = if input.left && self.pos.x > 0.0 {
            -self.speed
        } else if input.right && self.pos.x <= max_x {
            self.speed
        } else {
            0.0
        };

        // Vertical impulse
        let jumped = input.jump && self.on_ground;
        if jumped {
            self.vel.y = -self.jump_velocity;
            self.on_ground = false;
        }

        // Integrate
        self.pos += self.vel * dt;
        self.vel.y += self.gravity * dt;

        // Ground clamp
        let rest_y = floor_top - self.size;
        if self.pos.y >= rest_y {
            self.pos.y = rest_y;
            self.vel.y = 0.0;
            self.on_ground = true;
        }

        if self.vel.x < 0.0 {
            self.facing = Facing::Left;
        } else if self.vel.x > 0.0 {
            self.facing = Facing::Right;
        }

        let moving = self.vel.x != 0.0;
        self.state = if jumped {
            AnimState::Jumping
        } else if self.on_ground {
            if moving {
                AnimState::Walking
            } else {
                AnimState::Idle
            }
        } else if self.state == AnimState::Jumping {
            AnimState::Jumping
        } else if moving {
            AnimState::Walking
        } else {
            self.state
        };

        jumped
    }
}
