//! Sprite sheet slicing and animation frame selection

use serde::{Deserialize, Serialize};

use crate::sim::{AnimState, Rect};

/// Seconds each animation frame stays on screen
pub const FRAME_DURATION: f32 = 0.1;

/// Grid of equally sized frames laid out row-major in one image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub frame_width: f32,
    pub frame_height: f32,
    pub sheet_width: f32,
    pub sheet_height: f32,
}

impl SpriteSheet {
    pub fn new(frame_width: f32, frame_height: f32, sheet_width: f32, sheet_height: f32) -> Self {
        Self {
            frame_width,
            frame_height,
            sheet_width,
            sheet_height,
        }
    }

    fn columns(&self) -> usize {
        if self.frame_width <= 0.0 {
            return 0;
        }
        (self.sheet_width / self.frame_width).floor() as usize
    }

    fn rows(&self) -> usize {
        if self.frame_height <= 0.0 {
            return 0;
        }
        (self.sheet_height / self.frame_height).floor() as usize
    }

    /// Number of whole frames in the sheet (partial frames at the edges are ignored)
    pub fn frame_count(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Source rect of a frame; the index wraps around the frame count
    pub fn frame_rect(&self, index: usize) -> Option<Rect> {
        let count = self.frame_count();
        if count == 0 {
            return None;
        }
        let index = index % count;
        let columns = self.columns();
        let col = index % columns;
        let row = index / columns;
        Some(Rect::new(
            col as f32 * self.frame_width,
            row as f32 * self.frame_height,
            self.frame_width,
            self.frame_height,
        ))
    }
}

/// Picks the animation frame for the player's state over time
#[derive(Debug, Clone, Default)]
pub struct Animator {
    state: AnimState,
    timer: f32,
    frame: usize,
}

impl Animator {
    /// Advance the animation; switching state restarts at the first frame
    pub fn update(&mut self, state: AnimState, dt: f32) {
        if state != self.state {
            self.state = state;
            self.timer = 0.0;
            self.frame = 0;
            return;
        }
        self.timer += dt;
        while self.timer >= FRAME_DURATION {
            self.timer -= FRAME_DURATION;
            self.frame = self.frame.wrapping_add(1);
        }
    }

    pub fn state(&self) -> AnimState {
        self.state
    }

    /// Current frame index for an animation with `frame_count` frames
    pub fn frame_index(&self, frame_count: usize) -> usize {
        if frame_count == 0 {
            0
        } else {
            self.frame % frame_count
        }
    }
}
