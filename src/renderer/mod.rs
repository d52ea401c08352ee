//! Rendering module
//!
//! `sprite` holds the pure frame-selection logic; `canvas` draws through the
//! browser's Canvas2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod sprite;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use sprite::{Animator, SpriteSheet};

/// Directory assets are served from, relative to the page
pub const ASSET_DIR: &str = "assets";

/// Image assets
pub mod assets {
    pub const BACKGROUND: &str = "moon_background.png";
    pub const FLOOR: &str = "floor.png";
    pub const METEOR: &str = "meteor_1.png";
    pub const DINO_IDLE: &str = "dino_idle.png";
    pub const DINO_WALK: &str = "dino_walk.png";
    pub const DINO_JUMP: &str = "dino_jump.png";
}

/// Edge length of one frame in the dino sprite sheets
pub const DINO_FRAME_SIZE: f32 = 32.0;

/// Resolve an asset name to the path the page loads it from
pub fn asset_path(name: &str) -> String {
    format!("{}/{}", ASSET_DIR, name)
}
