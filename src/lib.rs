//! Moon Dino - a side-scrolling meteor dodging runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, obstacles, session state)
//! - `clock`: Fixed timestep accumulator driven by display refresh timestamps
//! - `game`: Loop driver wiring the simulation to the platform collaborators
//! - `renderer`: Sprite animation and the Canvas2D surface
//! - `platform`: Browser/native abstraction (surface, audio, storage, input)
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod clock;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use clock::FixedStepClock;
pub use game::Game;
pub use highscores::Highscore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed simulation timestep in milliseconds (display refresh timestamps are ms)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Largest frame delta fed into the accumulator (tab switches, breakpoints)
    pub const MAX_FRAME_DELTA_MS: f64 = 250.0;

    /// Logical canvas resolution
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Height of the ground strip below the floor line
    pub const FLOOR_HEIGHT: f32 = 100.0;
    /// Top edge of the floor; players stand on it and obstacles roll along it
    pub const FLOOR_TOP: f32 = CANVAS_HEIGHT - FLOOR_HEIGHT;

    /// Number of recycled obstacles in the pool
    pub const OBSTACLE_COUNT: usize = 3;
    /// Horizontal spacing between the initial obstacle spawn points
    pub const OBSTACLE_SPACING: f32 = 150.0;

    /// Score interval between obstacle speed increases
    pub const SPEED_UP_EVERY: u32 = 10;
    /// Initial speed-escalation watermark (so the first check fires at score 0)
    pub const SPEED_WATERMARK_START: i64 = -(SPEED_UP_EVERY as i64);
}
