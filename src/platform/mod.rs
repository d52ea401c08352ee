//! Platform abstraction layer
//!
//! The game loop only talks to the outside world through these traits:
//! - `Surface`: drawing on the 800×600 logical canvas
//! - `Audio`: fire-and-forget sound
//! - input state mapping (see `input`)
//! - storage (see `crate::persistence`)

pub mod headless;
pub mod input;

pub use headless::{NullSurface, SilentAudio};
pub use input::{Action, InputState};

use crate::settings::Settings;
use crate::sim::{Player, Rect};

/// Drawing surface
///
/// Implementations skip anything whose assets are not loaded yet.
pub trait Surface {
    fn clear(&mut self);
    /// Sky backdrop and floor strip
    fn draw_background(&mut self);
    fn draw_obstacle(&mut self, rect: Rect);
    /// Draw the player, advancing its animation by `dt` seconds
    fn draw_player(&mut self, player: &Player, dt: f32);
    fn draw_score(&mut self, score: u32, highscore: u32);
    fn draw_fps(&mut self, fps: u32);
    /// Start menu; `last_score` is set after a game over
    fn show_start_screen(&mut self, last_score: Option<u32>);
    fn show_pause_overlay(&mut self);
}

/// Sound collaborator
pub trait Audio {
    /// Start the background loop (no-op while it is already playing)
    fn play_background_music(&mut self);
    fn stop_background_music(&mut self);
    fn play_jump_sound(&mut self);
    fn play_death_sound(&mut self);
    /// Short blip when meteors are recycled
    fn play_score_sound(&mut self);
    fn play_speed_up_sound(&mut self);
    /// Pick up changed volume or mute preferences
    fn apply_settings(&mut self, settings: &Settings);
}
