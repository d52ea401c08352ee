//! Headless collaborators for native builds and tests
//!
//! They draw and play nothing, but keep enough bookkeeping to observe what the
//! loop asked for.

use super::{Audio, Surface};
use crate::renderer::Animator;
use crate::settings::Settings;
use crate::sim::{Player, Rect};

/// Surface that records draw calls instead of drawing
#[derive(Debug, Default)]
pub struct NullSurface {
    /// Number of `clear` calls (one per rendered step)
    pub frames: u64,
    pub obstacles_drawn: u64,
    pub players_drawn: u64,
    pub start_screens: u64,
    pub pause_overlays: u64,
    pub last_score: Option<(u32, u32)>,
    pub last_player_rect: Option<Rect>,
    /// Animation frame picked for the last drawn player
    pub last_player_frame: Option<usize>,
    pub animator: Animator,
}

impl Surface for NullSurface {
    fn clear(&mut self) {
        self.frames += 1;
    }

    fn draw_background(&mut self) {}

    fn draw_obstacle(&mut self, _rect: Rect) {
        self.obstacles_drawn += 1;
    }

    fn draw_player(&mut self, player: &Player, dt: f32) {
        self.animator.update(player.state, dt);
        self.players_drawn += 1;
        self.last_player_rect = Some(player.bounding_rect());
        self.last_player_frame = Some(self.animator.frame_index(4));
    }

    fn draw_score(&mut self, score: u32, highscore: u32) {
        self.last_score = Some((score, highscore));
    }

    fn draw_fps(&mut self, _fps: u32) {}

    fn show_start_screen(&mut self, _last_score: Option<u32>) {
        self.start_screens += 1;
    }

    fn show_pause_overlay(&mut self) {
        self.pause_overlays += 1;
    }
}

/// Audio sink that counts requests
#[derive(Debug, Default)]
pub struct SilentAudio {
    pub music_playing: bool,
    /// Times the music actually (re)started
    pub music_starts: u32,
    pub jumps: u32,
    pub deaths: u32,
    pub scores: u32,
    pub speed_ups: u32,
    /// Effect volume from the last applied settings
    pub sfx_volume: f32,
}

impl Audio for SilentAudio {
    fn play_background_music(&mut self) {
        if !self.music_playing {
            self.music_playing = true;
            self.music_starts += 1;
            log::debug!("Background music started");
        }
    }

    fn stop_background_music(&mut self) {
        self.music_playing = false;
    }

    fn play_jump_sound(&mut self) {
        self.jumps += 1;
    }

    fn play_death_sound(&mut self) {
        self.deaths += 1;
    }

    fn play_score_sound(&mut self) {
        self.scores += 1;
    }

    fn play_speed_up_sound(&mut self) {
        self.speed_ups += 1;
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
    }
}
