//! Game loop driver
//!
//! Owns the session plus its collaborators and turns display refresh
//! timestamps into fixed simulation steps. Every step is followed by a render,
//! and the events a step raised are forwarded to audio and storage.

use crate::clock::FixedStepClock;
use crate::consts::SIM_DT;
use crate::highscores::{load_highscore, save_highscore};
use crate::persistence::KeyValueStore;
use crate::platform::{Audio, InputState, Surface};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, tick};
use crate::tuning::Tuning;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Game instance holding all state
pub struct Game<S: Surface, A: Audio, K: KeyValueStore> {
    pub state: GameState,
    pub input: InputState,
    pub settings: Settings,
    pub surface: S,
    pub audio: A,
    pub store: K,
    clock: FixedStepClock,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl<S: Surface, A: Audio, K: KeyValueStore> Game<S, A, K> {
    /// Build a session in the menu, restoring highscore and settings from `store`
    pub fn new(seed: u64, tuning: Tuning, surface: S, mut audio: A, store: K) -> Self {
        let highscore = load_highscore(&store);
        let settings = Settings::load(&store);
        audio.apply_settings(&settings);
        Self {
            state: GameState::new(seed, tuning, highscore),
            input: InputState::default(),
            settings,
            surface,
            audio,
            store,
            clock: FixedStepClock::default(),
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Handle one display refresh; returns the number of steps run
    pub fn frame(&mut self, timestamp_ms: f64) -> u32 {
        self.track_fps(timestamp_ms);

        let steps = self.clock.advance(timestamp_ms);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    /// One simulation step followed by a render
    pub fn step(&mut self) {
        if std::mem::take(&mut self.input.mute) {
            self.toggle_mute();
        }

        let input = self.input.snapshot();
        tick(&mut self.state, &input, SIM_DT);
        self.input.clear_one_shots();

        self.handle_events();
        self.render();
    }

    /// Forward what happened during the last tick to the collaborators
    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::SessionStarted => self.audio.play_background_music(),
                GameEvent::Jumped => self.audio.play_jump_sound(),
                GameEvent::GameOver {
                    score,
                    new_highscore,
                } => {
                    self.audio.play_death_sound();
                    self.audio.stop_background_music();
                    if new_highscore {
                        if let Err(e) = save_highscore(&mut self.store, score) {
                            log::warn!("Failed to save highscore: {}", e);
                        }
                    }
                }
                GameEvent::Paused => log::info!("Paused"),
                GameEvent::Resumed => log::info!("Resumed"),
                GameEvent::Scored { .. } => self.audio.play_score_sound(),
                // The bump at score 0 is part of starting a session, not a cue
                GameEvent::SpeedUp if self.state.score > 0 => self.audio.play_speed_up_sound(),
                GameEvent::SpeedUp => {}
            }
        }
    }

    fn render(&mut self) {
        self.surface.clear();
        self.surface.draw_background();
        self.surface.draw_score(self.state.score, self.state.highscore);

        match self.state.phase {
            GamePhase::Menu => self.surface.show_start_screen(None),
            GamePhase::GameOver => self.surface.show_start_screen(Some(self.state.score)),
            GamePhase::Playing => {
                self.audio.play_background_music();
                self.draw_scene(SIM_DT);
            }
            GamePhase::Paused => {
                // Frozen scene; the animation does not advance either
                self.draw_scene(0.0);
                self.surface.show_pause_overlay();
            }
        }

        if self.settings.show_fps {
            self.surface.draw_fps(self.fps);
        }
    }

    fn draw_scene(&mut self, dt: f32) {
        for rect in self.state.obstacles.rects() {
            self.surface.draw_obstacle(rect);
        }
        self.surface.draw_player(&self.state.player, dt);
    }

    fn track_fps(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample is the one about to be overwritten
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    /// The page lost focus: drop held keys and pause a running game
    pub fn focus_lost(&mut self) {
        self.input.release_all();
        if self.settings.pause_on_blur && self.state.is_active() {
            self.input.pause = true;
            log::info!("Auto-paused (focus lost)");
        }
    }

    /// The page became visible again; don't replay the time spent hidden
    pub fn resume_clock(&mut self) {
        self.clock.reset();
    }

    /// Replace the preferences, apply them and persist them
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.audio.apply_settings(&self.settings);
        self.settings.save(&mut self.store);
    }

    fn toggle_mute(&mut self) {
        let settings = Settings {
            muted: !self.settings.muted,
            ..self.settings.clone()
        };
        log::info!("Muted: {}", settings.muted);
        self.update_settings(settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT_MS;
    use crate::highscores::STORAGE_KEY;
    use crate::persistence::MemoryStore;
    use crate::platform::{NullSurface, SilentAudio};

    type TestGame = Game<NullSurface, SilentAudio, MemoryStore>;

    fn game_with_store(store: MemoryStore) -> TestGame {
        Game::new(
            42,
            Tuning::default(),
            NullSurface::default(),
            SilentAudio::default(),
            store,
        )
    }

    fn game() -> TestGame {
        game_with_store(MemoryStore::new())
    }

    fn started() -> TestGame {
        let mut game = game();
        game.input.start = true;
        game.step();
        // Let the player settle on the floor
        for _ in 0..3 {
            game.step();
        }
        game
    }

    /// Put a meteor right on top of the player
    fn force_collision(game: &mut TestGame) {
        game.state.obstacles.xs[0] = game.state.player.pos.x + 5.0;
    }

    #[test]
    fn test_restores_highscore() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"highscore":23}"#).unwrap();
        let game = game_with_store(store);
        assert_eq!(game.state.highscore, 23);
        assert_eq!(game.state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_frames_drive_fixed_steps() {
        let mut game = game();
        assert_eq!(game.frame(1000.0), 0);

        let mut steps = 0;
        let mut t = 1000.0;
        for _ in 0..60 {
            t += 1000.0 / 60.0;
            steps += game.frame(t);
        }
        assert!((59..=61).contains(&steps), "steps = {steps}");
        assert_eq!(game.surface.frames, u64::from(steps));
    }

    #[test]
    fn test_long_pause_is_clamped() {
        let mut game = game();
        game.frame(0.0);
        let steps = game.frame(10_000.0);
        assert!(f64::from(steps) * SIM_DT_MS <= 250.0 + SIM_DT_MS);
    }

    #[test]
    fn test_menu_shows_start_screen_only() {
        let mut game = game();
        game.step();
        assert_eq!(game.surface.start_screens, 1);
        assert_eq!(game.surface.players_drawn, 0);
        assert_eq!(game.surface.obstacles_drawn, 0);
        assert!(!game.audio.music_playing);
    }

    #[test]
    fn test_start_plays_music_and_draws_scene() {
        let mut game = game();
        game.input.start = true;
        game.step();

        assert_eq!(game.state.phase, GamePhase::Playing);
        assert!(game.audio.music_playing);
        assert_eq!(game.audio.music_starts, 1);
        assert_eq!(game.surface.players_drawn, 1);
        assert_eq!(game.surface.obstacles_drawn, 3);
        // One-shot consumed
        assert!(!game.input.start);

        game.step();
        assert_eq!(game.audio.music_starts, 1);
    }

    #[test]
    fn test_jump_plays_sound() {
        let mut game = started();
        game.input.key_down(" ");
        game.step();
        assert_eq!(game.audio.jumps, 1);
        assert!(!game.state.player.on_ground);
    }

    #[test]
    fn test_game_over_persists_new_highscore() {
        let mut game = started();
        game.state.score = 5;
        force_collision(&mut game);
        game.step();

        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert_eq!(game.audio.deaths, 1);
        assert!(!game.audio.music_playing);
        assert_eq!(load_highscore(&game.store), 5);
        assert_eq!(game.surface.start_screens, 1);

        // Stays over until started again
        game.step();
        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert_eq!(game.audio.deaths, 1);
    }

    #[test]
    fn test_lower_score_is_not_saved() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"highscore":50}"#).unwrap();
        let mut game = game_with_store(store);
        game.input.start = true;
        game.step();

        game.state.score = 5;
        force_collision(&mut game);
        game.step();
        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert_eq!(load_highscore(&game.store), 50);
    }

    #[test]
    fn test_save_failure_keeps_running() {
        let mut game = started();
        game.store.read_only = true;
        game.state.score = 8;
        force_collision(&mut game);
        game.step();

        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert_eq!(game.state.highscore, 8);
        assert_eq!(load_highscore(&game.store), 0);

        game.input.start = true;
        game.step();
        assert_eq!(game.state.phase, GamePhase::Playing);
        assert_eq!(game.state.score, 0);
    }

    #[test]
    fn test_pause_freezes_and_overlays() {
        let mut game = started();
        game.input.pause = true;
        game.step();
        assert_eq!(game.state.phase, GamePhase::Paused);

        let xs = game.state.obstacles.xs;
        for _ in 0..10 {
            game.step();
        }
        assert_eq!(game.state.obstacles.xs, xs);
        assert_eq!(game.surface.pause_overlays, 11);

        game.input.pause = true;
        game.step();
        assert_eq!(game.state.phase, GamePhase::Playing);
        assert_ne!(game.state.obstacles.xs, xs);
    }

    #[test]
    fn test_focus_lost_pauses_and_releases_keys() {
        let mut game = started();
        game.input.key_down("d");
        game.focus_lost();
        assert!(!game.input.right);
        game.step();
        assert_eq!(game.state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_focus_lost_respects_setting() {
        let mut game = started();
        game.settings.pause_on_blur = false;
        game.focus_lost();
        game.step();
        assert_eq!(game.state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_settings_persist() {
        let mut game = game();
        game.update_settings(Settings {
            show_fps: true,
            ..Default::default()
        });
        assert!(Settings::load(&game.store).show_fps);
    }

    #[test]
    fn test_saved_settings_reach_audio() {
        let mut store = MemoryStore::new();
        Settings {
            muted: true,
            ..Default::default()
        }
        .save(&mut store);
        let game = game_with_store(store);
        assert_eq!(game.audio.sfx_volume, 0.0);
    }

    #[test]
    fn test_mute_key_silences_and_persists() {
        let mut game = started();
        let loud = game.audio.sfx_volume;
        assert!(loud > 0.0);

        game.input.key_down("m");
        game.step();
        assert!(game.settings.muted);
        assert_eq!(game.audio.sfx_volume, 0.0);
        assert!(Settings::load(&game.store).muted);
        assert!(!game.input.mute);

        game.input.key_down("m");
        game.step();
        assert!(!game.settings.muted);
        assert_eq!(game.audio.sfx_volume, loud);
    }

    #[test]
    fn test_score_and_speed_up_cues() {
        let mut game = started();
        // Session start bump is not a cue
        assert_eq!(game.audio.speed_ups, 0);

        game.state.score = 9;
        let size = game.state.obstacles.size;
        game.state.obstacles.xs = [-size + 0.1, 2000.0, 2000.0];
        game.step();

        assert_eq!(game.state.score, 10);
        assert_eq!(game.audio.scores, 1);
        // Escalation runs before the score lands, so the cue comes a step later
        game.step();
        assert_eq!(game.audio.speed_ups, 1);
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut game = game();
        game.input.start = true;
        game.input.key_down("i");
        for _ in 0..60 * 30 {
            game.step();
            if game.state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert!(game.state.score > 0);
        assert!(game.audio.jumps > 0);
    }
}
