//! Session state and game phase transitions
//!
//! `GameState` is the session controller: it owns score, highscore, phase and
//! obstacle speed, and drives the player and obstacle pool.

use serde::{Deserialize, Serialize};

use super::obstacles::ObstacleManager;
use super::player::Player;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing played yet
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended by a collision, start screen shown again
    GameOver,
}

/// Something that happened during a tick, for audio/persistence/UI to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new session began
    SessionStarted,
    /// The player launched a jump
    Jumped,
    /// Obstacles were recycled past the left edge
    Scored { points: u32 },
    /// Obstacle speed increased
    SpeedUp,
    Paused,
    Resumed,
    /// The player hit an obstacle
    GameOver { score: u32, new_highscore: bool },
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed of the obstacle respawn generator
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u32,
    pub highscore: u32,
    /// Session obstacle speed (px/s), mirrored into the obstacle pool
    pub obstacle_speed: f32,
    /// Score at which the obstacle speed last increased
    pub last_speed_increase_score: i64,
    /// Simulation tick counter (active ticks only)
    pub time_ticks: u64,
    pub player: Player,
    pub obstacles: ObstacleManager,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session sitting in the menu
    pub fn new(seed: u64, tuning: Tuning, highscore: u32) -> Self {
        let obstacles = ObstacleManager::new(
            CANVAS_WIDTH,
            tuning.obstacle_size,
            FLOOR_TOP,
            tuning.obstacle_start_speed,
            seed,
        );
        Self {
            seed,
            phase: GamePhase::Menu,
            score: 0,
            highscore,
            obstacle_speed: tuning.obstacle_start_speed,
            last_speed_increase_score: SPEED_WATERMARK_START,
            time_ticks: 0,
            player: Player::new(&tuning),
            obstacles,
            events: Vec::new(),
            tuning,
        }
    }

    /// True while a run is in progress and not paused
    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Reset everything session-scoped and start playing
    pub fn start_new_game(&mut self) {
        let (x, y) = self.tuning.spawn_pos();
        self.player.reset(x, y);
        self.obstacles.reset();
        // Every session replays the same meteor stream for a given seed
        self.obstacles.reseed(self.seed);
        self.score = 0;
        self.obstacle_speed = self.tuning.obstacle_start_speed;
        self.obstacles.set_speed(self.obstacle_speed);
        self.last_speed_increase_score = SPEED_WATERMARK_START;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::SessionStarted);
        log::info!("New game started (highscore {})", self.highscore);
    }

    /// Bump obstacle speed once the score crosses the next interval
    ///
    /// Runs every tick regardless of phase. A jump of several intervals at once
    /// still yields a single increase.
    pub fn escalate_speed(&mut self) {
        if i64::from(self.score) >= self.last_speed_increase_score + i64::from(SPEED_UP_EVERY) {
            self.obstacle_speed += self.tuning.obstacle_speed_step;
            self.obstacles.set_speed(self.obstacle_speed);
            self.last_speed_increase_score = i64::from(self.score);
            self.events.push(GameEvent::SpeedUp);
            log::debug!(
                "Obstacle speed {:.1} px/s at score {}",
                self.obstacle_speed,
                self.score
            );
        }
    }

    /// Toggle between Playing and Paused (ignored in other phases)
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.events.push(GameEvent::Resumed);
            }
            GamePhase::Menu | GamePhase::GameOver => {}
        }
    }

    /// End the run, recording a beaten highscore
    pub fn game_over(&mut self) {
        let new_highscore = self.score > self.highscore;
        if new_highscore {
            self.highscore = self.score;
            log::info!("New highscore: {}", self.highscore);
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_highscore,
        });
        log::info!(
            "Game over with score {} after {:.1}s",
            self.score,
            self.time_ticks as f32 * SIM_DT
        );
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
