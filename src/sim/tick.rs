//! Fixed timestep simulation tick
//!
//! Advances one session by exactly one step. Rendering, audio and storage react
//! to the `GameEvent`s left on the state.

use super::player::MoveInput;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::FLOOR_TOP;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Start a new game from the menu or game-over screen (one-shot)
    pub start: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Autopilot - jumps automatically when a meteor is close
    pub autopilot: bool,
}

impl TickInput {
    fn movement(&self) -> MoveInput {
        MoveInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.start && matches!(state.phase, GamePhase::Menu | GamePhase::GameOver) {
        state.start_new_game();
    } else if input.pause {
        state.toggle_pause();
    }

    // Unconditional, so a fresh session picks up its first bump right away
    state.escalate_speed();

    if !state.is_active() {
        return;
    }

    state.time_ticks += 1;

    let mut movement = input.movement();
    if input.autopilot {
        movement.jump |= autopilot_wants_jump(state);
    }

    let max_x = state.tuning.player_max_x();
    if state.player.step(&movement, FLOOR_TOP, max_x, dt) {
        state.events.push(GameEvent::Jumped);
    }

    let points = state.obstacles.advance(dt);
    if points > 0 {
        state.score += points;
        state.events.push(GameEvent::Scored { points });
    }

    if state.obstacles.check_collision(&state.player.bounding_rect()) {
        state.game_over();
    }
}

/// Jump when the nearest meteor ahead is about to reach the player
///
/// The lead distance centres the overlap window on the jump apex: the meteor
/// needs `(player + meteor) / speed` seconds to pass under the player.
fn autopilot_wants_jump(state: &GameState) -> bool {
    if !state.player.on_ground {
        return false;
    }
    let player_front = state.player.pos.x + state.player.size;
    let half_airtime = state.tuning.airtime() * 0.5;
    let overlap = state.player.size + state.obstacles.size;
    let lead = state.obstacles.speed * half_airtime - overlap * 0.5;
    state
        .obstacles
        .nearest_ahead(player_front)
        .is_some_and(|distance| distance <= lead.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(12345, Tuning::default(), 0);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        state
    }

    #[test]
    fn test_tick_menu_to_playing() {
        let mut state = GameState::new(12345, Tuning::default(), 0);
        let input = TickInput::default();
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.time_ticks, 0);

        let state = playing();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::SessionStarted));
    }

    #[test]
    fn test_first_tick_bumps_speed() {
        let state = playing();
        assert_eq!(
            state.obstacle_speed,
            state.tuning.obstacle_start_speed + state.tuning.obstacle_speed_step
        );
        assert_eq!(state.last_speed_increase_score, 0);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut state = playing();
        state.score = 5;
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, SIM_DT);
        assert_eq!(state.score, 5);
    }

    #[test]
    fn test_tick_pause_freezes_world() {
        let mut state = playing();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.obstacles.xs;
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.obstacles.xs, frozen);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_jump_raises_event() {
        let mut state = playing();
        // Settle on the floor first
        tick(&mut state, &TickInput::default(), SIM_DT);
        state.drain_events();

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, SIM_DT);
        assert!(state.drain_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_recycled_obstacles_score() {
        let mut state = playing();
        state.obstacles.xs = [-state.obstacles.size + 0.1, 2000.0, 2000.0];
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 1);
        assert!(state.events.contains(&GameEvent::Scored { points: 1 }));
    }

    #[test]
    fn test_collision_ends_game() {
        let mut state = playing();
        state.score = 4;
        let player_x = state.player.pos.x;
        state.obstacles.xs = [player_x + 5.0, 2000.0, 2000.0];
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.highscore, 4);
        assert!(state.events.contains(&GameEvent::GameOver {
            score: 4,
            new_highscore: true
        }));

        // Nothing moves after game over
        let frozen = state.obstacles.xs;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.obstacles.xs, frozen);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = playing();
        state.obstacles.xs = [state.player.pos.x, 2000.0, 2000.0];
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_autopilot_survives() {
        let mut state = playing();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        // 60 seconds of play
        for _ in 0..3600 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.score > 0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing();
        let mut state2 = playing();

        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.obstacles.xs, state2.obstacles.xs);
        assert_eq!(state1.player.pos, state2.player.pos);
    }
}
