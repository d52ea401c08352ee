//! Recycled meteor obstacles
//!
//! A fixed pool of obstacles rolls right-to-left along the floor. Obstacles that
//! leave the screen are respawned at a random x instead of being reallocated,
//! and each respawn is worth one point.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::{OBSTACLE_COUNT, OBSTACLE_SPACING};

/// Pool of obstacles sharing one size and one baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleManager {
    /// X positions (left edge) of the pooled obstacles
    pub xs: [f32; OBSTACLE_COUNT],
    /// Width of the spawn band
    pub width: f32,
    /// Square obstacle edge length
    pub size: f32,
    /// Floor line obstacles rest on (their bottom edge)
    pub baseline: f32,
    /// Leftward speed (px/s)
    pub speed: f32,
    #[serde(skip, default = "default_rng")]
    rng: Pcg32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl ObstacleManager {
    pub fn new(width: f32, size: f32, baseline: f32, speed: f32, seed: u64) -> Self {
        Self {
            xs: Self::initial_layout(width),
            width,
            size,
            baseline,
            speed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Evenly trailing spawn points around the right edge
    fn initial_layout(width: f32) -> [f32; OBSTACLE_COUNT] {
        std::array::from_fn(|i| width + (i as f32 - 1.0) * OBSTACLE_SPACING)
    }

    /// Restore the initial layout (speed is left alone)
    pub fn reset(&mut self) {
        self.xs = Self::initial_layout(self.width);
    }

    /// Reseed the respawn generator
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Move every obstacle left and recycle the ones that left the screen
    ///
    /// Returns the number of obstacles recycled this tick (points earned).
    pub fn advance(&mut self, dt: f32) -> u32 {
        let mut points = 0;
        for x in self.xs.iter_mut() {
            *x -= self.speed * dt;
            if *x < -self.size {
                *x = self.rng.random::<f32>() * self.width + self.size;
                points += 1;
            }
        }
        points
    }

    /// Hitbox of a single obstacle
    pub fn rect_at(&self, x: f32) -> Rect {
        Rect::new(x, self.baseline - self.size, self.size, self.size)
    }

    /// Hitboxes of all obstacles, in pool order
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.xs.iter().map(|&x| self.rect_at(x))
    }

    /// Check the player's hitbox against every obstacle
    pub fn check_collision(&self, player: &Rect) -> bool {
        self.rects().any(|rect| rect.overlaps(player))
    }

    /// Distance from `x` to the nearest obstacle ahead of it (to the right)
    pub fn nearest_ahead(&self, x: f32) -> Option<f32> {
        self.xs
            .iter()
            .map(|&ox| ox - x)
            .filter(|d| *d >= -self.size)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CANVAS_WIDTH, FLOOR_TOP};
    use proptest::prelude::*;

    fn manager(speed: f32) -> ObstacleManager {
        ObstacleManager::new(CANVAS_WIDTH, 20.0, FLOOR_TOP, speed, 42)
    }

    #[test]
    fn test_initial_layout() {
        let obstacles = manager(100.0);
        assert_eq!(obstacles.xs, [650.0, 800.0, 950.0]);
    }

    #[test]
    fn test_advance_without_respawn() {
        let mut obstacles = manager(50.0);
        obstacles.xs = [100.0, 300.0, 500.0];

        let points = obstacles.advance(1.0);
        assert_eq!(points, 0);
        assert_eq!(obstacles.xs, [50.0, 250.0, 450.0]);
    }

    #[test]
    fn test_collision_after_advance() {
        let mut obstacles = manager(50.0);
        obstacles.xs = [100.0, 1000.0, 1000.0];
        obstacles.advance(1.0);
        assert_eq!(obstacles.xs[0], 50.0);

        // Obstacle occupies x 50..70, y 480..500
        let hit = Rect::new(45.0, 480.0, 20.0, 20.0);
        let miss = Rect::new(0.0, 480.0, 20.0, 20.0);
        assert!(obstacles.check_collision(&hit));
        assert!(!obstacles.check_collision(&miss));
    }

    #[test]
    fn test_collision_clears_when_jumping_over() {
        let mut obstacles = manager(50.0);
        obstacles.xs = [50.0, 1000.0, 1000.0];
        // Player bottom edge sits exactly on the obstacle top
        let above = Rect::new(50.0, 448.0, 32.0, 32.0);
        assert!(!obstacles.check_collision(&above));
    }

    #[test]
    fn test_respawn_scores_each_obstacle() {
        let mut obstacles = manager(100.0);
        obstacles.xs = [-15.0, -19.0, 400.0];

        let points = obstacles.advance(0.1);
        assert_eq!(points, 2);
        for &x in &obstacles.xs[..2] {
            assert!(x >= obstacles.size);
            assert!(x < obstacles.width + obstacles.size);
        }
        assert_eq!(obstacles.xs[2], 390.0);
    }

    #[test]
    fn test_exactly_at_left_edge_does_not_respawn() {
        let mut obstacles = manager(10.0);
        obstacles.xs = [-10.0, 400.0, 400.0];
        assert_eq!(obstacles.advance(1.0), 0);
        assert_eq!(obstacles.xs[0], -20.0);
        assert_eq!(obstacles.advance(0.1), 1);
    }

    #[test]
    fn test_reset_keeps_speed() {
        let mut obstacles = manager(100.0);
        obstacles.advance(3.0);
        obstacles.set_speed(250.0);
        obstacles.reset();
        assert_eq!(obstacles.xs, [650.0, 800.0, 950.0]);
        assert_eq!(obstacles.speed, 250.0);
    }

    #[test]
    fn test_same_seed_same_respawns() {
        let mut a = manager(400.0);
        let mut b = manager(400.0);
        for _ in 0..600 {
            assert_eq!(a.advance(1.0 / 60.0), b.advance(1.0 / 60.0));
        }
        assert_eq!(a.xs, b.xs);
    }

    #[test]
    fn test_nearest_ahead() {
        let mut obstacles = manager(100.0);
        obstacles.xs = [30.0, 200.0, 120.0];
        assert_eq!(obstacles.nearest_ahead(100.0), Some(20.0));
        assert_eq!(obstacles.nearest_ahead(500.0), None);
    }

    proptest! {
        #[test]
        fn advance_conserves_position_unless_respawned(
            speed in 0.0f32..1000.0,
            dt in 0.0f32..0.1,
            start in proptest::array::uniform3(-20.0f32..1000.0),
        ) {
            let mut obstacles = manager(speed);
            obstacles.xs = start;
            let points = obstacles.advance(dt);

            let mut respawned = 0;
            for (before, after) in start.iter().zip(obstacles.xs.iter()) {
                let moved = before - speed * dt;
                if moved < -obstacles.size {
                    respawned += 1;
                    prop_assert!(*after >= 0.0);
                } else {
                    prop_assert_eq!(*after, moved);
                }
            }
            prop_assert_eq!(points, respawned);
        }
    }
}
