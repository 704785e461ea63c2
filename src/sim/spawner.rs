//! Obstacle spawning, scrolling, scoring and removal
//!
//! Spawning is keyed to the frame counter, not wall-clock time, and sizes come
//! from an injected RNG, so a seed and a frame count fully determine the course.

use rand::Rng;

use super::state::Obstacle;
use crate::Tuning;

/// Whether `frame` is a spawn frame
#[inline]
pub fn should_spawn(frame: u64, interval: u64) -> bool {
    frame % interval == 0
}

/// Create an obstacle just past the right edge with a random size
pub fn spawn<R: Rng + ?Sized>(rng: &mut R, id: u32, tuning: &Tuning) -> Obstacle {
    let height = rng.random_range(tuning.obstacle_min_height..tuning.obstacle_max_height);
    let width = rng.random_range(tuning.obstacle_min_width..tuning.obstacle_max_width);
    Obstacle {
        id,
        x: tuning.arena_width + tuning.spawn_margin,
        y: tuning.ground_y() - height,
        width,
        height,
        passed: false,
    }
}

/// Scroll speed for a score: `base + floor(score / step)`, optionally capped
pub fn speed_for_score(score: u64, tuning: &Tuning) -> f32 {
    let speed = tuning.base_speed + (score / tuning.speed_step_score) as f32;
    match tuning.max_speed {
        Some(max) => speed.min(max),
        None => speed,
    }
}

/// Move every obstacle left by `speed`
pub fn advance(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= speed;
    }
}

/// Mark obstacles whose right edge moved past `player_x`.
/// Returns the IDs newly passed, oldest first.
pub fn score_passes(obstacles: &mut [Obstacle], player_x: f32) -> Vec<u32> {
    let mut cleared = Vec::new();
    for obstacle in obstacles.iter_mut() {
        if !obstacle.passed && obstacle.right() < player_x {
            obstacle.passed = true;
            cleared.push(obstacle.id);
        }
    }
    cleared
}

/// Remove obstacles that scrolled off the left edge. Returns how many.
///
/// Survivors keep their spawn order. Off-screen obstacles need not be a prefix:
/// with short spawn intervals a narrow newer obstacle can leave before a wide
/// older one.
pub fn reap(obstacles: &mut Vec<Obstacle>) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| o.right() >= 0.0);
    before - obstacles.len()
}
