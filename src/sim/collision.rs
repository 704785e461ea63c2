//! Player vs obstacle collision detection
//!
//! Discrete AABB overlap, evaluated once per tick. Obstacles move a few pixels
//! per tick, so there is no swept/continuous test.

use super::state::{Obstacle, Player};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// ID of the first obstacle hit
    pub obstacle_id: u32,
    /// Index into the live obstacle list
    pub index: usize,
}

/// First obstacle overlapping the player's body, oldest first
pub fn check_collision(player: &Player, obstacles: &[Obstacle]) -> Option<CollisionResult> {
    let body = player.body();
    obstacles
        .iter()
        .position(|o| body.overlaps(&o.rect()))
        .map(|index| CollisionResult {
            obstacle_id: obstacles[index].id,
            index,
        })
}
