//! Player vertical motion
//!
//! Semi-implicit Euler: velocity first, then position, then ground clamp.
//! Pure f32 arithmetic in a fixed order, so identical inputs give
//! bit-identical trajectories.

use super::state::Player;
use crate::Tuning;

/// Advance the player by one tick under gravity
pub fn integrate(player: &mut Player, tuning: &Tuning) {
    player.vy += tuning.gravity;
    player.y += player.vy;

    let clamp = tuning.ground_clamp();
    if player.y >= clamp {
        player.y = clamp;
        player.vy = 0.0;
        player.on_ground = true;
    } else {
        player.on_ground = false;
    }
}

/// Launch the player if standing on the ground. Returns whether it jumped.
pub fn jump(player: &mut Player, tuning: &Tuning) -> bool {
    if !player.on_ground {
        return false;
    }
    player.vy = tuning.jump_velocity;
    player.on_ground = false;
    true
}
