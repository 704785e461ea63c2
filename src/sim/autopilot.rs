//! Demo/idle mode: the game plays itself
//!
//! Jumps when the nearest obstacle still ahead of the player enters a trigger
//! window that scales with the current scroll speed.

use super::spawner::speed_for_score;
use super::state::{GamePhase, GameState};

/// Jump when the gap to the next obstacle is at most this many ticks of travel
pub const LEAD_TICKS: f32 = 8.0;

/// Whether the autopilot would jump this frame
pub fn wants_jump(state: &GameState) -> bool {
    if state.phase != GamePhase::Running || !state.player.on_ground {
        return false;
    }

    let body = state.player.body();
    let speed = speed_for_score(state.score, &state.tuning);

    state
        .obstacles
        .iter()
        .find(|o| o.right() > body.left())
        .map(|o| {
            let gap = o.x - body.right();
            gap > 0.0 && gap <= speed * LEAD_TICKS
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::state::Obstacle;

    fn with_obstacle_at(x: f32) -> GameState {
        let mut state = GameState::new(Tuning::default(), 1).unwrap();
        state.phase = GamePhase::Running;
        state.obstacles.push(Obstacle {
            id: 1,
            x,
            y: 230.0,
            width: 30.0,
            height: 50.0,
            passed: false,
        });
        state
    }

    #[test]
    fn test_idle_never_jumps() {
        let mut state = with_obstacle_at(100.0);
        state.phase = GamePhase::Idle;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_jumps_inside_window() {
        // Body right edge is at 89; window is 32px at base speed
        assert!(wants_jump(&with_obstacle_at(110.0)));
        assert!(wants_jump(&with_obstacle_at(121.0)));
        assert!(!wants_jump(&with_obstacle_at(130.0)));
    }

    #[test]
    fn test_targets_first_obstacle_not_behind_body() {
        // Body spans 71..89. Right edge at 70 is behind the player, 80 is not.
        let mut state = with_obstacle_at(40.0);
        let next = Obstacle { id: 2, x: 110.0, ..state.obstacles[0] };
        state.obstacles.push(next);
        assert!(wants_jump(&state));

        state.obstacles[0].x = 50.0;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_no_jump_when_airborne() {
        let mut state = with_obstacle_at(110.0);
        state.player.on_ground = false;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_empty_course() {
        let mut state = GameState::new(Tuning::default(), 1).unwrap();
        state.phase = GamePhase::Running;
        assert!(!wants_jump(&state));
    }
}
