//! Game state and core simulation types
//!
//! [`GameState`] is the session object: everything a run needs, owned by the
//! caller and passed into every core operation.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::countdown::{Countdown, CountdownPhase};
use crate::{ConfigError, Rect, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command
    Idle,
    /// 3-2-1-GO sequence; input is ignored
    Countdown,
    /// Active gameplay
    Running,
    /// Run ended on collision
    GameOver,
}

/// The stick figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Fixed column (center of the body)
    pub x: f32,
    /// Feet position (canvas y grows downward)
    pub y: f32,
    /// Vertical velocity (negative is up)
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub on_ground: bool,
}

impl Player {
    /// A player standing on the ground
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.player_x,
            y: tuning.ground_clamp(),
            vy: 0.0,
            width: tuning.player_width,
            height: tuning.player_height,
            on_ground: true,
        }
    }

    /// Collision body, inset from the drawn figure (head and legs stick out)
    pub fn body(&self) -> Rect {
        Rect::new(
            self.x - self.width / 2.0,
            self.y - self.height,
            self.width,
            self.height,
        )
    }
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top edge (ground line minus height)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Set once the right edge has moved past the player
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Things that happened during a tick or command, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    CountdownStep(CountdownPhase),
    Jumped,
    ObstacleSpawned { id: u32 },
    ObstacleCleared { id: u32, score: u64 },
    SpeedIncreased { speed: f32 },
    Collision { obstacle_id: u32, frame: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay constants for this run
    pub tuning: Tuning,
    /// Obstacle size RNG
    pub rng: Pcg32,
    /// Frames simulated this run
    pub frame: u64,
    pub score: u64,
    pub phase: GamePhase,
    /// Active only while `phase == Countdown`
    pub countdown: Option<Countdown>,
    pub player: Player,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Pending events, drained by [`GameState::take_events`]
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next obstacle ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh run in `Idle` with the given seed.
    ///
    /// Invalid tuning is rejected here so a run can never fail mid-frame.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::fresh(tuning, seed))
    }

    fn fresh(tuning: Tuning, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            frame: 0,
            score: 0,
            phase: GamePhase::Idle,
            countdown: None,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// External full restart: discard the run and return to `Idle`
    pub fn reset(&mut self, seed: u64) {
        log::info!("Run reset with seed {}", seed);
        let tuning = self.tuning.clone();
        *self = Self::fresh(tuning, seed);
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Move to `to`, recording the transition
    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            log::info!("Phase {:?} -> {:?} (frame {}, score {})", from, to, self.frame, self.score);
            self.phase = to;
            self.events.push(GameEvent::PhaseChanged { from, to });
        }
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Everything the presentation layer needs for one frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            countdown: self.countdown.map(|c| c.phase()),
            frame: self.frame,
            score: self.score,
            player: self.player.body(),
            player_feet: glam::Vec2::new(self.player.x, self.player.y),
            on_ground: self.player.on_ground,
            obstacles: self.obstacles.iter().map(Obstacle::rect).collect(),
        }
    }
}

/// Per-frame view of the run, queried once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    /// Current countdown phase while counting down
    pub countdown: Option<CountdownPhase>,
    pub frame: u64,
    pub score: u64,
    /// Player collision body
    pub player: Rect,
    /// Anchor for drawing the stick figure
    pub player_feet: glam::Vec2,
    pub on_ground: bool,
    /// Live obstacle rectangles, oldest first
    pub obstacles: Vec<Rect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_and_grounded() {
        let tuning = Tuning::default();
        let state = GameState::new(tuning.clone(), 7).unwrap();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.player.on_ground);
        assert_eq!(state.player.y, tuning.ground_clamp());
    }

    #[test]
    fn test_invalid_tuning_rejected_at_construction() {
        let tuning = Tuning {
            spawn_interval: 0,
            ..Default::default()
        };
        assert_eq!(
            GameState::new(tuning, 1).unwrap_err(),
            ConfigError::Invalid {
                field: "spawn_interval",
                reason: "must be at least one tick",
            }
        );

        let tuning = Tuning {
            obstacle_min_width: 40.0,
            obstacle_max_width: 40.0,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(tuning, 1),
            Err(ConfigError::Invalid { field: "obstacle_min_width", .. })
        ));
    }

    #[test]
    fn test_player_body_sits_above_feet() {
        let player = Player::new(&Tuning::default());
        let body = player.body();
        assert_eq!(body.bottom(), player.y);
        assert_eq!(body.left(), player.x - player.width / 2.0);
        assert_eq!(body.size.y, player.height);
    }

    #[test]
    fn test_reset_restores_idle() {
        let mut state = GameState::new(Tuning::default(), 1).unwrap();
        state.score = 12;
        state.frame = 400;
        state.phase = GamePhase::GameOver;
        state.reset(2);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.frame, 0);
        assert_eq!(state.seed, 2);
    }

    #[test]
    fn test_serde_roundtrip_keeps_rng_stream() {
        use rand::Rng;

        let mut state = GameState::new(Tuning::default(), 42).unwrap();
        let _: u32 = state.rng.random();
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        let a: u64 = state.rng.random();
        let b: u64 = restored.rng.random();
        assert_eq!(a, b);
    }
}
