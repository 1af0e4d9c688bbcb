//! Game state and core simulation types
//!
//! Everything the renderer or the session needs to observe lives here; all
//! mutation happens through the session and the tick function.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::difficulty::{DifficultyProfile, Tier};
use crate::lane_origin_x;

/// Current phase of the session
///
/// Exactly one phase is active at a time. Interactive requests that do not
/// apply to the current phase are ignored, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the start control; difficulty may only change here
    Idle,
    /// Fixed "3", "2", "1", "GO!" sequence before a run
    Countdown,
    /// Active gameplay, ticked once per frame
    Running,
    /// Cooperatively halted; resuming continues where the run left off
    Paused,
    /// Run ended on a collision; terminal until reset
    Collided,
}

/// Lane-change directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
}

/// Obstacle visual variants (no gameplay effect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Car,
    Van,
    Truck,
    PoliceCar,
}

/// Spawn pool for the uniform variant draw
pub const OBSTACLE_KINDS: [ObstacleKind; 4] = [
    ObstacleKind::Car,
    ObstacleKind::Van,
    ObstacleKind::Truck,
    ObstacleKind::PoliceCar,
];

/// The player's car
///
/// The lane index is discrete; `x` eases toward the lane center every tick.
/// `angle` is the transient visual tilt set on lane changes - render-only,
/// it never feeds back into the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCar {
    /// Current lane, always in `[0, lane_count)`
    pub lane: u32,
    /// Eased left-edge x position
    pub x: f32,
    /// Current tilt (degrees)
    pub angle: f32,
    /// Tilt the car is easing toward
    pub angle_target: f32,
    /// Terminal once true; cleared only by reset
    pub collided: bool,
}

impl PlayerCar {
    /// Car centered in the profile's home lane, level and intact
    pub fn centered(profile: &DifficultyProfile) -> Self {
        let lane = profile.home_lane();
        Self {
            lane,
            x: lane_origin_x(lane, profile.lane_count, CAR_WIDTH),
            angle: 0.0,
            angle_target: 0.0,
            collided: false,
        }
    }

    /// Snap back to the home lane (difficulty change, run start, reset)
    pub fn recenter(&mut self, profile: &DifficultyProfile) {
        *self = Self::centered(profile);
    }

    /// Apply a lane-change request; rejected silently at the playfield edges
    /// or after a collision
    pub fn steer(&mut self, dir: Steer, lane_count: u32) {
        if self.collided {
            return;
        }
        match dir {
            Steer::Left if self.lane > 0 => {
                self.lane -= 1;
                self.angle_target = -TILT_ANGLE;
            }
            Steer::Right if self.lane + 1 < lane_count => {
                self.lane += 1;
                self.angle_target = TILT_ANGLE;
            }
            _ => {}
        }
    }

    /// Lane-center x the eased position converges toward
    #[inline]
    pub fn target_x(&self, lane_count: u32) -> f32 {
        lane_origin_x(self.lane, lane_count, CAR_WIDTH)
    }

    /// Collision rect at the current eased position
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, PLAYER_Y, CAR_WIDTH, CAR_HEIGHT)
    }
}

/// A spawned obstacle, lane-aligned and advancing downward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Lane the obstacle was spawned into
    pub lane: u32,
    /// Lane-centered left-edge x (fixed for the obstacle's lifetime)
    pub x: f32,
    /// Top-edge y, advanced by `speed` each tick
    pub y: f32,
    /// Visual variant
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Fresh obstacle at the off-screen spawn line
    pub fn spawn(lane: u32, lane_count: u32, kind: ObstacleKind) -> Self {
        Self {
            lane,
            x: lane_origin_x(lane, lane_count, OBSTACLE_WIDTH),
            y: OBSTACLE_SPAWN_Y,
            kind,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, OBSTACLE_WIDTH, OBSTACLE_HEIGHT)
    }
}

/// Signals for external collaborators (renderer, audio, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// A countdown display step became current
    CountdownStep { label: &'static str },
    /// Countdown finished; ambient loops should start
    RunStarted,
    /// An obstacle left the playfield; score already includes it
    ObstaclePassed { score: u32 },
    /// Score crossed a multiple of ten
    SpeedRamped { speed: f32 },
    /// Simulation halted cooperatively
    Paused,
    /// Simulation resumed where it left off
    Resumed,
    /// Run ended; stop ambient loops, play the crash cue, show game over
    Crashed { score: u32 },
    /// The crash beat the stored best for the active tier
    NewTopScore { score: u32, previous: u32 },
    /// Session returned to Idle; the start control is re-armed
    SessionReset,
}

/// Complete session state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Active difficulty tier
    pub tier: Tier,
    /// Profile for the active tier
    pub profile: DifficultyProfile,
    /// Current phase
    pub phase: SessionPhase,
    /// Obstacles passed this run
    pub score: u32,
    /// Downward advance per tick (pixels)
    pub speed: f32,
    /// Scrolling road texture offset (render-only)
    pub road_offset: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Index into [`COUNTDOWN_STEPS`] while counting down
    pub countdown_step: usize,
    /// The player's car
    pub player: PlayerCar,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG for the spawn coin flip and lane/variant draws
    pub rng: Pcg32,
}

impl GameState {
    /// Idle session on the given tier with a seeded RNG
    pub fn new(tier: Tier, seed: u64) -> Self {
        let profile = tier.profile();
        Self {
            tier,
            profile,
            phase: SessionPhase::Idle,
            score: 0,
            speed: profile.base_speed,
            road_offset: 0.0,
            time_ticks: 0,
            countdown_step: 0,
            player: PlayerCar::centered(&profile),
            obstacles: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Switch tiers; only meaningful while Idle (the session guards that)
    pub fn apply_tier(&mut self, tier: Tier) {
        self.tier = tier;
        self.profile = tier.profile();
        self.speed = self.profile.base_speed;
        self.player.recenter(&self.profile);
    }

    /// Enter Running with a clean slate for the run
    pub fn begin_run(&mut self) {
        self.phase = SessionPhase::Running;
        self.score = 0;
        self.speed = self.profile.base_speed;
        self.obstacles.clear();
        self.player.recenter(&self.profile);
    }

    /// Collided -> Idle: clear the playfield and re-arm the start control
    pub fn reset_to_idle(&mut self) {
        self.phase = SessionPhase::Idle;
        self.score = 0;
        self.speed = self.profile.base_speed;
        self.obstacles.clear();
        self.player.recenter(&self.profile);
    }

    /// Countdown label currently displayed, if counting down
    pub fn countdown_label(&self) -> Option<&'static str> {
        (self.phase == SessionPhase::Countdown)
            .then(|| COUNTDOWN_STEPS[self.countdown_step.min(COUNTDOWN_STEPS.len() - 1)])
    }

    /// Read-only view for the renderer; zero inbound mutation
    pub fn snapshot(&self, top_score: u32) -> RenderSnapshot {
        RenderSnapshot {
            phase: self.phase,
            tier: self.tier,
            score: self.score,
            top_score,
            speed: self.speed,
            lane_count: self.profile.lane_count,
            lane_width: self.profile.lane_width(),
            road_offset: self.road_offset,
            countdown: self.countdown_label(),
            player: PlayerView {
                rect: self.player.rect(),
                angle: self.player.angle,
                collided: self.player.collided,
            },
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    rect: o.rect(),
                    kind: o.kind,
                })
                .collect(),
        }
    }
}

/// Player portion of a render snapshot
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    pub angle: f32,
    pub collided: bool,
}

/// Obstacle portion of a render snapshot
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ObstacleView {
    pub rect: Rect,
    pub kind: ObstacleKind,
}

/// Per-tick read-only state for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub phase: SessionPhase,
    pub tier: Tier,
    pub score: u32,
    pub top_score: u32,
    pub speed: f32,
    pub lane_count: u32,
    pub lane_width: f32,
    pub road_offset: f32,
    pub countdown: Option<&'static str>,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_player_starts_centered() {
        let state = GameState::new(Tier::Easy, 1);
        assert_eq!(state.player.lane, 2);
        let expected = lane_origin_x(2, 4, CAR_WIDTH);
        assert_eq!(state.player.x, expected);
    }

    #[test]
    fn test_steer_right_rejected_at_last_lane() {
        let profile = Tier::Easy.profile(); // 4 lanes
        let mut player = PlayerCar::centered(&profile);
        player.lane = 3;
        player.steer(Steer::Right, profile.lane_count);
        assert_eq!(player.lane, 3);
    }

    #[test]
    fn test_steer_left_rejected_at_first_lane() {
        let profile = Tier::Easy.profile();
        let mut player = PlayerCar::centered(&profile);
        player.lane = 0;
        player.steer(Steer::Left, profile.lane_count);
        assert_eq!(player.lane, 0);
    }

    #[test]
    fn test_steer_sets_tilt_target() {
        let profile = Tier::Medium.profile();
        let mut player = PlayerCar::centered(&profile);
        player.steer(Steer::Left, profile.lane_count);
        assert_eq!(player.angle_target, -TILT_ANGLE);
        player.steer(Steer::Right, profile.lane_count);
        assert_eq!(player.angle_target, TILT_ANGLE);
    }

    #[test]
    fn test_collided_player_ignores_steering() {
        let profile = Tier::Medium.profile();
        let mut player = PlayerCar::centered(&profile);
        player.collided = true;
        let lane = player.lane;
        player.steer(Steer::Left, profile.lane_count);
        assert_eq!(player.lane, lane);
    }

    #[test]
    fn test_apply_tier_recenters_and_resets_speed() {
        let mut state = GameState::new(Tier::Easy, 1);
        state.speed = 9.0;
        state.apply_tier(Tier::Hard);
        assert_eq!(state.profile.lane_count, 6);
        assert_eq!(state.player.lane, 3);
        assert_eq!(state.speed, 4.0);
    }

    #[test]
    fn test_snapshot_serializes_for_the_bridge() {
        let state = GameState::new(Tier::Medium, 7);
        let json = serde_json::to_string(&state.snapshot(5)).unwrap();
        assert!(json.contains("\"top_score\":5"));
        assert!(json.contains("\"lane_count\":5"));
    }

    proptest! {
        #[test]
        fn prop_lane_stays_in_bounds(rights in proptest::collection::vec(any::<bool>(), 0..128)) {
            let profile = Tier::Hard.profile();
            let mut player = PlayerCar::centered(&profile);
            for right in rights {
                let dir = if right { Steer::Right } else { Steer::Left };
                player.steer(dir, profile.lane_count);
                prop_assert!(player.lane < profile.lane_count);
            }
        }
    }
}
