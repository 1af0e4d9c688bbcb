//! Per-frame simulation tick
//!
//! Advances the run deterministically: lane easing, obstacle advance,
//! collision, culling, speed ramp, spawn. The frame scheduler calls this once
//! per frame; outside Running the tick declines cooperatively and the loop
//! simply stops rescheduling itself.

use rand::Rng;

use super::state::{GameEvent, GameState, OBSTACLE_KINDS, Obstacle, SessionPhase};
use crate::consts::*;

/// Advance the session by one tick
///
/// Order within a tick: ease player, advance obstacles, collision test,
/// reverse-order culling with the speed ramp, spawn attempt. A collision
/// returns early - no culling and no spawn on that tick.
pub fn tick(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase != SessionPhase::Running || state.player.collided {
        return;
    }
    state.time_ticks += 1;

    // Ease the player toward the lane center, and the transient tilt
    // toward level
    let target_x = state.player.target_x(state.profile.lane_count);
    state.player.x += (target_x - state.player.x) * LANE_EASING;
    state.player.angle += (state.player.angle_target - state.player.angle) * LANE_EASING;
    state.player.angle_target *= TILT_RELAX;

    // Advance the road scroll and every obstacle
    state.road_offset += state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.y += state.speed;
    }

    // First overlap ends the run
    let player_rect = state.player.rect();
    for obstacle in &state.obstacles {
        if player_rect.overlaps(&obstacle.rect()) {
            state.player.collided = true;
            state.phase = SessionPhase::Collided;
            log::info!("crashed at score {}", state.score);
            events.push(GameEvent::Crashed { score: state.score });
            return;
        }
    }

    // Cull in reverse index order; forward removal would skip elements.
    // Each removal scores, and each score at a multiple of ten ramps the
    // speed - several removals in one tick compound several ramps.
    for i in (0..state.obstacles.len()).rev() {
        if state.obstacles[i].y > VIEW_HEIGHT {
            state.obstacles.remove(i);
            state.score += 1;
            events.push(GameEvent::ObstaclePassed { score: state.score });
            if state.score % SPEED_RAMP_EVERY == 0 {
                state.speed += state.profile.speed_increment;
                events.push(GameEvent::SpeedRamped { speed: state.speed });
            }
        }
    }

    // Spawn coin flip; the draw order (coin, lane, variant) is fixed so a
    // seed replays identically
    if state.rng.random::<f32>() < SPAWN_PROBABILITY {
        spawn_obstacle(state);
    }
}

/// Attempt one spawn; refused silently at the concurrent-obstacle cap
pub fn spawn_obstacle(state: &mut GameState) {
    if state.obstacles.len() >= state.profile.max_obstacles {
        return;
    }
    let lane = state.rng.random_range(0..state.profile.lane_count);
    let kind = OBSTACLE_KINDS[state.rng.random_range(0..OBSTACLE_KINDS.len())];
    log::debug!("spawned {:?} in lane {}", kind, lane);
    state
        .obstacles
        .push(Obstacle::spawn(lane, state.profile.lane_count, kind));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Tier;
    use crate::sim::state::{ObstacleKind, Steer};
    use proptest::prelude::*;

    fn running(tier: Tier, seed: u64) -> GameState {
        let mut state = GameState::new(tier, seed);
        state.begin_run();
        state
    }

    /// Obstacle one tick away from the cull line, out of the player's way
    fn about_to_pass(state: &GameState) -> Obstacle {
        let mut o = Obstacle::spawn(0, state.profile.lane_count, ObstacleKind::Car);
        o.y = VIEW_HEIGHT;
        o
    }

    #[test]
    fn test_tick_declines_outside_running() {
        let mut events = Vec::new();
        for phase in [
            SessionPhase::Idle,
            SessionPhase::Countdown,
            SessionPhase::Paused,
            SessionPhase::Collided,
        ] {
            let mut state = GameState::new(Tier::Easy, 3);
            state.phase = phase;
            let obstacle = about_to_pass(&state);
            state.obstacles.push(obstacle);
            tick(&mut state, &mut events);
            assert_eq!(state.obstacles[0].y, VIEW_HEIGHT);
            assert_eq!(state.score, 0);
            assert_eq!(state.time_ticks, 0);
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_easy_run_reaches_score_ten_and_ramps_once() {
        // Ten culled obstacles on easy: score 10, speed 2.0 + 0.5
        let mut state = running(Tier::Easy, 42);
        let mut events = Vec::new();
        for expected in 1..=10u32 {
            let obstacle = about_to_pass(&state);
            state.obstacles.push(obstacle);
            tick(&mut state, &mut events);
            assert_eq!(state.score, expected);
        }
        assert_eq!(state.score, 10);
        assert_eq!(state.speed, 2.5);
        assert!(events.contains(&GameEvent::SpeedRamped { speed: 2.5 }));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::ObstaclePassed { .. }))
                .count(),
            10
        );
    }

    #[test]
    fn test_multiple_culls_in_one_tick_compound_ramps() {
        let mut state = running(Tier::Easy, 42);
        state.score = 9;
        // Eleven obstacles pass on one tick: score 9 -> 20 crosses both
        // 10 and 20, so the ramp fires twice
        for _ in 0..11 {
            let obstacle = about_to_pass(&state);
            state.obstacles.push(obstacle);
        }
        let mut events = Vec::new();
        tick(&mut state, &mut events);
        assert_eq!(state.score, 20);
        assert_eq!(state.speed, 3.0);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::SpeedRamped { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_collision_transitions_and_halts_culling() {
        let mut state = running(Tier::Easy, 42);
        // One obstacle dead on the player, one that would otherwise be culled
        let mut on_player = Obstacle::spawn(
            state.player.lane,
            state.profile.lane_count,
            ObstacleKind::Truck,
        );
        on_player.y = PLAYER_Y;
        state.obstacles.push(on_player);
        let passing = about_to_pass(&state);
        state.obstacles.push(passing);

        let mut events = Vec::new();
        tick(&mut state, &mut events);

        assert_eq!(state.phase, SessionPhase::Collided);
        assert!(state.player.collided);
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(events, vec![GameEvent::Crashed { score: 0 }]);

        // Terminal: further ticks are no-ops
        tick(&mut state, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_spawn_refused_at_cap() {
        let mut state = running(Tier::Easy, 42); // max 2 concurrent
        spawn_obstacle(&mut state);
        spawn_obstacle(&mut state);
        assert_eq!(state.obstacles.len(), 2);
        spawn_obstacle(&mut state);
        assert_eq!(state.obstacles.len(), 2);
    }

    #[test]
    fn test_spawn_is_offscreen_and_lane_centered() {
        let mut state = running(Tier::Medium, 7);
        spawn_obstacle(&mut state);
        let o = &state.obstacles[0];
        assert_eq!(o.y, OBSTACLE_SPAWN_Y);
        assert!(o.lane < state.profile.lane_count);
        assert_eq!(
            o.x,
            crate::lane_origin_x(o.lane, state.profile.lane_count, OBSTACLE_WIDTH)
        );
    }

    #[test]
    fn test_player_eases_toward_lane_center_without_overshoot() {
        let mut state = running(Tier::Easy, 42);
        state.player.steer(Steer::Left, state.profile.lane_count);
        let target = state.player.target_x(state.profile.lane_count);
        let mut events = Vec::new();
        let mut last_gap = (state.player.x - target).abs();
        for _ in 0..60 {
            tick(&mut state, &mut events);
            let gap = (state.player.x - target).abs();
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = running(Tier::Hard, 99999);
        let mut b = running(Tier::Hard, 99999);
        let mut ea = Vec::new();
        let mut eb = Vec::new();
        for _ in 0..500 {
            tick(&mut a, &mut ea);
            tick(&mut b, &mut eb);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.speed, b.speed);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(oa.lane, ob.lane);
            assert_eq!(oa.y, ob.y);
            assert_eq!(oa.kind, ob.kind);
        }
        assert_eq!(ea, eb);
    }

    proptest! {
        #[test]
        fn prop_cap_and_cull_invariants_hold(seed in any::<u64>()) {
            let mut state = running(Tier::Medium, seed);
            let mut events = Vec::new();
            for _ in 0..400 {
                tick(&mut state, &mut events);
                prop_assert!(state.obstacles.len() <= state.profile.max_obstacles);
                for o in &state.obstacles {
                    prop_assert!(o.y <= VIEW_HEIGHT);
                }
                if state.phase != SessionPhase::Running {
                    break;
                }
            }
        }
    }
}
