//! Session state machine
//!
//! Owns the game state, the event buffer and the per-tier score table, and
//! is the single mutation surface the embedding shell talks to. Controls map
//! onto phase transitions:
//!
//! ```text
//! Idle --start--> Countdown --4 steps--> Running <--toggle--> Paused
//!                                           |
//!                                       collision
//!                                           v
//! Idle <-------------restart---------- Collided
//! ```
//!
//! Requests that do not apply to the current phase are silent no-ops; the
//! controls are forgiving interactive inputs, not an API to validate.

use crate::consts::COUNTDOWN_STEPS;
use crate::difficulty::Tier;
use crate::highscores::TopScores;
use crate::platform::KeyValueStore;
use crate::sim::{self, GameEvent, GameState, RenderSnapshot, SessionPhase};

pub use crate::sim::Steer;

/// A single game session: state machine, simulation and score persistence
#[derive(Debug)]
pub struct Session<S> {
    state: GameState,
    top_scores: TopScores<S>,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore> Session<S> {
    /// New Idle session on the given tier
    pub fn new(tier: Tier, seed: u64, store: S) -> Self {
        Self {
            state: GameState::new(tier, seed),
            top_scores: TopScores::new(store),
            events: Vec::new(),
        }
    }

    /// Change difficulty; ignored unless Idle, keeping current settings
    pub fn select_tier(&mut self, tier: Tier) {
        if self.state.phase != SessionPhase::Idle {
            return;
        }
        self.state.apply_tier(tier);
    }

    /// Start control: Idle -> Countdown, showing the first step immediately
    pub fn start(&mut self) {
        if self.state.phase != SessionPhase::Idle {
            return;
        }
        self.state.phase = SessionPhase::Countdown;
        self.state.countdown_step = 0;
        self.events.push(GameEvent::CountdownStep {
            label: COUNTDOWN_STEPS[0],
        });
    }

    /// One firing of the countdown timer
    ///
    /// Driven by a coarse external timer at one-time-unit intervals, never by
    /// the frame loop. The firing after the last label enters Running.
    pub fn countdown_step(&mut self) {
        if self.state.phase != SessionPhase::Countdown {
            return;
        }
        self.state.countdown_step += 1;
        if self.state.countdown_step < COUNTDOWN_STEPS.len() {
            self.events.push(GameEvent::CountdownStep {
                label: COUNTDOWN_STEPS[self.state.countdown_step],
            });
        } else {
            self.state.begin_run();
            log::info!("run started on {}", self.state.tier.as_str());
            self.events.push(GameEvent::RunStarted);
        }
    }

    /// Pause toggle: Running <-> Paused, ignored elsewhere
    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            SessionPhase::Running => {
                self.state.phase = SessionPhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            SessionPhase::Paused => {
                self.state.phase = SessionPhase::Running;
                self.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    /// Lane-change input; effective only while Running
    pub fn steer(&mut self, dir: Steer) {
        if self.state.phase != SessionPhase::Running {
            return;
        }
        self.state.player.steer(dir, self.state.profile.lane_count);
    }

    /// Restart control: Collided -> Idle, re-arming the start control
    pub fn restart(&mut self) {
        if self.state.phase != SessionPhase::Collided {
            return;
        }
        self.state.reset_to_idle();
        self.events.push(GameEvent::SessionReset);
    }

    /// Per-frame tick; outside Running this declines cooperatively
    pub fn tick(&mut self) {
        let was_running = self.state.phase == SessionPhase::Running;
        sim::tick(&mut self.state, &mut self.events);
        if was_running && self.state.phase == SessionPhase::Collided {
            self.record_run();
        }
    }

    /// Terminal side effect: persist a strictly better score for the tier
    fn record_run(&mut self) {
        let score = self.state.score;
        let previous = self.top_scores.get(self.state.tier);
        if score > previous {
            self.top_scores.set(self.state.tier, score);
            self.events.push(GameEvent::NewTopScore { score, previous });
        }
    }

    /// Stored best score for the active tier
    pub fn top_score(&self) -> u32 {
        self.top_scores.get(self.state.tier)
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> RenderSnapshot {
        self.state.snapshot(self.top_score())
    }

    /// Drain buffered collaborator signals, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }
}
