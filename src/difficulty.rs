//! Difficulty tiers and their profiles
//!
//! The tier set is closed: anything outside {easy, medium, hard} is an
//! integration defect and fails loudly. Everything a tier controls lives in
//! its immutable [`DifficultyProfile`]; a profile is selected once per
//! session, never mid-run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty tier levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tier {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Unknown difficulty tier name passed to [`Tier::from_name`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty tier: {0:?}")]
pub struct UnknownTier(pub String);

/// Per-tier gameplay parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Number of discrete lanes
    pub lane_count: u32,
    /// Spawn is refused once this many obstacles are live
    pub max_obstacles: usize,
    /// Added to speed at each score multiple of ten
    pub speed_increment: f32,
    /// Speed at the start of a run (pixels per tick)
    pub base_speed: f32,
}

impl Tier {
    /// All tiers, in display order
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }

    /// Parse a tier name from the difficulty selector
    pub fn from_name(name: &str) -> Result<Self, UnknownTier> {
        match name.to_lowercase().as_str() {
            "easy" => Ok(Tier::Easy),
            "medium" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            _ => Err(UnknownTier(name.to_string())),
        }
    }

    /// Static profile lookup
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Tier::Easy => DifficultyProfile {
                lane_count: 4,
                max_obstacles: 2,
                speed_increment: 0.5,
                base_speed: 2.0,
            },
            Tier::Medium => DifficultyProfile {
                lane_count: 5,
                max_obstacles: 3,
                speed_increment: 0.75,
                base_speed: 3.0,
            },
            Tier::Hard => DifficultyProfile {
                lane_count: 6,
                max_obstacles: 4,
                speed_increment: 1.0,
                base_speed: 4.0,
            },
        }
    }
}

impl DifficultyProfile {
    /// Width of a single lane under this profile
    #[inline]
    pub fn lane_width(&self) -> f32 {
        crate::lane_width(self.lane_count)
    }

    /// Center lane the player starts in
    #[inline]
    pub fn home_lane(&self) -> u32 {
        self.lane_count / 2
    }
}
