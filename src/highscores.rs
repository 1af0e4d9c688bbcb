//! Per-tier best score table
//!
//! Persisted through the injected [`KeyValueStore`], one string-encoded
//! integer per tier. The table itself does not enforce monotonicity; the
//! session compares before writing.

use crate::difficulty::Tier;
use crate::platform::KeyValueStore;

/// Storage key prefix; the tier name is appended
const KEY_PREFIX: &str = "top_score_";

/// Best score per difficulty tier, backed by a key-value store
#[derive(Debug, Clone)]
pub struct TopScores<S> {
    store: S,
}

impl<S: KeyValueStore> TopScores<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(tier: Tier) -> String {
        format!("{}{}", KEY_PREFIX, tier.as_str())
    }

    /// Best score for a tier; missing or unreadable entries count as 0
    pub fn get(&self, tier: Tier) -> u32 {
        let Some(raw) = self.store.load(&Self::key(tier)) else {
            return 0;
        };
        match raw.trim().parse() {
            Ok(score) => score,
            Err(_) => {
                log::warn!("ignoring corrupt top score for {}: {:?}", tier.as_str(), raw);
                0
            }
        }
    }

    /// Write a tier's best score through to the store
    pub fn set(&mut self, tier: Tier, score: u32) {
        self.store.save(&Self::key(tier), &score.to_string());
        log::info!("top score for {} is now {}", tier.as_str(), score);
    }
}
