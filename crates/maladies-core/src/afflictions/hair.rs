//! Follicular mutation: hair periodically re-rolls to a random color.

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::config::MaladiesConfig;

/// Per-organism hair mutation state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HairMutation {
    /// Mutation period in days. Rolled once at attach time; lower is wilder.
    pub change_rate: f32,
}

impl HairMutation {
    /// Roll a fresh rate from the configured bounds.
    #[must_use]
    pub fn roll(rng: &mut SmallRng, config: &MaladiesConfig) -> Self {
        Self {
            change_rate: rng.random_range(config.hair_rate_min..=config.hair_rate_max),
        }
    }

    /// Mutation interval in ticks, never below one.
    #[must_use]
    pub fn interval(&self, day_ticks: u32) -> u32 {
        ((self.change_rate * day_ticks as f32) as u32).max(1)
    }
}
