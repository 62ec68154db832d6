//! Spatial displacement: the organism blinks across the map at random.

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::config::MaladiesConfig;

/// Per-organism relocation state. `rate` is rolled once at attach time;
/// `interval` and `range` are derived from rate and severity, and re-derived
/// after every trigger so a worsening condition fires sooner and throws
/// further.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomRelocation {
    /// Individual proneness factor.
    pub rate: f32,
    /// Ticks between trigger opportunities.
    pub interval: u32,
    /// Half-width in cells of the destination square.
    pub range: u32,
}

impl RandomRelocation {
    /// Roll a fresh rate and derive interval and range for `severity`.
    #[must_use]
    pub fn roll(rng: &mut SmallRng, config: &MaladiesConfig, severity: f32) -> Self {
        let mut relocation = Self {
            rate: rng.random_range(config.relocation_rate_min..=config.relocation_rate_max),
            interval: 1,
            range: 1,
        };
        relocation.rescale(severity, config);
        relocation
    }

    /// Re-derive interval and range from the current severity.
    ///
    /// The interval shrinks from `rate` days at severity 0 down to the
    /// configured minimum as severity approaches 1; the full float product is
    /// clamped, so intermediate severities scale smoothly instead of
    /// collapsing to the bounds. The range grows from the configured floor up
    /// to the map width.
    pub fn rescale(&mut self, severity: f32, config: &MaladiesConfig) {
        let severity = severity.clamp(0.0, 1.0);
        let day = config.day_ticks as f32;

        let ceiling = ((self.rate * day) as u32).max(config.relocation_min_interval);
        let raw_interval = ((1.0 - severity) * self.rate * day) as u32;
        self.interval = raw_interval
            .clamp(config.relocation_min_interval, ceiling)
            .max(1);

        let span = config.map_width.max(config.relocation_range_floor);
        let raw_range = (severity * self.rate * config.relocation_base_range as f32) as u32;
        self.range = raw_range.clamp(config.relocation_range_floor, span);
    }
}
