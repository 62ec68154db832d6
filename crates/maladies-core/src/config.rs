//! World configuration.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::WorldError;
use crate::extract::ExtractOptions;

/// Ticks in one simulated day.
pub const DAY_TICKS: u32 = 60_000;

/// Every tunable knob of the simulation, with the defaults balance was
/// tuned against. Fields missing from a config file fall back to these
/// defaults, so partial files stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaladiesConfig {
    /// Seed for the world RNG. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Map width in cells.
    pub map_width: u32,
    /// Map height in cells.
    pub map_height: u32,
    /// Ticks in one in-game day.
    pub day_ticks: u32,
    /// Cap on how far one ingredient may pull each skin channel.
    pub max_change_per_ingredient: f32,
    /// Pixels with alpha at or below this never count during extraction.
    pub alpha_threshold: u8,
    /// RGB triples ignored during extraction unless nothing else counts.
    /// Defaults cover packaging brown and outline black.
    pub excluded_colors: Vec<[u8; 3]>,
    /// Blue-channel level above which a blue shift earns a mote.
    pub feeling_blue_threshold: f32,
    /// Bounds for the per-organism hair mutation rate roll.
    pub hair_rate_min: f32,
    pub hair_rate_max: f32,
    /// Bounds for the per-organism relocation rate roll.
    pub relocation_rate_min: f32,
    pub relocation_rate_max: f32,
    /// Base relocation range in cells before severity scaling.
    pub relocation_base_range: u32,
    /// Shortest allowed relocation interval in ticks.
    pub relocation_min_interval: u32,
    /// Shortest allowed relocation range in cells.
    pub relocation_range_floor: u32,
    /// Ring radius searched for a free landing cell.
    pub relocation_probe_radius: u32,
    /// Chance a downed organism still relocates when its interval fires.
    pub relocation_downed_chance: f32,
    /// Bounds for the post-landing stun roll, in ticks.
    pub stun_ticks_min: u32,
    pub stun_ticks_max: u32,
    /// Duration of the post-landing vomiting reaction, in ticks.
    pub vomit_ticks: u32,
    /// Bounds for the landing dust-puff scale roll.
    pub dust_scale_min: f32,
    pub dust_scale_max: f32,
    /// Whether relocations are reported as diary episodes.
    pub log_relocation_episodes: bool,
}

impl Default for MaladiesConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            map_width: 250,
            map_height: 250,
            day_ticks: DAY_TICKS,
            max_change_per_ingredient: 0.1,
            alpha_threshold: 5,
            excluded_colors: vec![[140, 101, 49], [0, 0, 0]],
            feeling_blue_threshold: 0.9,
            hair_rate_min: 0.1,
            hair_rate_max: 2.0,
            relocation_rate_min: 0.8,
            relocation_rate_max: 2.0,
            relocation_base_range: 100,
            relocation_min_interval: 2_500,
            relocation_range_floor: 10,
            relocation_probe_radius: 10,
            relocation_downed_chance: 0.2,
            stun_ticks_min: 50,
            stun_ticks_max: 150,
            vomit_ticks: 600,
            dust_scale_min: 1.5,
            dust_scale_max: 3.0,
            log_relocation_episodes: true,
        }
    }
}

impl MaladiesConfig {
    /// Check cross-field consistency before a world is built around this
    /// config.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(WorldError::InvalidConfig("map dimensions must be at least 1"));
        }
        if self.day_ticks == 0 {
            return Err(WorldError::InvalidConfig("day_ticks must be at least 1"));
        }
        if !(self.max_change_per_ingredient > 0.0 && self.max_change_per_ingredient <= 1.0) {
            return Err(WorldError::InvalidConfig(
                "max_change_per_ingredient must be in (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.feeling_blue_threshold) {
            return Err(WorldError::InvalidConfig(
                "feeling_blue_threshold must be in [0, 1]",
            ));
        }
        if !(self.hair_rate_min > 0.0 && self.hair_rate_min <= self.hair_rate_max) {
            return Err(WorldError::InvalidConfig(
                "hair rate bounds must be positive and ordered",
            ));
        }
        if !(self.relocation_rate_min > 0.0 && self.relocation_rate_min <= self.relocation_rate_max)
        {
            return Err(WorldError::InvalidConfig(
                "relocation rate bounds must be positive and ordered",
            ));
        }
        if self.relocation_min_interval == 0 {
            return Err(WorldError::InvalidConfig(
                "relocation_min_interval must be at least 1",
            ));
        }
        if self.relocation_range_floor == 0 {
            return Err(WorldError::InvalidConfig(
                "relocation_range_floor must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.relocation_downed_chance) {
            return Err(WorldError::InvalidConfig(
                "relocation_downed_chance must be in [0, 1]",
            ));
        }
        if self.stun_ticks_min == 0 || self.stun_ticks_min > self.stun_ticks_max {
            return Err(WorldError::InvalidConfig(
                "stun tick bounds must be positive and ordered",
            ));
        }
        if self.vomit_ticks == 0 {
            return Err(WorldError::InvalidConfig("vomit_ticks must be at least 1"));
        }
        if !(self.dust_scale_min > 0.0 && self.dust_scale_min <= self.dust_scale_max) {
            return Err(WorldError::InvalidConfig(
                "dust scale bounds must be positive and ordered",
            ));
        }
        Ok(())
    }

    /// World RNG, seeded from the config or the OS.
    #[must_use]
    pub fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    /// Extraction knobs derived from this config.
    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            alpha_threshold: self.alpha_threshold,
            excluded: self.excluded_colors.iter().copied().collect(),
        }
    }
}
