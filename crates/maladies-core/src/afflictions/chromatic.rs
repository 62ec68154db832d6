//! Chromatic sensitivity: skin drifts toward the color of everything eaten.

use serde::{Deserialize, Serialize};

use crate::config::MaladiesConfig;

/// Per-organism chromatic state. The cap is copied out of config at attach
/// time so an already-afflicted organism keeps its behavior when config
/// changes under it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromaticSensitivity {
    /// Furthest any single skin channel may move per ingested item.
    pub max_change_per_ingredient: f32,
}

impl ChromaticSensitivity {
    #[must_use]
    pub fn from_config(config: &MaladiesConfig) -> Self {
        Self {
            max_change_per_ingredient: config.max_change_per_ingredient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_copies_the_configured_cap() {
        let config = MaladiesConfig {
            max_change_per_ingredient: 0.25,
            ..MaladiesConfig::default()
        };
        let sensitivity = ChromaticSensitivity::from_config(&config);
        assert_eq!(sensitivity.max_change_per_ingredient, 0.25);
    }
}
