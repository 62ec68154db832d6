//! Magical afflictions an organism can carry.

pub mod chromatic;
pub mod hair;
pub mod relocation;

use serde::{Deserialize, Serialize};

pub use chromatic::ChromaticSensitivity;
pub use hair::HairMutation;
pub use relocation::RandomRelocation;

/// Which condition an [`AfflictionEntry`] expresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AfflictionKind {
    Chromatic(ChromaticSensitivity),
    Hair(HairMutation),
    Relocation(RandomRelocation),
}

/// One attached affliction plus how far it has progressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfflictionEntry {
    /// Progression in `[0, 1]`; 0 is dormant, 1 is fully expressed.
    pub severity: f32,
    pub kind: AfflictionKind,
}

impl AfflictionEntry {
    /// Build an entry, clamping severity into `[0, 1]`.
    #[must_use]
    pub fn new(severity: f32, kind: AfflictionKind) -> Self {
        Self {
            severity: severity.clamp(0.0, 1.0),
            kind,
        }
    }
}
