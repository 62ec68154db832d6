//! Organisms and the arena that owns them.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap};

use crate::color::Color;
use crate::map::Cell;

slotmap::new_key_type! {
    /// Stable handle for an organism.
    pub struct OrganismId;
}

/// Convenience alias for associating side data with organisms.
pub type OrganismMap<T> = SecondaryMap<OrganismId, T>;

/// What an organism is currently doing. Stun and vomiting are timed and
/// count down once per tick until the organism goes idle again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Idle,
    Busy { task: Cow<'static, str> },
    Stunned { remaining: u32 },
    Vomiting { remaining: u32 },
}

impl Activity {
    /// Advance a timed activity by one tick.
    pub fn tick_down(&mut self) {
        match self {
            Self::Stunned { remaining } | Self::Vomiting { remaining } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    *self = Self::Idle;
                }
            }
            Self::Idle | Self::Busy { .. } => {}
        }
    }
}

/// A colonist, prisoner, or visitor that afflictions can act on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub name: Cow<'static, str>,
    pub position: Cell,
    /// Base skin tone before any chromatic shift.
    pub skin_color: Color,
    /// Chromatic override; when set it is what observers see.
    pub skin_override: Option<Color>,
    pub hair_color: Color,
    pub asleep: bool,
    pub sedated: bool,
    pub downed: bool,
    /// True while off-map with a trade caravan or transport.
    pub traveling: bool,
    pub activity: Activity,
}

impl Organism {
    #[must_use]
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        position: Cell,
        skin_color: Color,
        hair_color: Color,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            skin_color,
            skin_override: None,
            hair_color,
            asleep: false,
            sedated: false,
            downed: false,
            traveling: false,
            activity: Activity::Idle,
        }
    }

    /// Conscious enough to notice the world: neither asleep nor sedated.
    #[must_use]
    pub const fn awake(&self) -> bool {
        !self.asleep && !self.sedated
    }

    /// Skin color as observers see it, override first.
    #[must_use]
    pub fn display_skin_color(&self) -> Color {
        self.skin_override.unwrap_or(self.skin_color)
    }
}

/// Owner of all organisms. Storage is a slot map for stable handles plus an
/// insertion-ordered handle list so iteration order never depends on key
/// internals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganismArena {
    slots: SlotMap<OrganismId, Organism>,
    handles: Vec<OrganismId>,
}

impl OrganismArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, organism: Organism) -> OrganismId {
        let id = self.slots.insert(organism);
        self.handles.push(id);
        id
    }

    pub fn remove(&mut self, id: OrganismId) -> Option<Organism> {
        let removed = self.slots.remove(id);
        if removed.is_some() {
            self.handles.retain(|handle| *handle != id);
        }
        removed
    }

    #[must_use]
    pub fn get(&self, id: OrganismId) -> Option<&Organism> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: OrganismId) -> Option<&mut Organism> {
        self.slots.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: OrganismId) -> bool {
        self.slots.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handles in insertion order.
    #[must_use]
    pub fn handles(&self) -> &[OrganismId] {
        &self.handles
    }

    /// Iterate organisms in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (OrganismId, &Organism)> {
        self.handles
            .iter()
            .filter_map(|id| self.slots.get(*id).map(|organism| (*id, organism)))
    }
}
