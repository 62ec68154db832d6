//! Host-engine collaborators, abstracted behind capability traits.
//!
//! The simulation core never talks to a renderer, sound system, or art
//! database directly. It asks an [`ArtSource`] for textures, tells a
//! [`Renderer`] when an organism's look changed, and hands visual or audible
//! side effects to an [`EffectSink`]. Headless runs plug in the null
//! implementations and lose nothing but spectacle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::ingestible::ArtKey;
use crate::map::Cell;
use crate::organism::OrganismId;
use crate::schedule::Tick;
use crate::texture::Texture;

/// Provider of item artwork for color extraction.
pub trait ArtSource: Send {
    fn texture(&self, key: &ArtKey) -> Option<&Texture>;
}

/// Appearance invalidation hooks on the rendering side.
pub trait Renderer: Send {
    /// The organism's body graphics need a rebuild.
    fn mark_appearance_dirty(&mut self, id: OrganismId);
    /// The organism's cached portrait is stale.
    fn invalidate_portrait(&mut self, id: OrganismId);
}

/// Receiver for cosmetic side effects the simulation wants shown.
pub trait EffectSink: Send {
    fn emit(&mut self, event: &EffectEvent);
}

/// Floating-text flavor attached to a mote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoteKind {
    FeelingBlue,
    HairMutation,
    RelocationDeparture,
    RelocationArrival,
}

impl MoteKind {
    /// Text shown above the organism's head.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FeelingBlue => "Feeling blue...",
            Self::HairMutation => "My hair!",
            Self::RelocationDeparture => "Going somewhere?",
            Self::RelocationArrival => "Where am I?",
        }
    }
}

/// One cosmetic side effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Floating text at a cell.
    TextMote { mote: MoteKind, cell: Cell },
    /// Dust kicked up at a cell, with a visual scale factor.
    DustPuff { cell: Cell, scale: f32 },
    /// Crackle and flash of a teleport at a cell.
    SkipPulse { cell: Cell },
    /// A relocation worth a diary entry.
    RelocationEpisode { from: Cell, to: Cell },
}

/// A cosmetic side effect, stamped with when and to whom it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEvent {
    pub tick: Tick,
    pub organism: OrganismId,
    pub kind: EffectKind,
}

/// Art source with no artwork at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullArt;

impl ArtSource for NullArt {
    fn texture(&self, _key: &ArtKey) -> Option<&Texture> {
        None
    }
}

/// Renderer that discards invalidations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn mark_appearance_dirty(&mut self, _id: OrganismId) {}
    fn invalidate_portrait(&mut self, _id: OrganismId) {}
}

/// Effect sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn emit(&mut self, _event: &EffectEvent) {}
}

/// In-memory art source backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct ArtCatalog {
    textures: HashMap<ArtKey, Texture>,
}

impl ArtCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture, returning any texture previously under the key.
    pub fn insert(&mut self, key: impl Into<ArtKey>, texture: Texture) -> Option<Texture> {
        self.textures.insert(key.into(), texture)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl ArtSource for ArtCatalog {
    fn texture(&self, key: &ArtKey) -> Option<&Texture> {
        self.textures.get(key)
    }
}

/// Effect sink that keeps every event, in emission order. Handles are cheap
/// clones over one shared buffer, so a caller can keep one for reading while
/// a world owns another as its sink.
#[derive(Debug, Clone, Default)]
pub struct RecordingEffects {
    events: Arc<Mutex<Vec<EffectEvent>>>,
}

impl RecordingEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed sink handle for a world to own.
    #[must_use]
    pub fn sink(&self) -> Box<dyn EffectSink> {
        Box::new(self.clone())
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<EffectEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EffectSink for RecordingEffects {
    fn emit(&mut self, event: &EffectEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Bundle of collaborator implementations handed to a world at build time.
pub struct WorldHooks {
    pub art: Box<dyn ArtSource>,
    pub effects: Box<dyn EffectSink>,
    pub renderer: Box<dyn Renderer>,
}

impl Default for WorldHooks {
    fn default() -> Self {
        Self {
            art: Box::new(NullArt),
            effects: Box::new(NullEffects),
            renderer: Box::new(NullRenderer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_serves_registered_textures() {
        let mut catalog = ArtCatalog::new();
        assert!(catalog.is_empty());
        catalog.insert("Things/Item/Beer", Texture::filled(2, 2, [200, 160, 40, 255]));
        let key = ArtKey::from("Things/Item/Beer");
        assert!(catalog.texture(&key).is_some());
        assert!(catalog.texture(&ArtKey::from("Things/Item/Unknown")).is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn recording_handles_share_one_buffer() {
        let recorder = RecordingEffects::new();
        let mut sink = recorder.sink();
        let organism = OrganismId::default();
        for (index, cell) in [Cell::new(1, 1), Cell::new(2, 2)].into_iter().enumerate() {
            sink.emit(&EffectEvent {
                tick: Tick(index as u64),
                organism,
                kind: EffectKind::SkipPulse { cell },
            });
        }
        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tick, Tick(0));
        assert!(matches!(
            events[1].kind,
            EffectKind::SkipPulse {
                cell: Cell { x: 2, y: 2 }
            }
        ));
    }

    #[test]
    fn mote_labels_match_the_on_screen_text() {
        assert_eq!(MoteKind::FeelingBlue.label(), "Feeling blue...");
        assert_eq!(MoteKind::HairMutation.label(), "My hair!");
        assert_eq!(MoteKind::RelocationDeparture.label(), "Going somewhere?");
        assert_eq!(MoteKind::RelocationArrival.label(), "Where am I?");
    }
}
