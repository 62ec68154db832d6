//! Headless simulation core for the magical-affliction colony sandbox.
//!
//! Everything here runs without an engine: organisms live in an arena, the
//! world advances one tick at a time, and afflictions mutate skin, hair, and
//! position through it. Host collaborators (artwork lookup, rendering,
//! cosmetic effects) are injected as trait objects, so the crate is fully
//! exercisable from tests with a seeded RNG.

pub mod afflictions;
pub mod color;
pub mod config;
pub mod extract;
pub mod hooks;
pub mod ingestible;
pub mod map;
pub mod organism;
pub mod schedule;
pub mod texture;
pub mod world;

use thiserror::Error;

pub use afflictions::{
    AfflictionEntry, AfflictionKind, ChromaticSensitivity, HairMutation, RandomRelocation,
};
pub use color::Color;
pub use config::{DAY_TICKS, MaladiesConfig};
pub use extract::{ColorSample, ExtractOptions, dominant_color, extract_color, sample_colors};
pub use hooks::{
    ArtCatalog, ArtSource, EffectEvent, EffectKind, EffectSink, MoteKind, NullArt, NullEffects,
    NullRenderer, RecordingEffects, Renderer, WorldHooks,
};
pub use ingestible::{ArtKey, ColorSource, Ingestible, Ingredient, IngredientSource};
pub use map::{Cell, MapGrid};
pub use organism::{Activity, Organism, OrganismArena, OrganismId, OrganismMap};
pub use schedule::{Tick, is_interval_tick, stagger};
pub use texture::Texture;
pub use world::{AfflictionRequest, RunningTotals, TickEvents, World, WorldSnapshot};

/// Errors surfaced while building a world or its inputs. The tick and
/// ingestion paths never fail; bad inputs there degrade to local no-ops.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A configuration field or combination is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// A pixel buffer does not match its declared dimensions.
    #[error("texture pixel count {actual} does not match {width}x{height}")]
    TextureShape {
        width: u32,
        height: u32,
        actual: usize,
    },
}
