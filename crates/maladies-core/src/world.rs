//! The simulation world: organisms, their afflictions, and the tick pipeline.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::WorldError;
use crate::afflictions::{
    AfflictionEntry, AfflictionKind, ChromaticSensitivity, HairMutation, RandomRelocation,
};
use crate::color::Color;
use crate::config::MaladiesConfig;
use crate::extract::{art_color, extract_color};
use crate::hooks::{
    ArtSource, EffectEvent, EffectKind, EffectSink, MoteKind, Renderer, WorldHooks,
};
use crate::ingestible::{ColorSource, Ingestible};
use crate::map::{Cell, MapGrid};
use crate::organism::{Activity, Organism, OrganismArena, OrganismId, OrganismMap};
use crate::schedule::{Tick, is_interval_tick};

/// Which affliction to attach. Attach-time rolls run inside the world so
/// all randomness stays on the world RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AfflictionRequest {
    Chromatic,
    Hair,
    Relocation,
}

/// What one call to [`World::step`] did, for observers and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvents {
    /// The tick that was just simulated.
    pub tick: Tick,
    pub hair_mutations: u32,
    pub relocations: u32,
}

impl TickEvents {
    #[must_use]
    const fn new(tick: Tick) -> Self {
        Self {
            tick,
            hair_mutations: 0,
            relocations: 0,
        }
    }
}

/// Counters accumulated since the world was created. Not part of snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningTotals {
    pub ingestions: u64,
    pub hair_mutations: u64,
    pub relocations: u64,
}

/// Serializable world state: everything needed to rebuild a world except the
/// injected hooks, which are reattached by the caller, and the RNG, which
/// restarts from the configured seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub config: MaladiesConfig,
    pub tick: Tick,
    pub organisms: OrganismArena,
    pub afflictions: OrganismMap<Vec<AfflictionEntry>>,
    pub map: MapGrid,
}

/// Top-level simulation state.
///
/// All mutation funnels through `&mut self` methods; stepping is strictly
/// single-threaded and organisms are processed in insertion order, so equal
/// seeds give equal histories.
pub struct World {
    config: MaladiesConfig,
    tick: Tick,
    rng: SmallRng,
    organisms: OrganismArena,
    afflictions: OrganismMap<Vec<AfflictionEntry>>,
    map: MapGrid,
    art: Box<dyn ArtSource>,
    effects: Box<dyn EffectSink>,
    renderer: Box<dyn Renderer>,
    totals: RunningTotals,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("organisms", &self.organisms.len())
            .field("map_width", &self.map.width())
            .field("map_height", &self.map.height())
            .finish_non_exhaustive()
    }
}

impl World {
    /// Build a world with null hooks.
    pub fn new(config: MaladiesConfig) -> Result<Self, WorldError> {
        Self::with_hooks(config, WorldHooks::default())
    }

    /// Build a world with the given collaborators.
    pub fn with_hooks(config: MaladiesConfig, hooks: WorldHooks) -> Result<Self, WorldError> {
        config.validate()?;
        let rng = config.seeded_rng();
        let map = MapGrid::open(config.map_width, config.map_height);
        Ok(Self {
            config,
            tick: Tick::ZERO,
            rng,
            organisms: OrganismArena::new(),
            afflictions: OrganismMap::new(),
            map,
            art: hooks.art,
            effects: hooks.effects,
            renderer: hooks.renderer,
            totals: RunningTotals::default(),
        })
    }

    /// Rebuild a world from a snapshot, with null hooks attached.
    pub fn from_snapshot(snapshot: WorldSnapshot) -> Result<Self, WorldError> {
        snapshot.config.validate()?;
        let rng = snapshot.config.seeded_rng();
        Ok(Self {
            rng,
            tick: snapshot.tick,
            organisms: snapshot.organisms,
            afflictions: snapshot.afflictions,
            map: snapshot.map,
            config: snapshot.config,
            art: WorldHooks::default().art,
            effects: WorldHooks::default().effects,
            renderer: WorldHooks::default().renderer,
            totals: RunningTotals::default(),
        })
    }

    /// Serializable copy of the simulation state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            config: self.config.clone(),
            tick: self.tick,
            organisms: self.organisms.clone(),
            afflictions: self.afflictions.clone(),
            map: self.map.clone(),
        }
    }

    pub fn set_art_source(&mut self, art: Box<dyn ArtSource>) {
        self.art = art;
    }

    pub fn set_effect_sink(&mut self, effects: Box<dyn EffectSink>) {
        self.effects = effects;
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = renderer;
    }

    #[must_use]
    pub fn config(&self) -> &MaladiesConfig {
        &self.config
    }

    #[must_use]
    pub const fn tick(&self) -> Tick {
        self.tick
    }

    #[must_use]
    pub fn map(&self) -> &MapGrid {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapGrid {
        &mut self.map
    }

    #[must_use]
    pub fn organisms(&self) -> &OrganismArena {
        &self.organisms
    }

    #[must_use]
    pub fn organism(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.get(id)
    }

    pub fn organism_mut(&mut self, id: OrganismId) -> Option<&mut Organism> {
        self.organisms.get_mut(id)
    }

    #[must_use]
    pub const fn totals(&self) -> RunningTotals {
        self.totals
    }

    /// Afflictions attached to `id`, empty for unknown organisms.
    #[must_use]
    pub fn afflictions(&self, id: OrganismId) -> &[AfflictionEntry] {
        self.afflictions.get(id).map_or(&[], Vec::as_slice)
    }

    /// Add an organism. Its position is clamped onto the map.
    pub fn spawn_organism(&mut self, mut organism: Organism) -> OrganismId {
        organism.position = self.map.clamp(organism.position);
        self.organisms.insert(organism)
    }

    /// Remove an organism and everything attached to it.
    pub fn remove_organism(&mut self, id: OrganismId) -> Option<Organism> {
        self.afflictions.remove(id);
        self.organisms.remove(id)
    }

    /// Attach an affliction, running its attach-time rolls. Returns false
    /// when the organism does not exist.
    pub fn afflict(&mut self, id: OrganismId, request: AfflictionRequest, severity: f32) -> bool {
        if !self.organisms.contains(id) {
            return false;
        }
        let severity = severity.clamp(0.0, 1.0);
        let kind = match request {
            AfflictionRequest::Chromatic => {
                AfflictionKind::Chromatic(ChromaticSensitivity::from_config(&self.config))
            }
            AfflictionRequest::Hair => {
                AfflictionKind::Hair(HairMutation::roll(&mut self.rng, &self.config))
            }
            AfflictionRequest::Relocation => AfflictionKind::Relocation(RandomRelocation::roll(
                &mut self.rng,
                &self.config,
                severity,
            )),
        };
        let entry = AfflictionEntry::new(severity, kind);
        if let Some(list) = self.afflictions.get_mut(id) {
            list.push(entry);
        } else {
            self.afflictions.insert(id, vec![entry]);
        }
        true
    }

    /// Run one ingestion event: blend the organism's skin toward whatever it
    /// just consumed.
    ///
    /// Without a chromatic sensitivity affliction this is a no-op returning
    /// `None`. Otherwise the displayed skin color is folded toward the
    /// ingestible's color sources, the result is committed as the skin
    /// override, and the renderer is notified. Returns the committed color,
    /// which equals the starting color when every extraction failed.
    pub fn ingest(&mut self, id: OrganismId, ingestible: &Ingestible) -> Option<Color> {
        let max_change = self.afflictions.get(id)?.iter().find_map(|entry| {
            match &entry.kind {
                AfflictionKind::Chromatic(state) => Some(state.max_change_per_ingredient),
                _ => None,
            }
        })?;
        let organism = self.organisms.get(id)?;
        let starting = organism.display_skin_color();
        let awake = organism.awake();
        let position = organism.position;

        let options = self.config.extract_options();
        let mut color = starting;
        match &ingestible.source {
            ColorSource::Forced(target) | ColorSource::Material(target) => {
                color = color.toward(*target, max_change);
            }
            ColorSource::Ingredients(ingredients) => {
                // Strictly sequential fold; a failed extraction skips its
                // ingredient rather than aborting the meal.
                for ingredient in ingredients {
                    if let Some(target) =
                        extract_color(&ingredient.source, self.art.as_ref(), &options)
                    {
                        color = color.toward(target, max_change);
                    }
                }
            }
            ColorSource::Art(key) => {
                if let Some(target) = art_color(key, self.art.as_ref(), &options) {
                    color = color.toward(target, max_change);
                }
            }
        }

        if let Some(organism) = self.organisms.get_mut(id) {
            organism.skin_override = Some(color);
        }
        self.renderer.mark_appearance_dirty(id);
        self.renderer.invalidate_portrait(id);
        self.totals.ingestions += 1;

        if color.b > self.config.feeling_blue_threshold && color.b > starting.b && awake {
            self.emit_effect(
                id,
                EffectKind::TextMote {
                    mote: MoteKind::FeelingBlue,
                    cell: position,
                },
            );
        }
        Some(color)
    }

    /// Advance the world by one tick.
    pub fn step(&mut self) -> TickEvents {
        let mut events = TickEvents::new(self.tick);
        let ids: Vec<OrganismId> = self.organisms.handles().to_vec();
        self.stage_activities(&ids);
        self.stage_hair(&ids, &mut events);
        self.stage_relocation(&ids, &mut events);
        self.tick = self.tick.next();
        events
    }

    fn stage_activities(&mut self, ids: &[OrganismId]) {
        for &id in ids {
            if let Some(organism) = self.organisms.get_mut(id) {
                organism.activity.tick_down();
            }
        }
    }

    fn stage_hair(&mut self, ids: &[OrganismId], events: &mut TickEvents) {
        for &id in ids {
            let Some(interval) = self.hair_interval(id) else {
                continue;
            };
            if !is_interval_tick(self.tick, id, interval) {
                continue;
            }
            let fresh = Color::new(
                self.rng.random::<f32>(),
                self.rng.random::<f32>(),
                self.rng.random::<f32>(),
            );
            let Some(organism) = self.organisms.get_mut(id) else {
                continue;
            };
            organism.hair_color = fresh;
            let awake = organism.awake();
            let position = organism.position;
            self.renderer.mark_appearance_dirty(id);
            self.renderer.invalidate_portrait(id);
            if awake {
                self.emit_effect(
                    id,
                    EffectKind::TextMote {
                        mote: MoteKind::HairMutation,
                        cell: position,
                    },
                );
            }
            events.hair_mutations += 1;
            self.totals.hair_mutations += 1;
        }
    }

    fn stage_relocation(&mut self, ids: &[OrganismId], events: &mut TickEvents) {
        for &id in ids {
            self.try_relocate(id, events);
        }
    }

    fn try_relocate(&mut self, id: OrganismId, events: &mut TickEvents) {
        let Some((entry_index, relocation, severity)) = self.relocation_state(id) else {
            return;
        };
        if !is_interval_tick(self.tick, id, relocation.interval) {
            return;
        }
        let Some(organism) = self.organisms.get(id) else {
            return;
        };
        if !organism.awake() || organism.traveling {
            return;
        }
        let downed = organism.downed;
        let origin = organism.position;
        if downed && !self.rng.random_bool(f64::from(self.config.relocation_downed_chance)) {
            return;
        }

        let span = relocation.range as i32;
        let approx = self.map.clamp(Cell::new(
            origin.x + self.rng.random_range(-span..=span),
            origin.y + self.rng.random_range(-span..=span),
        ));
        let occupied: HashSet<Cell> = self
            .organisms
            .iter()
            .filter(|(other, _)| *other != id)
            .map(|(_, organism)| organism.position)
            .collect();
        let Some(dest) = self.map.find_free_cell_near(
            approx,
            self.config.relocation_probe_radius,
            &mut self.rng,
            |cell| !occupied.contains(&cell),
        ) else {
            // Nowhere to land; skip the whole episode this trigger.
            return;
        };

        let mote_before = self.rng.random_bool(0.5);
        if mote_before {
            self.emit_effect(
                id,
                EffectKind::TextMote {
                    mote: MoteKind::RelocationDeparture,
                    cell: origin,
                },
            );
        }

        if let Some(organism) = self.organisms.get_mut(id) {
            organism.position = dest;
        }
        let scale = self
            .rng
            .random_range(self.config.dust_scale_min..=self.config.dust_scale_max);
        self.emit_effect(id, EffectKind::DustPuff { cell: dest, scale });
        self.emit_effect(id, EffectKind::SkipPulse { cell: approx });

        if self.rng.random_bool(0.5) {
            let ticks = self
                .rng
                .random_range(self.config.stun_ticks_min..=self.config.stun_ticks_max);
            if let Some(organism) = self.organisms.get_mut(id) {
                organism.activity = Activity::Stunned { remaining: ticks };
            }
        } else if let Some(organism) = self.organisms.get_mut(id) {
            organism.activity = Activity::Vomiting {
                remaining: self.config.vomit_ticks,
            };
        }

        if self.config.log_relocation_episodes {
            self.emit_effect(
                id,
                EffectKind::RelocationEpisode {
                    from: origin,
                    to: dest,
                },
            );
        }
        if !mote_before {
            self.emit_effect(
                id,
                EffectKind::TextMote {
                    mote: MoteKind::RelocationArrival,
                    cell: dest,
                },
            );
        }

        if let Some(entries) = self.afflictions.get_mut(id)
            && let Some(entry) = entries.get_mut(entry_index)
            && let AfflictionKind::Relocation(state) = &mut entry.kind
        {
            state.rescale(severity, &self.config);
        }
        events.relocations += 1;
        self.totals.relocations += 1;
    }

    fn hair_interval(&self, id: OrganismId) -> Option<u32> {
        self.afflictions.get(id)?.iter().find_map(|entry| match &entry.kind {
            AfflictionKind::Hair(state) => Some(state.interval(self.config.day_ticks)),
            _ => None,
        })
    }

    fn relocation_state(&self, id: OrganismId) -> Option<(usize, RandomRelocation, f32)> {
        let entries = self.afflictions.get(id)?;
        entries
            .iter()
            .enumerate()
            .find_map(|(index, entry)| match &entry.kind {
                AfflictionKind::Relocation(state) => Some((index, *state, entry.severity)),
                _ => None,
            })
    }

    fn emit_effect(&mut self, organism: OrganismId, kind: EffectKind) {
        let event = EffectEvent {
            tick: self.tick,
            organism,
            kind,
        };
        self.effects.emit(&event);
    }
}
