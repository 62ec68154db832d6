//! Snapshot files and episode logging for the maladies simulation.
//!
//! Snapshots are pretty-printed JSON so a save can be inspected and diffed by
//! hand. The episode log is an in-memory [`EffectSink`] with bounded capacity;
//! [`SharedEpisodeLog`] wraps it in `Arc<Mutex<..>>` so the world can own a
//! sink while the application keeps querying it.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::{Arc, Mutex};

use maladies_core::{EffectEvent, EffectKind, EffectSink, WorldSnapshot};
use thiserror::Error;

const DEFAULT_LOG_CAPACITY: usize = 1024;

/// Storage error wrapper.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a snapshot as pretty-printed JSON.
pub fn save_snapshot(path: &Path, snapshot: &WorldSnapshot) -> Result<(), StorageError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), snapshot)?;
    Ok(())
}

/// Read a snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> Result<WorldSnapshot, StorageError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Coarse event class used for counting queries against the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeKind {
    TextMote,
    DustPuff,
    SkipPulse,
    Relocation,
}

impl EpisodeKind {
    fn matches(self, kind: &EffectKind) -> bool {
        match self {
            Self::TextMote => matches!(kind, EffectKind::TextMote { .. }),
            Self::DustPuff => matches!(kind, EffectKind::DustPuff { .. }),
            Self::SkipPulse => matches!(kind, EffectKind::SkipPulse { .. }),
            Self::Relocation => matches!(kind, EffectKind::RelocationEpisode { .. }),
        }
    }
}

/// Bounded in-memory record of emitted effects, oldest first. When full, new
/// events evict the oldest.
#[derive(Debug)]
pub struct EpisodeLog {
    capacity: usize,
    events: VecDeque<EffectEvent>,
}

impl Default for EpisodeLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl EpisodeLog {
    /// Log retaining at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
        }
    }

    pub fn record(&mut self, event: EffectEvent) {
        self.events.push_back(event);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Retained events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EffectEvent> {
        self.events.iter()
    }

    /// The most recent `n` events, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<EffectEvent> {
        self.events
            .iter()
            .skip(self.events.len().saturating_sub(n))
            .cloned()
            .collect()
    }

    /// How many retained events fall in the given class.
    #[must_use]
    pub fn count_of(&self, kind: EpisodeKind) -> usize {
        self.events
            .iter()
            .filter(|event| kind.matches(&event.kind))
            .count()
    }

    /// Write the retained events as a JSON array.
    pub fn export_json(&self, path: &Path) -> Result<(), StorageError> {
        let file = File::create(path)?;
        let events: Vec<&EffectEvent> = self.events.iter().collect();
        serde_json::to_writer_pretty(BufWriter::new(file), &events)?;
        Ok(())
    }
}

impl EffectSink for EpisodeLog {
    fn emit(&mut self, event: &EffectEvent) {
        self.record(event.clone());
    }
}

/// Cloneable handle to a log shared between the world and its observers.
#[derive(Debug, Clone)]
pub struct SharedEpisodeLog(Arc<Mutex<EpisodeLog>>);

impl Default for SharedEpisodeLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl SharedEpisodeLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self(Arc::new(Mutex::new(EpisodeLog::new(capacity))))
    }

    /// Boxed sink handle for the world to own.
    #[must_use]
    pub fn sink(&self) -> Box<dyn EffectSink> {
        Box::new(self.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.lock().map(|log| log.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<EffectEvent> {
        self.0.lock().map(|log| log.recent(n)).unwrap_or_default()
    }

    #[must_use]
    pub fn count_of(&self, kind: EpisodeKind) -> usize {
        self.0.lock().map(|log| log.count_of(kind)).unwrap_or(0)
    }

    /// Write the retained events as a JSON array. A poisoned log exports
    /// nothing and reports success.
    pub fn export_json(&self, path: &Path) -> Result<(), StorageError> {
        if let Ok(log) = self.0.lock() {
            log.export_json(path)?;
        }
        Ok(())
    }
}

impl EffectSink for SharedEpisodeLog {
    fn emit(&mut self, event: &EffectEvent) {
        if let Ok(mut log) = self.0.lock() {
            log.record(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maladies_core::{Cell, MoteKind, OrganismId, Tick};

    fn event(tick: u64, kind: EffectKind) -> EffectEvent {
        EffectEvent {
            tick: Tick(tick),
            organism: OrganismId::default(),
            kind,
        }
    }

    fn pulse(tick: u64) -> EffectEvent {
        event(tick, EffectKind::SkipPulse { cell: Cell::new(1, 1) })
    }

    #[test]
    fn log_evicts_oldest_when_full() {
        let mut log = EpisodeLog::new(3);
        for tick in 0..5 {
            log.record(pulse(tick));
        }
        assert_eq!(log.len(), 3);
        let ticks: Vec<u64> = log.iter().map(|e| e.tick.value()).collect();
        assert_eq!(ticks, vec![2, 3, 4]);
    }

    #[test]
    fn recent_returns_the_newest_in_order() {
        let mut log = EpisodeLog::new(10);
        for tick in 0..6 {
            log.record(pulse(tick));
        }
        let last_two: Vec<u64> = log.recent(2).iter().map(|e| e.tick.value()).collect();
        assert_eq!(last_two, vec![4, 5]);
        assert_eq!(log.recent(100).len(), 6);
    }

    #[test]
    fn counting_distinguishes_event_classes() {
        let mut log = EpisodeLog::new(10);
        log.record(pulse(0));
        log.record(event(
            1,
            EffectKind::RelocationEpisode {
                from: Cell::new(0, 0),
                to: Cell::new(3, 3),
            },
        ));
        log.record(event(
            2,
            EffectKind::TextMote {
                mote: MoteKind::FeelingBlue,
                cell: Cell::new(3, 3),
            },
        ));
        assert_eq!(log.count_of(EpisodeKind::SkipPulse), 1);
        assert_eq!(log.count_of(EpisodeKind::Relocation), 1);
        assert_eq!(log.count_of(EpisodeKind::TextMote), 1);
        assert_eq!(log.count_of(EpisodeKind::DustPuff), 0);
    }

    #[test]
    fn shared_handles_see_each_others_writes() {
        let shared = SharedEpisodeLog::new(8);
        let mut sink = shared.sink();
        sink.emit(&pulse(7));
        sink.emit(&pulse(8));
        assert_eq!(shared.len(), 2);
        assert_eq!(shared.recent(1)[0].tick, Tick(8));
        assert_eq!(shared.count_of(EpisodeKind::SkipPulse), 2);
    }

    #[test]
    fn zero_capacity_log_retains_nothing() {
        let mut log = EpisodeLog::new(0);
        log.record(pulse(1));
        assert!(log.is_empty());
    }
}
