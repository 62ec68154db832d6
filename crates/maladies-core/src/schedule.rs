//! Tick counting and per-organism interval staggering.
//!
//! Periodic afflictions fire on fixed intervals, but firing every affected
//! organism on the same tick causes visible pulses. Each organism instead
//! gets a stable phase offset derived from its handle, spreading an
//! interval's work evenly across the interval.

use serde::{Deserialize, Serialize};
use slotmap::Key;

use crate::organism::OrganismId;

/// Monotonic simulation tick counter.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Stable per-organism phase offset, a splitmix-style mix of the handle bits.
#[must_use]
pub fn stagger(id: OrganismId) -> u64 {
    let mut x = id.data().as_ffi();
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;
    x
}

/// True when `tick` lands on `id`'s phase within `interval`.
///
/// An interval of zero is treated as one, so the check fires every tick
/// rather than never.
#[must_use]
pub fn is_interval_tick(tick: Tick, id: OrganismId, interval: u32) -> bool {
    let interval = u64::from(interval.max(1));
    tick.value().wrapping_add(stagger(id)).is_multiple_of(interval)
}
