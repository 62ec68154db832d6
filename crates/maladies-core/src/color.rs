//! Color value type and the bounded per-channel blend used by chromatic
//! afflictions.

use serde::{Deserialize, Serialize};

/// Normalized RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Construct a fully opaque color.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Construct a color with an explicit alpha channel.
    #[must_use]
    pub const fn with_alpha(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert an RGB byte triple to a fully opaque normalized color.
    #[must_use]
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::new(
            f32::from(rgb[0]) / 255.0,
            f32::from(rgb[1]) / 255.0,
            f32::from(rgb[2]) / 255.0,
        )
    }

    /// Quantize back to an RGB byte triple, dropping alpha.
    #[must_use]
    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Move every RGB channel toward `target` by at most `max_delta`.
    ///
    /// Channels step independently: a channel already within `max_delta` of
    /// its target lands exactly on it, so repeated blends converge without
    /// overshoot or oscillation. Alpha is left untouched.
    #[must_use]
    pub fn toward(self, target: Self, max_delta: f32) -> Self {
        Self {
            r: step_channel(self.r, target.r, max_delta),
            g: step_channel(self.g, target.g, max_delta),
            b: step_channel(self.b, target.b, max_delta),
            a: self.a,
        }
    }
}

fn step_channel(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(diff)
    }
}
