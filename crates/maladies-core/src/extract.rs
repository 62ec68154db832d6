//! Dominant-color extraction over textures.
//!
//! The counting pass buckets pixels by exact RGB byte triple, so anti-aliased
//! fringes stay separate from the flat fills they surround. Near-transparent
//! pixels never count, and an exclusion list lets callers ignore colors that
//! belong to packaging rather than contents.

use std::collections::HashMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::hooks::ArtSource;
use crate::ingestible::{ArtKey, IngredientSource};
use crate::texture::Texture;

/// One RGB triple and how many countable pixels carried it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub rgb: [u8; 3],
    pub count: usize,
}

/// Knobs for the extraction pass.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Pixels count only when alpha is strictly greater than this.
    pub alpha_threshold: u8,
    /// RGB triples that lose to any non-excluded color regardless of count.
    pub excluded: HashSet<[u8; 3]>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            alpha_threshold: 5,
            excluded: HashSet::new(),
        }
    }
}

struct Tally {
    rgb: [u8; 3],
    count: usize,
    first_seen: usize,
}

fn tally_pixels(texture: &Texture, alpha_threshold: u8) -> Vec<Tally> {
    let mut buckets: HashMap<[u8; 3], (usize, usize)> = HashMap::new();
    for (index, pixel) in texture.pixels().iter().enumerate() {
        if pixel[3] <= alpha_threshold {
            continue;
        }
        let rgb = [pixel[0], pixel[1], pixel[2]];
        let entry = buckets.entry(rgb).or_insert((0, index));
        entry.0 += 1;
    }
    let mut tallies: Vec<Tally> = buckets
        .into_iter()
        .map(|(rgb, (count, first_seen))| Tally {
            rgb,
            count,
            first_seen,
        })
        .collect();
    tallies.sort_by(|a, b| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));
    tallies
}

/// Every distinct countable color in `texture`, most frequent first.
///
/// Equal counts are ordered by first appearance in row-major order, which
/// keeps the result deterministic for a given texture.
#[must_use]
pub fn sample_colors(texture: &Texture, alpha_threshold: u8) -> Vec<ColorSample> {
    tally_pixels(texture, alpha_threshold)
        .into_iter()
        .map(|tally| ColorSample {
            rgb: tally.rgb,
            count: tally.count,
        })
        .collect()
}

/// The most frequent countable color, preferring non-excluded colors.
///
/// An excluded color wins only when every countable color is excluded.
/// Returns `None` when no pixel passes the alpha threshold; otherwise the
/// winner is reported fully opaque whatever the source alpha was.
#[must_use]
pub fn dominant_color(texture: &Texture, options: &ExtractOptions) -> Option<Color> {
    let tallies = tally_pixels(texture, options.alpha_threshold);
    let winner = tallies
        .iter()
        .find(|tally| !options.excluded.contains(&tally.rgb))
        .or_else(|| tallies.first())?;
    Some(Color::from_rgb8(winner.rgb))
}

/// Dominant color of the artwork behind `key`, if the art source has it.
#[must_use]
pub fn art_color(key: &ArtKey, art: &dyn ArtSource, options: &ExtractOptions) -> Option<Color> {
    dominant_color(art.texture(key)?, options)
}

/// Color an ingredient contributes to a blend. Material tints are taken as
/// given; art-backed ingredients go through extraction and may yield nothing.
#[must_use]
pub fn extract_color(
    ingredient: &IngredientSource,
    art: &dyn ArtSource,
    options: &ExtractOptions,
) -> Option<Color> {
    match ingredient {
        IngredientSource::Material(color) => Some(*color),
        IngredientSource::Art(key) => art_color(key, art, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(colors: &[[u8; 4]], stripe_width: u32) -> Texture {
        let width = stripe_width * colors.len() as u32;
        Texture::from_fn(width, 4, |x, _| colors[(x / stripe_width) as usize])
    }

    #[test]
    fn sample_colors_orders_by_count_then_first_seen() {
        // Red twice as wide as green and blue; green appears before blue.
        let texture = Texture::from_fn(4, 2, |x, _| match x {
            0 | 1 => [255, 0, 0, 255],
            2 => [0, 255, 0, 255],
            _ => [0, 0, 255, 255],
        });
        let samples = sample_colors(&texture, 5);
        assert_eq!(
            samples,
            vec![
                ColorSample {
                    rgb: [255, 0, 0],
                    count: 4
                },
                ColorSample {
                    rgb: [0, 255, 0],
                    count: 2
                },
                ColorSample {
                    rgb: [0, 0, 255],
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn sample_counts_cover_every_countable_pixel() {
        let texture = striped(
            &[[9, 9, 9, 255], [200, 40, 40, 255], [9, 9, 9, 0]],
            3,
        );
        let samples = sample_colors(&texture, 5);
        let total: usize = samples.iter().map(|sample| sample.count).sum();
        let countable = texture.pixels().iter().filter(|p| p[3] > 5).count();
        assert_eq!(total, countable);
    }

    #[test]
    fn dominant_skips_excluded_colors() {
        // Brown dominates by area but is on the exclusion list.
        let texture = striped(&[[140, 101, 49, 255], [140, 101, 49, 255], [30, 200, 90, 255]], 2);
        let options = ExtractOptions {
            excluded: HashSet::from([[140, 101, 49]]),
            ..ExtractOptions::default()
        };
        let winner = dominant_color(&texture, &options).unwrap();
        assert_eq!(winner, Color::from_rgb8([30, 200, 90]));
    }

    #[test]
    fn dominant_falls_back_to_excluded_when_nothing_else_counts() {
        let texture = striped(&[[0, 0, 0, 255], [140, 101, 49, 255]], 2);
        let options = ExtractOptions {
            excluded: HashSet::from([[0, 0, 0], [140, 101, 49]]),
            ..ExtractOptions::default()
        };
        // Both stripes are equal in count, black appears first.
        let winner = dominant_color(&texture, &options).unwrap();
        assert_eq!(winner, Color::BLACK);
    }

    #[test]
    fn dominant_ties_break_by_row_major_first_appearance() {
        let texture = Texture::from_fn(2, 2, |x, y| {
            if (x + y).is_multiple_of(2) {
                [10, 20, 30, 255]
            } else {
                [30, 20, 10, 255]
            }
        });
        let winner = dominant_color(&texture, &ExtractOptions::default()).unwrap();
        assert_eq!(winner, Color::from_rgb8([10, 20, 30]));
    }

    #[test]
    fn transparent_pixels_never_count() {
        let texture = striped(&[[250, 0, 0, 5], [0, 250, 0, 6]], 1);
        let samples = sample_colors(&texture, 5);
        assert_eq!(
            samples,
            vec![ColorSample {
                rgb: [0, 250, 0],
                count: 4
            }]
        );
    }

    #[test]
    fn fully_transparent_texture_has_no_dominant() {
        let texture = Texture::filled(8, 8, [255, 255, 255, 0]);
        assert_eq!(dominant_color(&texture, &ExtractOptions::default()), None);
        assert!(sample_colors(&texture, 5).is_empty());
    }

    #[test]
    fn empty_texture_has_no_dominant() {
        let texture = Texture::from_pixels(0, 0, Vec::new()).unwrap();
        assert_eq!(dominant_color(&texture, &ExtractOptions::default()), None);
    }

    #[test]
    fn dominant_is_fully_opaque() {
        let texture = Texture::filled(2, 2, [90, 90, 90, 128]);
        let winner = dominant_color(&texture, &ExtractOptions::default()).unwrap();
        assert!((winner.a - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ingredient_materials_short_circuit_extraction() {
        use crate::hooks::NullArt;

        let tint = Color::new(0.4, 0.2, 0.9);
        let resolved = extract_color(
            &IngredientSource::Material(tint),
            &NullArt,
            &ExtractOptions::default(),
        );
        assert_eq!(resolved, Some(tint));
    }

    #[test]
    fn art_ingredients_resolve_through_the_source() {
        use crate::hooks::{ArtCatalog, NullArt};

        let mut catalog = ArtCatalog::new();
        catalog.insert("Things/Item/Berries", Texture::filled(4, 4, [200, 30, 60, 255]));
        let options = ExtractOptions::default();

        let hit = extract_color(
            &IngredientSource::Art(ArtKey::from("Things/Item/Berries")),
            &catalog,
            &options,
        );
        assert_eq!(hit, Some(Color::from_rgb8([200, 30, 60])));

        let miss = extract_color(
            &IngredientSource::Art(ArtKey::from("Things/Item/Berries")),
            &NullArt,
            &options,
        );
        assert_eq!(miss, None);
    }
}
