//! Descriptions of consumable items and where their color comes from.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Name under which an art source looks up a texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtKey(Cow<'static, str>);

impl ArtKey {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ArtKey {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for ArtKey {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for ArtKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an ingestible's color is taken from, in order of specificity:
/// a designer-forced color, the tint of the stuff it is made of, the colors
/// of its recipe ingredients, or its own artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorSource {
    Forced(Color),
    Material(Color),
    Ingredients(Vec<Ingredient>),
    Art(ArtKey),
}

/// Where a single recipe ingredient's color is taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IngredientSource {
    Material(Color),
    Art(ArtKey),
}

/// One component of a cooked ingestible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: Cow<'static, str>,
    pub source: IngredientSource,
}

impl Ingredient {
    #[must_use]
    pub fn material(name: impl Into<Cow<'static, str>>, color: Color) -> Self {
        Self {
            name: name.into(),
            source: IngredientSource::Material(color),
        }
    }

    #[must_use]
    pub fn art(name: impl Into<Cow<'static, str>>, key: impl Into<ArtKey>) -> Self {
        Self {
            name: name.into(),
            source: IngredientSource::Art(key.into()),
        }
    }
}

/// Something an organism can eat, drink, or smoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingestible {
    pub name: Cow<'static, str>,
    pub source: ColorSource,
}

impl Ingestible {
    #[must_use]
    pub fn forced(name: impl Into<Cow<'static, str>>, color: Color) -> Self {
        Self {
            name: name.into(),
            source: ColorSource::Forced(color),
        }
    }

    #[must_use]
    pub fn material(name: impl Into<Cow<'static, str>>, color: Color) -> Self {
        Self {
            name: name.into(),
            source: ColorSource::Material(color),
        }
    }

    #[must_use]
    pub fn from_ingredients(
        name: impl Into<Cow<'static, str>>,
        ingredients: Vec<Ingredient>,
    ) -> Self {
        Self {
            name: name.into(),
            source: ColorSource::Ingredients(ingredients),
        }
    }

    #[must_use]
    pub fn from_art(name: impl Into<Cow<'static, str>>, key: impl Into<ArtKey>) -> Self {
        Self {
            name: name.into(),
            source: ColorSource::Art(key.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_wire_the_expected_sources() {
        let meal = Ingestible::from_ingredients(
            "simple meal",
            vec![
                Ingredient::material("berries", Color::new(0.8, 0.1, 0.3)),
                Ingredient::art("rice", "Things/Item/Meal/Rice"),
            ],
        );
        let ColorSource::Ingredients(ingredients) = &meal.source else {
            panic!("expected ingredient source");
        };
        assert_eq!(ingredients.len(), 2);
        assert!(matches!(ingredients[0].source, IngredientSource::Material(_)));
        assert!(matches!(ingredients[1].source, IngredientSource::Art(_)));
    }

    #[test]
    fn art_keys_compare_and_display_by_name() {
        let key = ArtKey::from("Things/Item/Beer");
        assert_eq!(key, ArtKey::new(String::from("Things/Item/Beer")));
        assert_eq!(key.to_string(), "Things/Item/Beer");
    }
}
