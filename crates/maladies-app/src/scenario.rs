//! Demo colony, pantry, and synthetic artwork for the `run` subcommand.

use std::borrow::Cow;

use maladies_core::{
    AfflictionRequest, ArtCatalog, Cell, Color, Ingestible, Ingredient, Organism, OrganismId,
    Texture, World,
};

const NAMES: [&str; 8] = [
    "Ada", "Brin", "Cole", "Dara", "Edda", "Fenn", "Gale", "Hoss",
];

const SKIN_TONES: [[u8; 3]; 4] = [
    [242, 212, 189],
    [224, 187, 150],
    [173, 121, 85],
    [96, 60, 34],
];

const HAIR_SHADES: [[u8; 3]; 4] = [
    [35, 24, 18],
    [120, 72, 30],
    [188, 146, 72],
    [210, 60, 40],
];

/// Meals covering every way an ingestible can carry color: a forced
/// override, a stuff color, an ingredient fold, and a texture lookup.
pub fn demo_pantry() -> Vec<Ingestible> {
    vec![
        Ingestible::forced("chroma syrup", Color::from_rgb8([64, 120, 230])),
        Ingestible::material("ration loaf", Color::from_rgb8([172, 124, 62])),
        Ingestible::from_ingredients(
            "forager stew",
            vec![
                Ingredient::material("carrot", Color::from_rgb8([237, 145, 33])),
                Ingredient::art("berries", "Things/Plant/Berries"),
                Ingredient::material("kale", Color::from_rgb8([52, 130, 40])),
            ],
        ),
        Ingestible::from_art("amber beer", "Things/Item/Beer"),
    ]
}

/// Textures backing the art-sourced pantry entries. The beer sprite keeps a
/// black outline so the exclusion list has something to skip over.
pub fn demo_catalog() -> ArtCatalog {
    let mut catalog = ArtCatalog::new();
    catalog.insert(
        "Things/Item/Beer",
        Texture::from_fn(16, 16, |x, y| {
            let on_border = x == 0 || y == 0 || x == 15 || y == 15;
            if on_border {
                [0, 0, 0, 255]
            } else {
                [200, 140, 40, 255]
            }
        }),
    );
    catalog.insert(
        "Things/Plant/Berries",
        Texture::from_fn(8, 8, |x, y| {
            let dx = i64::from(x) - 3;
            let dy = i64::from(y) - 3;
            if dx * dx + dy * dy <= 12 {
                [120, 40, 160, 255]
            } else {
                [0, 0, 0, 0]
            }
        }),
    );
    catalog
}

/// Spawn `count` colonists on a loose grid and hand out afflictions:
/// everyone is chromatically sensitive, every second colonist grows
/// restless hair, every third teleports.
pub fn spawn_colony(world: &mut World, count: usize) -> Vec<OrganismId> {
    let mut ids = Vec::with_capacity(count);
    for index in 0..count {
        let name: Cow<'static, str> = match NAMES.get(index) {
            Some(&name) => name.into(),
            None => format!("Colonist {}", index + 1).into(),
        };
        let col = (index % 4) as i32;
        let row = (index / 4) as i32;
        let position = Cell::new(10 + col * 8, 10 + row * 8);
        let skin = Color::from_rgb8(SKIN_TONES[index % SKIN_TONES.len()]);
        let hair = Color::from_rgb8(HAIR_SHADES[index % HAIR_SHADES.len()]);
        let id = world.spawn_organism(Organism::new(name, position, skin, hair));

        world.afflict(id, AfflictionRequest::Chromatic, 0.6);
        if index % 2 == 0 {
            world.afflict(id, AfflictionRequest::Hair, 0.5);
        }
        if index % 3 == 0 {
            world.afflict(id, AfflictionRequest::Relocation, 0.8);
        }
        ids.push(id);
    }
    ids
}

/// Feed every colonist one pantry item, rotating the menu so each meal
/// course hits a different color source. Returns how many meals landed.
pub fn serve_meals(
    world: &mut World,
    ids: &[OrganismId],
    pantry: &[Ingestible],
    course: usize,
) -> usize {
    if pantry.is_empty() {
        return 0;
    }
    let mut served = 0;
    for (offset, &id) in ids.iter().enumerate() {
        let item = &pantry[(course + offset) % pantry.len()];
        if world.ingest(id, item).is_some() {
            served += 1;
        }
    }
    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use maladies_core::{MaladiesConfig, WorldHooks};

    #[test]
    fn demo_colony_eats_and_mutates() {
        let config = MaladiesConfig {
            rng_seed: Some(99),
            map_width: 80,
            map_height: 80,
            day_ticks: 240,
            relocation_min_interval: 10,
            ..MaladiesConfig::default()
        };
        let hooks = WorldHooks {
            art: Box::new(demo_catalog()),
            ..WorldHooks::default()
        };
        let mut world = World::with_hooks(config, hooks).expect("world");
        let ids = spawn_colony(&mut world, 6);
        assert_eq!(world.organisms().len(), 6);

        let pantry = demo_pantry();
        let mut course = 0;
        for tick in 0..720u64 {
            if tick % 60 == 0 {
                let served = serve_meals(&mut world, &ids, &pantry, course);
                assert_eq!(served, ids.len());
                course += 1;
            }
            world.step();
        }

        let totals = world.totals();
        assert_eq!(totals.ingestions, 6 * 12);
        assert!(totals.hair_mutations > 0);
        assert!(totals.relocations > 0);
        for &id in &ids {
            let organism = world.organism(id).expect("organism");
            assert!(organism.skin_override.is_some(), "meals commit an override");
        }
    }
}
