use std::collections::HashSet;
use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use maladies_core::{
    AfflictionRequest, ArtCatalog, Cell, Color, ExtractOptions, Ingestible, Ingredient,
    MaladiesConfig, Organism, OrganismId, Texture, World, WorldHooks, dominant_color,
};

fn noisy_texture(side: u32) -> Texture {
    Texture::from_fn(side, side, |x, y| {
        let mix = x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17));
        match mix % 5 {
            0 => [140, 101, 49, 255],
            1 | 2 => [30, 200, 90, 255],
            3 => [200, 60, 60, 255],
            _ => [255, 255, 255, 3],
        }
    })
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("dominant_color");
    let options = ExtractOptions {
        excluded: HashSet::from([[140, 101, 49], [0, 0, 0]]),
        ..ExtractOptions::default()
    };
    for side in [32_u32, 128, 512] {
        let texture = noisy_texture(side);
        group.bench_function(format!("{side}x{side}"), |b| {
            b.iter(|| black_box(dominant_color(&texture, &options)));
        });
    }
    group.finish();
}

fn stew_world() -> (World, OrganismId, Ingestible) {
    let mut catalog = ArtCatalog::new();
    for (index, name) in ["Rice", "Berries", "Agave", "Meat"].into_iter().enumerate() {
        catalog.insert(
            format!("Things/Item/{name}"),
            noisy_texture(32 + 16 * index as u32),
        );
    }
    let config = MaladiesConfig {
        rng_seed: Some(0xBEEF),
        ..MaladiesConfig::default()
    };
    let mut world = World::with_hooks(
        config,
        WorldHooks {
            art: Box::new(catalog),
            ..WorldHooks::default()
        },
    )
    .expect("world");
    let id = world.spawn_organism(Organism::new(
        "Taster",
        Cell::new(5, 5),
        Color::new(0.5, 0.4, 0.35),
        Color::BLACK,
    ));
    world.afflict(id, AfflictionRequest::Chromatic, 0.5);
    let stew = Ingestible::from_ingredients(
        "benchmark stew",
        vec![
            Ingredient::art("rice", "Things/Item/Rice"),
            Ingredient::art("berries", "Things/Item/Berries"),
            Ingredient::art("agave", "Things/Item/Agave"),
            Ingredient::art("meat", "Things/Item/Meat"),
        ],
    );
    (world, id, stew)
}

fn bench_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    group.bench_function("four_art_ingredients", |b| {
        b.iter_batched(
            stew_world,
            |(mut world, id, stew)| {
                for _ in 0..16 {
                    black_box(world.ingest(id, &stew));
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_extraction, bench_ingestion);
criterion_main!(benches);
