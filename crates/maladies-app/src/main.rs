use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use maladies_core::{
    EffectEvent, EffectKind, MaladiesConfig, Texture, World, WorldHooks, dominant_color,
    sample_colors,
};
use maladies_storage::{EpisodeKind, SharedEpisodeLog, load_snapshot, save_snapshot};
use tracing::{info, warn};

mod scenario;

#[derive(Parser, Debug)]
#[command(
    name = "maladies",
    version,
    about = "Run the affliction colony sandbox or analyze artwork colors"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Advance a demo colony and report affliction activity.
    Run(RunArgs),
    /// Print the dominant and most frequent colors of an image.
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Simulation ticks to advance.
    #[arg(long, default_value_t = 2_000)]
    ticks: u64,

    /// Run whole in-game days instead of raw ticks.
    #[arg(long)]
    days: Option<u32>,

    /// RNG seed; when omitted the run seeds from the OS.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of demo colonists to spawn.
    #[arg(long, default_value_t = 4)]
    colonists: usize,

    /// JSON configuration file overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resume from a snapshot instead of spawning the demo colony.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a snapshot here when the run finishes.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Serve a pantry course to every colonist this many ticks apart;
    /// zero disables meals.
    #[arg(long, default_value_t = 400)]
    meal_interval: u64,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Image file to scan.
    image: PathBuf,

    /// JSON configuration file supplying the alpha threshold and the
    /// excluded-color list.
    #[arg(long)]
    config: Option<PathBuf>,

    /// How many of the most frequent colors to list.
    #[arg(long, default_value_t = 8)]
    top: usize,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run_command(args),
        Command::Analyze(args) => analyze_command(args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn run_command(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.rng_seed = Some(seed);
    }

    let log = SharedEpisodeLog::new(4096);
    let catalog = scenario::demo_catalog();

    let (mut world, colonist_ids) = if let Some(path) = &args.load {
        if args.config.is_some() || args.seed.is_some() {
            warn!("--config and --seed are ignored when resuming from a snapshot");
        }
        let snapshot = load_snapshot(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()))?;
        let mut world = World::from_snapshot(snapshot)?;
        world.set_art_source(Box::new(catalog));
        world.set_effect_sink(log.sink());
        let ids = world.organisms().handles().to_vec();
        info!(
            tick = world.tick().value(),
            colonists = ids.len(),
            "Resumed colony from snapshot"
        );
        (world, ids)
    } else {
        let hooks = WorldHooks {
            art: Box::new(catalog),
            effects: log.sink(),
            ..WorldHooks::default()
        };
        let mut world = World::with_hooks(config, hooks)?;
        let ids = scenario::spawn_colony(&mut world, args.colonists);
        info!(colonists = ids.len(), "Spawned demo colony");
        (world, ids)
    };

    let total_ticks = match args.days {
        Some(days) => u64::from(days) * u64::from(world.config().day_ticks),
        None => args.ticks,
    };

    let pantry = scenario::demo_pantry();
    let mut course = 0;
    for offset in 0..total_ticks {
        if args.meal_interval > 0
            && offset.is_multiple_of(args.meal_interval)
            && !colonist_ids.is_empty()
        {
            let served = scenario::serve_meals(&mut world, &colonist_ids, &pantry, course);
            course += 1;
            info!(tick = world.tick().value(), served, "Served a pantry course");
        }
        let events = world.step();
        if events.hair_mutations > 0 || events.relocations > 0 {
            info!(
                tick = events.tick.value(),
                hair = events.hair_mutations,
                relocations = events.relocations,
                "Affliction activity"
            );
        }
    }

    let totals = world.totals();
    info!(
        ticks = total_ticks,
        ingestions = totals.ingestions,
        hair_mutations = totals.hair_mutations,
        relocations = totals.relocations,
        "Run complete"
    );
    info!(
        motes = log.count_of(EpisodeKind::TextMote),
        dust = log.count_of(EpisodeKind::DustPuff),
        pulses = log.count_of(EpisodeKind::SkipPulse),
        episodes = log.count_of(EpisodeKind::Relocation),
        "Episode log"
    );
    for event in log.recent(3) {
        info!(
            tick = event.tick.value(),
            "Recent effect: {}",
            describe_effect(&event)
        );
    }

    if let Some(path) = &args.save {
        save_snapshot(path, &world.snapshot())
            .with_context(|| format!("failed to save snapshot {}", path.display()))?;
        info!(path = %path.display(), "Snapshot saved");
    }

    Ok(())
}

fn describe_effect(event: &EffectEvent) -> String {
    match &event.kind {
        EffectKind::TextMote { mote, cell } => {
            format!("mote \"{}\" at ({}, {})", mote.label(), cell.x, cell.y)
        }
        EffectKind::DustPuff { cell, scale } => {
            format!("dust puff at ({}, {}), scale {scale:.1}", cell.x, cell.y)
        }
        EffectKind::SkipPulse { cell } => format!("skip pulse at ({}, {})", cell.x, cell.y),
        EffectKind::RelocationEpisode { from, to } => format!(
            "relocated from ({}, {}) to ({}, {})",
            from.x, from.y, to.x, to.y
        ),
    }
}

fn analyze_command(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let options = config.extract_options();

    let img = image::open(&args.image)
        .with_context(|| format!("failed to open image {}", args.image.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels: Vec<[u8; 4]> = rgba.pixels().map(|pixel| pixel.0).collect();
    let texture = Texture::from_pixels(width, height, pixels)?;

    let samples = sample_colors(&texture, options.alpha_threshold);
    println!(
        "{}: {width}x{height}, {} distinct visible colors",
        args.image.display(),
        samples.len()
    );
    match dominant_color(&texture, &options) {
        Some(color) => {
            let [r, g, b] = color.to_rgb8();
            println!("dominant color: #{r:02X}{g:02X}{b:02X}");
        }
        None => println!("dominant color: none (no pixels above the alpha threshold)"),
    }
    for sample in samples.iter().take(args.top) {
        let [r, g, b] = sample.rgb;
        let marker = if options.excluded.contains(&sample.rgb) {
            "  (excluded)"
        } else {
            ""
        };
        println!("  #{r:02X}{g:02X}{b:02X}  {:>8} px{marker}", sample.count);
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<MaladiesConfig> {
    let Some(path) = path else {
        return Ok(MaladiesConfig::default());
    };
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("config file {} did not contain valid JSON", path.display()))
}
