use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use isoworld::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    snapshot,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Isometric world generator and NPC simulation")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/meadow.yaml")]
    scenario: PathBuf,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override frame count (uses scenario default when omitted)
    #[arg(long)]
    frames: Option<u64>,

    /// Override snapshot interval in frames
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Write the generated map and trees as JSON to this file
    #[arg(long)]
    dump_terrain: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    let mut world = scenario.build_world()?;
    let frames = scenario.frames(cli.frames);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_frames);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    if let Some(path) = &cli.dump_terrain {
        snapshot::write_json(path, &world.terrain_snapshot())?;
        println!("Terrain written to {}", path.display());
    }

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        frame_ms: scenario.frame_ms,
        snapshot_interval_frames: snapshot_interval,
        snapshot_dir,
    };
    let mut engine = EngineBuilder::new(settings).build();
    let summary = engine.run(&mut world, frames)?;

    let metadata = world.terrain().metadata();
    println!(
        "Scenario '{}' ({}x{}, {}, river: {}, coastline: {}) ran {} frames ({} ms).",
        scenario.name,
        world.terrain().width(),
        world.terrain().height(),
        metadata.climate,
        metadata.has_river,
        metadata.has_coastline,
        summary.frames,
        summary.final_time_ms,
    );
    println!(
        "Trees: {}  Agents: {} searching, {} settled  Tents: {}",
        summary.trees,
        summary.state_counts.searching,
        summary.state_counts.place_found,
        summary.tents,
    );
    Ok(())
}
